//! Canonical output schema.

pub const LAB_ID: &str = "lab_id";
pub const TEST_ID: &str = "test_id";
pub const TEST_KIT: &str = "test_kit";
pub const SAMPLE_ID: &str = "sample_id";
pub const STATE: &str = "state";
pub const LOCATION: &str = "location";
pub const DATE_TESTING: &str = "date_testing";
pub const EPIWEEK: &str = "epiweek";
pub const AGE: &str = "age";
pub const SEX: &str = "sex";
pub const BIRTHDATE: &str = "birthdate";
pub const CT_GENE_S: &str = "Ct_geneS";
pub const GENE_S_DETECTION: &str = "geneS_detection";

/// Literal written to `date_testing` when the date cannot be parsed.
pub const MISSING_DATE: &str = "XXXXX";

/// Output columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 31] = [
    LAB_ID,
    TEST_ID,
    TEST_KIT,
    SAMPLE_ID,
    STATE,
    LOCATION,
    DATE_TESTING,
    EPIWEEK,
    AGE,
    SEX,
    "FLUA_test_result",
    "Ct_FluA",
    "FLUB_test_result",
    "Ct_FluB",
    "VSR_test_result",
    "Ct_VSR",
    "SC2_test_result",
    "Ct_geneE",
    "Ct_geneN",
    CT_GENE_S,
    "Ct_ORF1ab",
    "Ct_RDRP",
    GENE_S_DETECTION,
    "META_test_result",
    "RINO_test_result",
    "PARA_test_result",
    "ADENO_test_result",
    "BOCA_test_result",
    "COVS_test_result",
    "ENTERO_test_result",
    "BAC_test_result",
];

/// Columns the final table is sorted by.
pub const SORT_COLUMNS: [&str; 3] = [LAB_ID, TEST_ID, DATE_TESTING];

pub fn is_canonical(column: &str) -> bool {
    CANONICAL_COLUMNS.contains(&column)
}
