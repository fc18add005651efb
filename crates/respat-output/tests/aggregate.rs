use std::fs;

use respat_model::{CANONICAL_COLUMNS, Table};
use respat_output::{DUPLICATES_FILE, aggregate, duplicates_path, write_tsv};

fn canonical(rows: &[[&str; 3]]) -> Table {
    let mut table = Table::new(CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()).collect());
    for [lab, test, date] in rows {
        let idx = table.rows.len();
        table.rows.push(vec![String::new(); CANONICAL_COLUMNS.len()]);
        table.set_value(idx, "lab_id", *lab);
        table.set_value(idx, "test_id", *test);
        table.set_value(idx, "date_testing", *date);
    }
    table
}

#[test]
fn identical_rows_go_to_side_file_and_one_survives() {
    let dir = tempfile::tempdir().expect("tempdir");
    let side = duplicates_path(dir.path());
    assert!(side.ends_with(DUPLICATES_FILE));

    let cache = canonical(&[["SABIN", "R2", "2022-01-03"]]);
    let fresh = canonical(&[["SABIN", "R1", "2022-01-05"], ["SABIN", "R2", "2022-01-03"]]);

    let result = aggregate([cache, fresh], &side).expect("aggregate");
    assert_eq!(result.dropped, 1);
    assert_eq!(result.duplicates.len(), 2);
    assert_eq!(result.table.len(), 2);
    assert_eq!(result.table.value(0, "test_id"), "R1");
    assert_eq!(result.table.value(1, "test_id"), "R2");

    let written = fs::read_to_string(&side).expect("side file");
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn no_side_file_without_duplicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let side = duplicates_path(dir.path());
    let table = canonical(&[["DASA", "B", "2022-01-02"], ["DASA", "A", "2022-01-09"]]);

    let result = aggregate([table], &side).expect("aggregate");
    assert_eq!(result.dropped, 0);
    assert!(!side.exists());
    assert_eq!(result.table.value(0, "test_id"), "A");
}

#[test]
fn sort_is_by_lab_then_test_then_date() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = canonical(&[
        ["SABIN", "A", "2022-01-01"],
        ["DASA", "B", "2022-02-01"],
        ["DASA", "B", "2022-01-01"],
        ["DASA", "A", "XXXXX"],
    ]);
    let result = aggregate([table], &duplicates_path(dir.path())).expect("aggregate");
    let order: Vec<(&str, &str, &str)> = (0..result.table.len())
        .map(|row| {
            (
                result.table.value(row, "lab_id"),
                result.table.value(row, "test_id"),
                result.table.value(row, "date_testing"),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("DASA", "A", "XXXXX"),
            ("DASA", "B", "2022-01-01"),
            ("DASA", "B", "2022-02-01"),
            ("SABIN", "A", "2022-01-01"),
        ]
    );
}

#[test]
fn output_header_is_canonical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("combined.tsv");
    write_tsv(&canonical(&[]), &path).expect("write");
    let text = fs::read_to_string(&path).expect("read");
    insta::assert_snapshot!(text.trim_end().replace('\t', "\n"), @r"
    lab_id
    test_id
    test_kit
    sample_id
    state
    location
    date_testing
    epiweek
    age
    sex
    FLUA_test_result
    Ct_FluA
    FLUB_test_result
    Ct_FluB
    VSR_test_result
    Ct_VSR
    SC2_test_result
    Ct_geneE
    Ct_geneN
    Ct_geneS
    Ct_ORF1ab
    Ct_RDRP
    geneS_detection
    META_test_result
    RINO_test_result
    PARA_test_result
    ADENO_test_result
    BOCA_test_result
    COVS_test_result
    ENTERO_test_result
    BAC_test_result
    ");
}
