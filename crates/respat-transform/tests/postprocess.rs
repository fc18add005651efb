use respat_model::{CANONICAL_COLUMNS, CorrectionCatalog, LabId, RenameCatalog, Table};
use respat_transform::{Catalogs, postprocess, project};

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_rows(
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect(),
    )
}

fn dasa_catalogs() -> Catalogs {
    let mut renames = RenameCatalog::default();
    for (from, to) in [
        ("codigorequisicao", "test_id"),
        ("data_exame", "date_testing"),
        ("sexo", "sex"),
        ("idade", "age"),
        ("uf", "state"),
        ("cidade", "location"),
        ("Gene S", "Ct_geneS"),
    ] {
        renames.insert("DASA", from, to);
    }
    let mut corrections = CorrectionCatalog::default();
    corrections.insert("any", "state", "Pernambuco", "PE");
    corrections.insert("DASA", "location", "RECIFE", "Recife");
    Catalogs {
        renames,
        corrections,
    }
}

#[test]
fn output_columns_are_exactly_canonical() {
    let input = table(
        &["codigorequisicao", "extra", "data_exame", "SC2_test_result"],
        &[&["R1", "dropped", "2022-01-10", "Pos"]],
    );
    let out = postprocess(input, LabId::Dasa, &dasa_catalogs());
    assert_eq!(out.headers, CANONICAL_COLUMNS.to_vec());
    assert_eq!(out.value(0, "test_id"), "R1");
    assert_eq!(out.value(0, "SC2_test_result"), "Pos");
    assert_eq!(out.value(0, "Ct_FluA"), "");
}

#[test]
fn dasa_record_is_normalized() {
    let input = table(
        &["codigorequisicao", "data_exame", "sexo", "idade", "uf", "cidade", "Gene S"],
        &[
            &["R1", "2022-01-10", "Feminino", "34", "Pernambuco", "RECIFE", "0"],
            &["R2", "2022-01-11 09:30:00", "M", "61", "RN", "Natal", "27.3"],
        ],
    );
    let out = postprocess(input, LabId::Dasa, &dasa_catalogs());

    assert_eq!(out.value(0, "lab_id"), "DASA");
    assert_eq!(out.value(0, "sex"), "F");
    assert_eq!(out.value(0, "state"), "PE");
    assert_eq!(out.value(0, "location"), "Recife");
    assert_eq!(out.value(0, "date_testing"), "2022-01-10");
    assert_eq!(out.value(0, "epiweek"), "2022-01-15");
    assert_eq!(out.value(0, "geneS_detection"), "Neg");
    assert_eq!(out.value(1, "date_testing"), "2022-01-11");
    assert_eq!(out.value(1, "geneS_detection"), "Pos");
}

#[test]
fn fleury_ages_and_day_first_dates() {
    let mut renames = RenameCatalog::default();
    renames.insert("Fleury", "DATA COLETA", "date_testing");
    renames.insert("Fleury", "IDADE", "age");
    let catalogs = Catalogs {
        renames,
        corrections: CorrectionCatalog::default(),
    };
    let input = table(
        &["DATA COLETA", "IDADE"],
        &[&["03/04/2022", "45A"], &["03/04/2022", "12D"]],
    );
    let out = postprocess(input, LabId::Fleury, &catalogs);
    assert_eq!(out.value(0, "date_testing"), "2022-04-03");
    assert_eq!(out.value(0, "age"), "45");
    assert_eq!(out.value(1, "age"), "0");
}

#[test]
fn birthdate_overrides_age_per_policy() {
    let input = table(
        &["date_testing", "birthdate", "age"],
        &[
            &["2022-01-10", "1990-07-01", "99"],
            &["2022-01-10", "desconhecido", "40"],
        ],
    );
    let db = postprocess(input.clone(), LabId::DbMolecular, &Catalogs::default());
    assert_eq!(db.value(0, "age"), "31");
    assert_eq!(db.value(1, "age"), "40");

    let dasa = postprocess(input, LabId::Dasa, &Catalogs::default());
    assert_eq!(dasa.value(0, "age"), "31.5");
}

#[test]
fn cache_rows_are_only_projected() {
    let cache = table(
        &["sample_id", "date_testing", "lab_id", "legacy"],
        &[&["abc", "XXXXX", "SABIN", "x"]],
    );
    let out = project(&cache);
    assert_eq!(out.headers.len(), CANONICAL_COLUMNS.len());
    assert_eq!(out.value(0, "date_testing"), "XXXXX");
    assert_eq!(out.value(0, "sample_id"), "abc");
}

#[test]
fn age_policies_agree_near_a_birthday() {
    let input = table(
        &["date_testing", "birthdate"],
        &[&["2022-01-10", "1990-01-20"]],
    );
    let dasa = postprocess(input.clone(), LabId::Dasa, &Catalogs::default());
    assert_eq!(dasa.value(0, "age"), "32.0");
    for lab in [LabId::DbMolecular, LabId::HlaGyn, LabId::Sabin] {
        let out = postprocess(input.clone(), lab, &Catalogs::default());
        assert_eq!(out.value(0, "age"), "32", "{lab}");
    }
}
