use respat_model::{
    CANONICAL_COLUMNS, CallSheet, CorrectionCatalog, LabId, Pathogen, PathogenCall, Record,
    RenameCatalog, SampleId, Table, TargetOutcome,
};

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_rows(
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| (*c).to_string()).collect())
            .collect(),
    )
}

#[test]
fn sample_id_accepts_both_lengths() {
    assert!(SampleId::new("0123456789abcdef").is_ok());
    assert!(SampleId::new("0123456789abcdef0123456789abcdef01234567").is_ok());
    assert!(SampleId::new("0123456789ABCDEF").is_err());
    assert!(SampleId::new("abc").is_err());
}

#[test]
fn pathogen_parses_case_insensitively() {
    assert_eq!("flua".parse::<Pathogen>().unwrap(), Pathogen::FluA);
    assert_eq!(Pathogen::Sc2.result_column(), "SC2_test_result");
    assert!("H5N1".parse::<Pathogen>().is_err());
}

#[test]
fn lab_parses_from_slug_and_name() {
    assert_eq!("db".parse::<LabId>().unwrap(), LabId::DbMolecular);
    assert_eq!("DB Molecular".parse::<LabId>().unwrap(), LabId::DbMolecular);
    assert_eq!(LabId::Fleury.sample_id_len(), 40);
    assert_eq!(LabId::Sabin.sample_id_len(), 16);
}

#[test]
fn call_sheet_starts_not_tested() {
    let sheet = CallSheet::new();
    assert!(sheet.iter().all(|(_, call)| call == PathogenCall::NotTested));
    assert_eq!(sheet.iter().count(), 12);
}

#[test]
fn call_sheet_keeps_positive() {
    let mut sheet = CallSheet::new();
    sheet.apply(Pathogen::Sc2, TargetOutcome::Detected);
    sheet.apply(Pathogen::Sc2, TargetOutcome::NotDetected);
    sheet.apply(Pathogen::FluB, TargetOutcome::NotDetected);
    assert_eq!(sheet.get(Pathogen::Sc2), PathogenCall::Pos);
    assert_eq!(sheet.get(Pathogen::FluB), PathogenCall::Neg);
    assert_eq!(sheet.get(Pathogen::Vsr), PathogenCall::NotTested);
}

#[test]
fn pathogen_serializes_uppercase() {
    let json = serde_json::to_string(&Pathogen::FluA).expect("serialize pathogen");
    assert_eq!(json, "\"FLUA\"");
}

#[test]
fn canonical_columns_are_unique() {
    let mut sorted = CANONICAL_COLUMNS.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), CANONICAL_COLUMNS.len());
    for pathogen in Pathogen::ALL {
        assert!(CANONICAL_COLUMNS.contains(&pathogen.result_column()));
    }
}

#[test]
fn table_from_records_unions_headers() {
    let first: Record = [("a", "1")].into_iter().collect();
    let second: Record = [("a", "2"), ("b", "x")].into_iter().collect();
    let table = Table::from_records(&[first, second]);
    assert_eq!(table.headers, vec!["a", "b"]);
    assert_eq!(table.rows[0], vec!["1", ""]);
    assert_eq!(table.rows[1], vec!["2", "x"]);
}

#[test]
fn table_rename_replaces_existing_target() {
    let mut t = table(&["old", "new", "other"], &[&["a", "b", "c"]]);
    assert!(t.rename_column("old", "new"));
    assert_eq!(t.headers, vec!["new", "other"]);
    assert_eq!(t.rows[0], vec!["a", "c"]);
}

#[test]
fn repeated_header_reads_first_column_everywhere() {
    let t = table(&["codigo", "codigo", "x"], &[&["first", "second", "1"]]);
    assert_eq!(t.value(0, "codigo"), "first");
    assert_eq!(t.record(0).value("codigo"), "first");
    assert_eq!(t.select(&["codigo"]).rows[0], vec!["first"]);
}

#[test]
fn table_select_fills_missing_columns() {
    let t = table(&["b", "a"], &[&["2", "1"]]);
    let projected = t.select(&["a", "c", "b"]);
    assert_eq!(projected.headers, vec!["a", "c", "b"]);
    assert_eq!(projected.rows[0], vec!["1", "", "2"]);
}

#[test]
fn rename_catalog_reads_rows() {
    let t = table(
        &["lab_id", "column_name", "new_name"],
        &[&["DASA", "codigorequisicao", "test_id"], &["SABIN", "OS", "test_id"]],
    );
    let catalog = RenameCatalog::from_table(&t).expect("rename catalog");
    assert_eq!(catalog.rename("DASA", "codigorequisicao"), Some("test_id"));
    assert_eq!(catalog.rename("DASA", "OS"), None);
}

#[test]
fn rename_catalog_requires_columns() {
    let t = table(&["lab_id", "column_name"], &[]);
    assert!(RenameCatalog::from_table(&t).is_err());
}

#[test]
fn correction_catalog_prefers_lab_over_wildcard() {
    let t = table(
        &["lab_id", "column_name", "old_data", "new_data"],
        &[
            &["any", "state", "Sao Paulo", "SP"],
            &["DASA", "state", "Sao Paulo", "S. Paulo"],
            &["any", "sex", "", ""],
        ],
    );
    let catalog = CorrectionCatalog::from_table(&t).expect("correction catalog");
    assert_eq!(catalog.correct("DASA", "state", "Sao Paulo"), Some("S. Paulo"));
    assert_eq!(catalog.correct("SABIN", "state", "Sao Paulo"), Some("SP"));
    assert_eq!(catalog.correct("SABIN", "state", "RJ"), None);
    assert_eq!(catalog.columns_for("SABIN"), vec!["state"]);
}
