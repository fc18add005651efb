//! Tests for table loading and lab directory discovery.

use std::fs;
use std::path::{Path, PathBuf};

use respat_ingest::{
    IngestError, lab_directory, list_lab_files, load_correction_catalog, load_rename_catalog,
    load_table,
};
use respat_model::{LabId, TextEncoding};

fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_tsv_as_strings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(
        dir.path(),
        "panel.tsv",
        b"codigorequisicao\tcodigo\tpositivo\nR1\tFLUA\t1\nR1\tFLUB\t\n",
    );
    let table = load_table(&path, TextEncoding::Utf8).expect("load tsv");
    assert_eq!(table.headers, vec!["codigorequisicao", "codigo", "positivo"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "positivo"), "1");
    assert_eq!(table.value(1, "positivo"), "");
}

#[test]
fn loads_latin1_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(
        dir.path(),
        "fleury.csv",
        b"PATOGENO,RESULTADO\nV\xedrus Sincial Respirat\xf3rio,POSITIVO\n",
    );
    let table = load_table(&path, TextEncoding::Latin1).expect("load csv");
    assert_eq!(table.value(0, "PATOGENO"), "Vírus Sincial Respiratório");
}

#[test]
fn quoted_csv_fields_keep_commas() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(
        dir.path(),
        "quoted.csv",
        b"PATOGENO,RESULTADO\n\"Virusmol, Influenza A\",DETECTADO (POSITIVO)\n",
    );
    let table = load_table(&path, TextEncoding::Utf8).expect("load csv");
    assert_eq!(table.value(0, "PATOGENO"), "Virusmol, Influenza A");
}

#[test]
fn wide_rows_load_with_extra_cells_dropped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(
        dir.path(),
        "wide.tsv",
        b"OS\tResultado\n100\tDetectado\textra\n101\tNao detectado\n",
    );
    let table = load_table(&path, TextEncoding::Utf8).expect("load tsv");
    assert_eq!(table.headers, vec!["OS", "Resultado"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0], vec!["100", "Detectado"]);
    assert_eq!(table.value(1, "Resultado"), "Nao detectado");
}

#[test]
fn unsupported_extension_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(dir.path(), "export.json", b"{}");
    let err = load_table(&path, TextEncoding::Utf8).expect_err("json must fail");
    assert!(matches!(err, IngestError::UnsupportedFormat { ref extension, .. } if extension == "json"));
}

#[test]
fn lists_lab_files_sorted_and_filtered() {
    let dir = tempfile::tempdir().expect("temp dir");
    let lab_dir = lab_directory(dir.path(), LabId::DbMolecular);
    fs::create_dir_all(&lab_dir).expect("create lab dir");
    write(&lab_dir, "b_export.tsv", b"a\n1\n");
    write(&lab_dir, "a_export.csv", b"a\n1\n");
    write(&lab_dir, "~$a_export.xlsx", b"");
    write(&lab_dir, "_ignored.tsv", b"a\n1\n");
    write(&lab_dir, "notes.txt", b"hello");
    write(&lab_dir, "c_export.parquet", b"");

    let files = list_lab_files(&lab_dir).expect("list files");
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["a_export.csv", "b_export.tsv", "c_export.parquet"]);
    assert!(lab_dir.ends_with("DB Molecular"));
}

#[test]
fn missing_lab_directory_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = list_lab_files(&dir.path().join("SABIN")).expect_err("missing dir");
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn loads_catalogs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rename = write(
        dir.path(),
        "rename.tsv",
        b"lab_id\tcolumn_name\tnew_name\nDASA\tcodigorequisicao\ttest_id\n",
    );
    let correction = write(
        dir.path(),
        "fix.tsv",
        b"lab_id\tcolumn_name\told_data\tnew_data\nany\tsex\tFEMININO\tF\n",
    );
    let renames = load_rename_catalog(&rename).expect("rename catalog");
    let corrections = load_correction_catalog(&correction).expect("correction catalog");
    assert_eq!(renames.rename("DASA", "codigorequisicao"), Some("test_id"));
    assert_eq!(corrections.correct("HLAGyn", "sex", "FEMININO"), Some("F"));
}

#[test]
fn catalog_without_required_columns_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let rename = write(dir.path(), "rename.tsv", b"lab_id\tcolumn\nDASA\tx\n");
    let err = load_rename_catalog(&rename).expect_err("missing new_name");
    assert!(matches!(err, IngestError::Catalog { .. }));
}
