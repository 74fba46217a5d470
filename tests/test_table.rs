// tests/test_table.rs

use std::fs::File;
use std::io::Write;

use tempfile::tempdir;

use coexnet::error::NetworkError;
use coexnet::table::{load_rows, read_rows, ColumnNames};

#[test]
fn test_load_rows_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tumor.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "Tumor,Gene Symbol,PCC,P-value").unwrap();
    writeln!(file, "BRCA,TP53,0.91,1e-5").unwrap();
    writeln!(file, " LUAD , EGFR , 0.85 ,0.01").unwrap();
    writeln!(file, "LUAD,KRAS,NA,0.5").unwrap();
    drop(file);

    let rows = load_rows(&path, &ColumnNames::default()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].tissue, "BRCA");
    assert_eq!(rows[0].gene, "TP53");
    assert_eq!(rows[0].pcc, 0.91);
    assert_eq!(rows[1].tissue, "LUAD");
    assert_eq!(rows[1].gene, "EGFR");
    assert_eq!(rows[1].pcc, 0.85);
    assert_eq!(rows[1].row, 1);
    assert!(rows[2].pcc.is_nan());
}

#[test]
fn test_custom_column_names_and_order() {
    let data = "corr,symbol,site\n0.9,GCH1,Liver\n";
    let columns = ColumnNames {
        tissue: "site".to_string(),
        gene: "symbol".to_string(),
        pcc: "corr".to_string(),
    };
    let rows = read_rows(data.as_bytes(), &columns).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tissue, "Liver");
    assert_eq!(rows[0].gene, "GCH1");
    assert_eq!(rows[0].pcc, 0.9);
}

#[test]
fn test_missing_column_is_reported() {
    let data = "Tumor,Gene,PCC\nBRCA,TP53,0.9\n";
    match read_rows(data.as_bytes(), &ColumnNames::default()) {
        Err(NetworkError::MissingColumn(name)) => assert_eq!(name, "Gene Symbol"),
        other => panic!("expected a missing column error, got {:?}", other),
    }
}

#[test]
fn test_non_numeric_correlation_is_reported() {
    let data = "Tumor,Gene Symbol,PCC\nBRCA,TP53,0.9\nBRCA,MYC,strong\n";
    match read_rows(data.as_bytes(), &ColumnNames::default()) {
        Err(NetworkError::InvalidValue { row, column, value }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "PCC");
            assert_eq!(value, "strong");
        }
        other => panic!("expected an invalid value error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = load_rows(dir.path().join("absent.csv"), &ColumnNames::default());
    assert!(matches!(result, Err(NetworkError::Io(_))));
}

#[test]
fn test_header_only_table_is_empty() {
    let rows = read_rows("Tumor,Gene Symbol,PCC\n".as_bytes(), &ColumnNames::default()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_correlation_must_lie_in_unit_interval() {
    for value in ["inf", "-inf", "1.5", "-1.01", "7.5", "1e300"] {
        let data = format!("Tumor,Gene Symbol,PCC\nBRCA,TP53,0.9\nBRCA,MYC,{}\n", value);
        match read_rows(data.as_bytes(), &ColumnNames::default()) {
            Err(NetworkError::InvalidValue { row, value: got, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(got, value);
            }
            other => panic!("{} should be rejected, got {:?}", value, other),
        }
    }
}

#[test]
fn test_correlation_bounds_are_inclusive() {
    let data = "Tumor,Gene Symbol,PCC\nBRCA,TP53,1\nBRCA,MYC,-1\nBRCA,KRAS,N/A\n";
    let rows = read_rows(data.as_bytes(), &ColumnNames::default()).unwrap();
    assert_eq!(rows[0].pcc, 1.0);
    assert_eq!(rows[1].pcc, -1.0);
    assert!(rows[2].pcc.is_nan());
}
