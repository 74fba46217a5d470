// src/table.rs

//! Reading the tissue / gene / correlation table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};

use crate::error::{NetworkError, Result};
use crate::progress::count_spinner;

/// Header names of the three columns the network is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub tissue: String,
    pub gene: String,
    pub pcc: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            tissue: "Tumor".to_string(),
            gene: "Gene Symbol".to_string(),
            pcc: "PCC".to_string(),
        }
    }
}

/// One (tissue, gene, correlation) observation.
///
/// `row` is the 0-based position of the record in the file, not counting the
/// header. Missing or `NA` correlations are kept as `NaN` so that the
/// threshold filter drops them; anything else outside `[-1, 1]` is rejected
/// when the table is read.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRow {
    pub row: usize,
    pub tissue: String,
    pub gene: String,
    pub pcc: f64,
}

impl CorrelationRow {
    pub fn new(row: usize, tissue: impl Into<String>, gene: impl Into<String>, pcc: f64) -> Self {
        CorrelationRow {
            row,
            tissue: tissue.into(),
            gene: gene.into(),
            pcc,
        }
    }
}

/// Load every row of the CSV file at `path`.
pub fn load_rows<P: AsRef<Path>>(path: P, columns: &ColumnNames) -> Result<Vec<CorrelationRow>> {
    info!("Loading data from {}...", path.as_ref().display());
    let file = File::open(&path)?;
    read_rows(file, columns)
}

/// Parse CSV records from any reader. Columns other than the three named in
/// `columns` are ignored.
pub fn read_rows<R: Read>(reader: R, columns: &ColumnNames) -> Result<Vec<CorrelationRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NetworkError::MissingColumn(name.to_string()))
    };
    let tissue_idx = position(&columns.tissue)?;
    let gene_idx = position(&columns.gene)?;
    let pcc_idx = position(&columns.pcc)?;

    let pb = count_spinner("table", "rows");
    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let tissue = record.get(tissue_idx).unwrap_or_default();
        let gene = record.get(gene_idx).unwrap_or_default();
        let raw_pcc = record.get(pcc_idx).unwrap_or_default();
        let pcc = parse_pcc(raw_pcc).ok_or_else(|| NetworkError::InvalidValue {
            row,
            column: columns.pcc.clone(),
            value: raw_pcc.to_string(),
        })?;
        rows.push(CorrelationRow::new(row, tissue, gene, pcc));
        pb.inc(1);
    }
    pb.finish_and_clear();

    debug!("Read {} rows", rows.len());
    Ok(rows)
}

/// Empty cells and the usual missing-value spellings read as `NaN`. Any
/// other value must be a number in `[-1, 1]`.
fn parse_pcc(raw: &str) -> Option<f64> {
    match raw {
        "" | "NA" | "N/A" | "NaN" | "nan" | "null" => Some(f64::NAN),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|pcc| (-1.0..=1.0).contains(pcc)),
    }
}
