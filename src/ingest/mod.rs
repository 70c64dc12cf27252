//! CSV ingestion pipeline: parse -> normalize -> sanitize.
//!
//! Logger export files carry a fixed block of metadata records, then a header
//! record, then data. The pipeline turns the data portion into a batch of
//! text-only rows under the 11 canonical column names, ready for a single
//! transactional append.

pub mod sanitize;
pub mod schema;

use thiserror::Error;

pub use sanitize::SanitizedBatch;
pub use schema::{NormalizedBatch, CANONICAL_COLUMNS};

/// Literal placeholder distinguishing "missing" from a real empty value.
pub const SENTINEL: &str = "NULL_MISSING";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fewer than 11 data columns (found {found})")]
    Schema { found: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("data row {row} has {width} columns, expected at most {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("no header record found after skipping metadata rows")]
    Empty,
}

/// Run the full pipeline over raw CSV bytes.
///
/// `skip_rows` is the fixed count of leading metadata records discarded
/// before the header. The header itself is read for its width and discarded.
pub fn run(bytes: &[u8], skip_rows: usize) -> Result<SanitizedBatch, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    let normalized = schema::normalize(&records, skip_rows)?;
    Ok(sanitize::sanitize(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_with_skip(skip: usize, header: &str, data: &[&str]) -> Vec<u8> {
        let mut out = String::new();
        for i in 0..skip {
            out.push_str(&format!("meta,{}\n", i));
        }
        out.push_str(header);
        out.push('\n');
        for row in data {
            out.push_str(row);
            out.push('\n');
        }
        out.into_bytes()
    }

    const WIDE_HEADER: &str = "idx,c1,c2,c3,c4,c5,c6,c7,c8,c9,c10,c11";

    #[test]
    fn pipeline_produces_one_row_per_data_record() {
        let bytes = csv_with_skip(
            3,
            WIDE_HEADER,
            &[
                "1,a,b,c,d,e,f,g,h,i,j,k",
                "2,l,m,n,o,p,q,r,s,t,u,v",
            ],
        );
        let batch = run(&bytes, 3).unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.columns.len(), 11);
        assert_eq!(batch.columns[0], "Timestamp_Raw");
        // The instrument-index column never reaches the batch
        assert_eq!(batch.rows[0][0], "a");
        assert_eq!(batch.rows[1][0], "l");
    }

    #[test]
    fn narrow_file_fails_with_observed_count() {
        let bytes = csv_with_skip(2, "idx,c1,c2,c3", &["1,a,b,c"]);
        match run(&bytes, 2) {
            Err(IngestError::Schema { found }) => assert_eq!(found, 3),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn file_with_only_metadata_is_rejected() {
        let bytes = b"meta,1\nmeta,2\n".to_vec();
        assert!(matches!(run(&bytes, 5), Err(IngestError::Empty)));
    }

    #[test]
    fn header_only_file_yields_empty_batch() {
        let bytes = csv_with_skip(1, WIDE_HEADER, &[]);
        let batch = run(&bytes, 1).unwrap();
        assert!(batch.rows.is_empty());
    }
}
