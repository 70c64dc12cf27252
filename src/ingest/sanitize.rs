//! Row sanitization: batch-wide blank-column removal and sentinel fill.
//!
//! Runs after naming, so dropping a blank column can never shift a value
//! under the wrong name. A cell counts as missing when the source row did
//! not carry it or carried an empty field.

use super::schema::{NormalizedBatch, CANONICAL_COLUMNS};
use super::SENTINEL;

/// Text-only batch ready for the table writer. `columns` holds the canonical
/// names that survived the blank-column drop; every row is aligned with it.
#[derive(Debug)]
pub struct SanitizedBatch {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

fn is_missing(cell: &Option<String>) -> bool {
    match cell {
        None => true,
        Some(s) => s.is_empty(),
    }
}

/// Drop columns that are missing across the whole batch, then replace every
/// remaining missing cell with the sentinel.
pub fn sanitize(batch: NormalizedBatch) -> SanitizedBatch {
    let keep: Vec<usize> = (0..CANONICAL_COLUMNS.len())
        .filter(|&c| batch.rows.iter().any(|row| !is_missing(&row[c])))
        .collect();

    let columns: Vec<&'static str> = keep.iter().map(|&c| CANONICAL_COLUMNS[c]).collect();

    let rows: Vec<Vec<String>> = batch
        .rows
        .into_iter()
        .map(|row| {
            keep.iter()
                .map(|&c| match &row[c] {
                    Some(s) if !s.is_empty() => s.clone(),
                    _ => SENTINEL.to_string(),
                })
                .collect()
        })
        .collect();

    SanitizedBatch { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
        let mut full: Vec<Option<String>> = cells
            .iter()
            .map(|c| c.map(|s| s.to_string()))
            .collect();
        full.resize(CANONICAL_COLUMNS.len(), None);
        full
    }

    #[test]
    fn blank_across_batch_column_is_dropped() {
        // Column 1 ("Timestamp") is empty in every row
        let batch = NormalizedBatch {
            rows: vec![
                row(&[Some("a"), Some(""), Some("x")]),
                row(&[Some("b"), None, Some("y")]),
            ],
        };
        let out = sanitize(batch);
        assert!(!out.columns.contains(&"Timestamp"));
        assert!(out.columns.contains(&"Timestamp_Raw"));
        assert!(out.columns.contains(&"Temperature"));
        assert_eq!(out.rows[0][0], "a");
        assert_eq!(out.rows[0][1], "x");
    }

    #[test]
    fn missing_cells_become_the_sentinel() {
        let batch = NormalizedBatch {
            rows: vec![
                row(&[Some("a"), Some("t1"), Some("")]),
                row(&[Some("b"), None, Some("20.1")]),
            ],
        };
        let out = sanitize(batch);
        // Column 2 survives (one row has a value); blanks get the sentinel
        let temp_idx = out.columns.iter().position(|&c| c == "Temperature").unwrap();
        assert_eq!(out.rows[0][temp_idx], SENTINEL);
        assert_eq!(out.rows[1][temp_idx], "20.1");
        let ts_idx = out.columns.iter().position(|&c| c == "Timestamp").unwrap();
        assert_eq!(out.rows[1][ts_idx], SENTINEL);
    }

    #[test]
    fn fully_populated_batch_keeps_all_columns() {
        let cells: Vec<Option<&str>> = vec![Some("v"); CANONICAL_COLUMNS.len()];
        let batch = NormalizedBatch {
            rows: vec![row(&cells)],
        };
        let out = sanitize(batch);
        assert_eq!(out.columns.len(), CANONICAL_COLUMNS.len());
        assert!(out.rows[0].iter().all(|v| v == "v"));
    }

    #[test]
    fn empty_batch_yields_no_rows() {
        let out = sanitize(NormalizedBatch { rows: vec![] });
        assert!(out.rows.is_empty());
        assert!(out.columns.is_empty());
    }
}
