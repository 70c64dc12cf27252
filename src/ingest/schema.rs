//! Schema normalization: fixed metadata skip, header discard, instrument
//! index drop, and positional assignment of the canonical column names.
//!
//! The logger header carries instrument-specific labels that are not stable
//! across deployments, so names are assigned by position. The position
//! contract is: column 0 is an instrument index (always dropped), the next
//! 11 columns are the canonical fields, anything after that is ignored.

use csv::StringRecord;

use super::IngestError;

/// Canonical sensor column names, in physical order after the index drop.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    "Timestamp_Raw",
    "Timestamp",
    "Temperature",
    "Pressure",
    "Humidity",
    "Dendro",
    "Sapflow",
    "SF_maxD",
    "SF_Signal",
    "SF_Noise",
    "Dendro_Dup",
];

/// A batch with exactly the canonical columns. `None` marks a cell the
/// source row did not carry (shorter than the header).
#[derive(Debug)]
pub struct NormalizedBatch {
    pub rows: Vec<Vec<Option<String>>>,
}

/// Normalize raw records into the canonical 11-column shape.
///
/// Fails when the header leaves fewer than 11 data columns (the observed
/// data-column count is reported), or when a data row is wider than the
/// header. Rows shorter than the header are padded with missing cells.
pub fn normalize(
    records: &[StringRecord],
    skip_rows: usize,
) -> Result<NormalizedBatch, IngestError> {
    let mut iter = records.iter().skip(skip_rows);

    let header = iter.next().ok_or(IngestError::Empty)?;
    let width = header.len();

    // Column 0 is the instrument index; everything after it is data.
    let data_columns = width.saturating_sub(1);
    if data_columns < CANONICAL_COLUMNS.len() {
        return Err(IngestError::Schema {
            found: data_columns,
        });
    }

    let mut rows = Vec::new();
    for (offset, record) in iter.enumerate() {
        if record.len() > width {
            return Err(IngestError::RaggedRow {
                row: offset + 1,
                width: record.len(),
                expected: width,
            });
        }

        let row: Vec<Option<String>> = (1..=CANONICAL_COLUMNS.len())
            .map(|i| record.get(i).map(|s| s.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(NormalizedBatch { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    fn wide_header() -> StringRecord {
        record(&[
            "idx", "ts_raw", "ts", "temp", "pres", "hum", "den", "sap", "maxd", "sig", "noise",
            "dup",
        ])
    }

    #[test]
    fn skips_metadata_and_discards_header() {
        let records = vec![
            record(&["logger", "meta"]),
            record(&["serial", "1234"]),
            wide_header(),
            record(&[
                "1", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k",
            ]),
        ];
        let batch = normalize(&records, 2).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0][0].as_deref(), Some("a"));
        assert_eq!(batch.rows[0][10].as_deref(), Some("k"));
    }

    #[test]
    fn index_column_is_always_dropped() {
        let records = vec![
            wide_header(),
            record(&[
                "9999", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k",
            ]),
        ];
        let batch = normalize(&records, 0).unwrap();
        assert!(batch.rows[0].iter().all(|c| c.as_deref() != Some("9999")));
    }

    #[test]
    fn fewer_than_eleven_data_columns_is_a_schema_error() {
        let records = vec![record(&["idx", "c1", "c2", "c3", "c4"])];
        match normalize(&records, 0) {
            Err(IngestError::Schema { found }) => assert_eq!(found, 4),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn exactly_eleven_raw_columns_still_fails() {
        // 11 raw columns leave only 10 data columns once the index is dropped.
        let header: Vec<&str> = vec!["c"; 11];
        let records = vec![record(&header)];
        match normalize(&records, 0) {
            Err(IngestError::Schema { found }) => assert_eq!(found, 10),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let records = vec![wide_header(), record(&["1", "a", "b"])];
        let batch = normalize(&records, 0).unwrap();
        assert_eq!(batch.rows[0][0].as_deref(), Some("a"));
        assert_eq!(batch.rows[0][1].as_deref(), Some("b"));
        assert!(batch.rows[0][2].is_none());
        assert!(batch.rows[0][10].is_none());
    }

    #[test]
    fn rows_wider_than_the_header_are_rejected() {
        let mut too_wide: Vec<&str> = vec!["x"; 13];
        too_wide[0] = "1";
        let records = vec![wide_header(), record(&too_wide)];
        assert!(matches!(
            normalize(&records, 0),
            Err(IngestError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn trailing_extra_columns_are_ignored() {
        let header: Vec<&str> = vec!["h"; 14];
        let mut data: Vec<String> = (0..14).map(|i| format!("v{}", i)).collect();
        data[0] = "idx".to_string();
        let data_refs: Vec<&str> = data.iter().map(|s| s.as_str()).collect();
        let records = vec![record(&header), record(&data_refs)];
        let batch = normalize(&records, 0).unwrap();
        assert_eq!(batch.rows[0].len(), CANONICAL_COLUMNS.len());
        assert_eq!(batch.rows[0][0].as_deref(), Some("v1"));
        assert_eq!(batch.rows[0][10].as_deref(), Some("v11"));
    }
}
