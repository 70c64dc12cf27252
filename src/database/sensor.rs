use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::ingest::SanitizedBatch;

use super::manager::DatabaseError;
use super::models::SensorRow;

// Stay well under Postgres' 65535 bind-parameter limit (11 columns per row).
const INSERT_CHUNK_ROWS: usize = 1000;

/// Append-only access to the sensor table. Rows are never updated or
/// deleted by this service.
pub struct SensorStore {
    pool: PgPool,
}

impl SensorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a sanitized batch in one transaction.
    ///
    /// Only the columns that survived sanitization are named in the insert;
    /// dropped columns stay NULL. Any error rolls back the whole batch, so
    /// partial uploads are never observable. Returns the appended row count.
    pub async fn append_batch(&self, batch: &SanitizedBatch) -> Result<u64, DatabaseError> {
        if batch.rows.is_empty() || batch.columns.is_empty() {
            return Ok(0);
        }

        let column_list = batch
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut tx = self.pool.begin().await?;

        for chunk in batch.rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO tree_data ({}) ", column_list));

            builder.push_values(chunk, |mut b, row| {
                for value in row {
                    b.push_bind(value.as_str());
                }
            });

            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(batch.rows.len() as u64)
    }

    /// Read up to `limit` rows, selecting the canonical columns by name.
    /// The synthetic primary key is intentionally not selected.
    pub async fn fetch(&self, limit: i64) -> Result<Vec<SensorRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, SensorRow>(
            r#"
            SELECT "Timestamp_Raw", "Timestamp", "Temperature", "Pressure", "Humidity",
                   "Dendro", "Sapflow", "SF_maxD", "SF_Signal", "SF_Noise", "Dendro_Dup"
            FROM tree_data
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
