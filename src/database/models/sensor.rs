use serde::Serialize;
use sqlx::FromRow;

/// One sensor reading, all values text. Columns may be NULL when the upload
/// batch dropped them as blank-across-batch; present-but-missing cells hold
/// the `NULL_MISSING` sentinel instead.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SensorRow {
    #[sqlx(rename = "Timestamp_Raw")]
    #[serde(rename = "Timestamp_Raw")]
    pub timestamp_raw: Option<String>,

    #[sqlx(rename = "Timestamp")]
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,

    #[sqlx(rename = "Temperature")]
    #[serde(rename = "Temperature")]
    pub temperature: Option<String>,

    #[sqlx(rename = "Pressure")]
    #[serde(rename = "Pressure")]
    pub pressure: Option<String>,

    #[sqlx(rename = "Humidity")]
    #[serde(rename = "Humidity")]
    pub humidity: Option<String>,

    #[sqlx(rename = "Dendro")]
    #[serde(rename = "Dendro")]
    pub dendro: Option<String>,

    #[sqlx(rename = "Sapflow")]
    #[serde(rename = "Sapflow")]
    pub sapflow: Option<String>,

    #[sqlx(rename = "SF_maxD")]
    #[serde(rename = "SF_maxD")]
    pub sf_maxd: Option<String>,

    #[sqlx(rename = "SF_Signal")]
    #[serde(rename = "SF_Signal")]
    pub sf_signal: Option<String>,

    #[sqlx(rename = "SF_Noise")]
    #[serde(rename = "SF_Noise")]
    pub sf_noise: Option<String>,

    #[sqlx(rename = "Dendro_Dup")]
    #[serde(rename = "Dendro_Dup")]
    pub dendro_dup: Option<String>,
}
