use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One body-weight measurement. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WeightRecord {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub weight: f64,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
