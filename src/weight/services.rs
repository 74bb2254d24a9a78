use std::sync::Arc;

use time::{macros::format_description, Date, OffsetDateTime};
use tracing::info;

use crate::error::AppError;
use crate::weight::repo::WeightRepo;
use crate::weight::repo_types::WeightRecord;

pub const MAX_WEIGHT_KG: f64 = 1000.0;

#[derive(Clone)]
pub struct WeightStore {
    repo: Arc<dyn WeightRepo>,
}

impl WeightStore {
    pub fn new(repo: Arc<dyn WeightRepo>) -> Self {
        Self { repo }
    }

    /// Store a measurement for `user_id`. `date` is `YYYY-MM-DD`; when absent
    /// the current UTC date is used.
    pub async fn add_record(
        &self,
        user_id: i64,
        weight: f64,
        date: Option<&str>,
    ) -> Result<i64, AppError> {
        let weight = validate_weight(weight)?;
        let date = match date {
            Some(raw) => parse_date(raw)?,
            None => OffsetDateTime::now_utc().date(),
        };

        let record_id = self.repo.insert_record(user_id, weight, date).await?;
        info!(user_id, record_id, "weight recorded");
        Ok(record_id)
    }

    /// A page of the user's records plus their total count.
    pub async fn list_records(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<WeightRecord>, i64), AppError> {
        if limit < 0 || offset < 0 {
            return Err(AppError::validation(
                "limit e offset devem ser números não negativos",
            ));
        }
        let records = self.repo.list_by_user(user_id, limit, offset).await?;
        let total = self.repo.count_by_user(user_id).await?;
        Ok((records, total))
    }

    pub async fn latest_record(&self, user_id: i64) -> Result<Option<WeightRecord>, AppError> {
        Ok(self.repo.latest_by_user(user_id).await?)
    }
}

/// Accepts `0 < weight <= 1000`; NaN and infinities are rejected too.
pub fn validate_weight(weight: f64) -> Result<f64, AppError> {
    if weight > 0.0 && weight <= MAX_WEIGHT_KG {
        Ok(weight)
    } else {
        Err(AppError::validation("Peso deve estar entre 0 e 1000 kg"))
    }
}

/// Strict `YYYY-MM-DD`: four-digit unsigned year from 0001, calendar-valid day.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let invalid = || AppError::validation("Data deve estar no formato YYYY-MM-DD");
    let raw = raw.trim();
    if !is_iso_date_shape(raw) || raw.starts_with("0000") {
        return Err(invalid());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| invalid())
}

fn is_iso_date_shape(raw: &str) -> bool {
    let b = raw.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}
