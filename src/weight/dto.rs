use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::weight::repo_types::WeightRecord;

/// `weight` is kept loose: clients send either `72.5` or `"72.5"`.
#[derive(Debug, Deserialize)]
pub struct AddWeightRequest {
    pub weight: Option<Value>,
    pub date: Option<String>,
}

impl AddWeightRequest {
    pub fn weight_kg(&self) -> Result<f64, AppError> {
        let invalid = || AppError::validation("Peso deve ser um número válido");
        match &self.weight {
            None | Some(Value::Null) => Err(AppError::validation("Peso é obrigatório")),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct RecordCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub record_id: i64,
}

#[derive(Debug, Serialize)]
pub struct WeightHistoryResponse {
    pub success: bool,
    pub data: Vec<WeightRecord>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct LatestWeightResponse {
    pub success: bool,
    pub data: Option<WeightRecord>,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(body: Value) -> AddWeightRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn weight_accepts_numbers_and_numeric_strings() {
        assert_eq!(req(json!({ "weight": 72.5 })).weight_kg().unwrap(), 72.5);
        assert_eq!(req(json!({ "weight": 80 })).weight_kg().unwrap(), 80.0);
        assert_eq!(req(json!({ "weight": " 64.2 " })).weight_kg().unwrap(), 64.2);
    }

    #[test]
    fn weight_errors() {
        let missing = req(json!({ "date": "2024-01-01" })).weight_kg().unwrap_err();
        assert_eq!(missing.to_string(), "Peso é obrigatório");

        for bad in [json!("setenta"), json!(true), json!([70])] {
            let err = req(json!({ "weight": bad })).weight_kg().unwrap_err();
            assert_eq!(err.to_string(), "Peso deve ser um número válido");
        }
    }

    #[test]
    fn history_uses_camel_case_has_more() {
        let body = WeightHistoryResponse {
            success: true,
            data: vec![],
            total: 0,
            limit: 50,
            offset: 0,
            has_more: false,
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["hasMore"], false);
        assert!(json.get("has_more").is_none());
    }
}
