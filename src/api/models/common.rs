use crate::core::error::InventoryError;
use crate::db::models::Status;
use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON body extractor whose rejections use the API error shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(InventoryError))]
pub struct JsonBody<T>(pub T);

/// `{data}` or `{message, data}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { message: None, data }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            data,
        }
    }
}

/// `{message, deletedId}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
    pub deleted_id: String,
}

/// Optional string where `""` (what HTML forms send for "nothing") means absent
pub fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Optional status; blank strings count as absent
pub fn deserialize_optional_status<'de, D>(deserializer: D) -> Result<Option<Status>, D::Error>
where
    D: Deserializer<'de>,
{
    match deserialize_blank_as_none(deserializer)? {
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Optional price given either as a JSON number or as a numeric string
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{}'", s))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid price {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_blank_as_none")]
        reference: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_status")]
        status: Option<Status>,
        #[serde(default, deserialize_with = "deserialize_price")]
        price: Option<f64>,
    }

    fn sample(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_blank_values_are_absent() {
        let p = sample(r#"{"reference":"","status":"","price":""}"#).unwrap();
        assert!(p.reference.is_none());
        assert!(p.status.is_none());
        assert!(p.price.is_none());

        let p = sample("{}").unwrap();
        assert!(p.reference.is_none());
    }

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(sample(r#"{"price":150.5}"#).unwrap().price, Some(150.5));
        assert_eq!(sample(r#"{"price":" 99 "}"#).unwrap().price, Some(99.0));
        assert!(sample(r#"{"price":"cheap"}"#).is_err());
        assert!(sample(r#"{"price":true}"#).is_err());
    }

    #[test]
    fn test_status_must_be_known() {
        assert_eq!(sample(r#"{"status":"Inactivo"}"#).unwrap().status, Some(Status::Inactivo));
        assert!(sample(r#"{"status":"Roto"}"#).is_err());
    }

    #[test]
    fn test_data_response_shapes() {
        let plain = serde_json::to_value(DataResponse::new(1)).unwrap();
        assert_eq!(plain, serde_json::json!({ "data": 1 }));

        let with_message = serde_json::to_value(DataResponse::with_message("ok", 1)).unwrap();
        assert_eq!(with_message, serde_json::json!({ "message": "ok", "data": 1 }));
    }
}
