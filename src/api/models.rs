use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Man,
    Woman,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Man => "man",
            Gender::Woman => "woman",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/generate-gifts`.
///
/// Every field is optional: the server trusts the shape it is given and lets
/// missing values surface as an empty prompt rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<String>,
}

impl GiftRequest {
    /// Extracts the five fields from a raw body without schema validation.
    ///
    /// A body that is not a JSON object yields a request with every field
    /// absent. Fields of the wrong type are dropped individually; numeric
    /// strings are accepted for the numeric fields.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self {
                price_min: number_field(&fields, "priceMin"),
                price_max: number_field(&fields, "priceMax"),
                gender: string_field(&fields, "gender"),
                age: number_field(&fields, "age"),
                hobbies: string_field(&fields, "hobbies"),
            },
            _ => Self::default(),
        }
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Option<Number> {
    match fields.get(key)? {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .map(Number::from)
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64))
        }
        _ => None,
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// JSON envelope returned by the endpoint: `{result}` or `{error:{message}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GiftResponse {
    Success { result: String },
    Failure { error: ErrorMessage },
}

impl GiftResponse {
    pub fn success(result: impl Into<String>) -> Self {
        Self::Success {
            result: result.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}
