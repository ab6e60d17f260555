use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::Error;

/// Response body of a dispatched call. An empty body is a success value,
/// and a body that is not structured data passes through as text instead of
/// failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Empty,
}

impl Payload {
    /// Deserialize into the caller's type. `Empty` decodes as JSON `null`,
    /// so `()` and `Option<T>` targets accept bodiless responses.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        let value = match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
            Payload::Empty => Value::Null,
        };
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}
