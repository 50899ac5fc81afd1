use serde_json::Value;

/// Raw peak data as handed over by a transport or loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Packed binary buffer.
    Bytes(Vec<u8>),
    /// JSON text, parsed on demand.
    Text(String),
    /// Already parsed JSON.
    Json(Value),
}

impl Payload {
    /// Parse the payload as JSON if it is textual. Binary payloads yield `None`.
    pub(crate) fn to_json(&self) -> Option<Value> {
        match self {
            Self::Bytes(_) => None,
            Self::Text(text) => serde_json::from_str(text).ok(),
            Self::Json(value) => Some(value.clone()),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// A completed transport response carrying peak data.
///
/// When `response_type` is declared the typed `response` body is used as-is.
/// Otherwise the textual body wins and `response` is only the fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub response_type: Option<String>,
    pub response: Option<Payload>,
    pub response_text: Option<String>,
}

impl TransportResponse {
    /// Unwrap the body that should be handed to adapter detection.
    pub fn into_payload(self) -> Option<Payload> {
        if self.response_type.is_some() {
            return self.response;
        }

        match self.response_text {
            Some(text) if !text.is_empty() => Some(Payload::Text(text)),
            _ => self.response,
        }
    }
}
