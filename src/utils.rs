use serde::{Deserialize, Serialize};

/// The `{success, data, message, error}` wrapper every response is sent in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: &str) -> Envelope<T> {
        Envelope {
            success: true,
            data: Some(data),
            message: message.to_owned(),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn success_without_data(message: &str) -> Envelope<()> {
        Envelope {
            success: true,
            data: None,
            message: message.to_owned(),
            error: None,
        }
    }
}
