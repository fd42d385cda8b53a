use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the appliance on failed requests and inside
/// batch entries: `{"Code": 60108, "Message": "...", "InnerError": null}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub inner_error: Option<Value>,
}

/// One element of a batch response. Element `i` answers submitted item `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchResponse<T> {
    pub response: Option<T>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub status_code_number: Option<u16>,
    #[serde(default)]
    pub is_success: bool,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    /// The submitted item, echoed back (possibly a subset of its fields).
    #[serde(default)]
    pub request: Option<Value>,
}

impl<T> BatchResponse<T> {
    /// Failure message for this entry, if it failed.
    pub fn failure_message(&self) -> Option<String> {
        if self.is_success {
            return None;
        }
        let message = self
            .error
            .as_ref()
            .and_then(|e| e.message.clone())
            .or_else(|| self.status_code.clone())
            .unwrap_or_else(|| "unknown error".into());
        Some(message)
    }
}
