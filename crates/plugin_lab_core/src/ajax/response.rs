//! JSON response envelope returned by every Ajax handler.

use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `{ "success": bool, "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AjaxResponse {
    pub success: bool,
    pub data: Value,
}

impl AjaxResponse {
    /// Success envelope around `data`.
    ///
    /// JSON has no infinities or NaN, so non-finite floats inside `data`
    /// come out as `null`. A payload that cannot be serialized at all is
    /// logged and sent as `null` data.
    pub fn success(data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).unwrap_or_else(|err| {
            error!("event=ajax_response module=ajax status=error error_code=serialize_failed error={err}");
            Value::Null
        });
        Self {
            success: true,
            data,
        }
    }

    /// Failure envelope carrying `{ "message": ... }`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: json!({ "message": message.into() }),
        }
    }

    /// Failure message, when this is an error envelope.
    pub fn message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.data.get("message").and_then(Value::as_str)
    }

    pub fn to_json(&self) -> String {
        Value::from(self).to_string()
    }
}

impl From<&AjaxResponse> for Value {
    fn from(value: &AjaxResponse) -> Self {
        json!({ "success": value.success, "data": value.data })
    }
}

/// Returns whether `value` has the `{success, data}` envelope shape.
pub fn validate_ajax_response(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("success") && object.contains_key("data"))
}

#[cfg(test)]
mod tests {
    use super::{validate_ajax_response, AjaxResponse};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    #[test]
    fn error_envelope_carries_message() {
        let response = AjaxResponse::error("Security check failed.");
        assert!(!response.success);
        assert_eq!(response.message(), Some("Security check failed."));
        assert_eq!(
            response.to_json(),
            r#"{"data":{"message":"Security check failed."},"success":false}"#
        );
    }

    #[test]
    fn success_envelope_has_no_message() {
        let response = AjaxResponse::success(json!({ "result": 3 }));
        assert!(response.success);
        assert_eq!(response.message(), None);
        assert_eq!(response.data["result"], 3);
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let response = AjaxResponse::success(json!({ "result": f64::INFINITY, "calculation": "x" }));
        assert!(response.success);
        assert_eq!(response.data["result"], Value::Null);
        assert_eq!(response.data["calculation"], "x");
    }

    #[test]
    fn unserializable_payload_becomes_null_data() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "non-string key");
        let response = AjaxResponse::success(map);
        assert!(response.success);
        assert_eq!(response.data, Value::Null);
        assert!(validate_ajax_response(&Value::from(&response)));
    }

    #[test]
    fn validate_checks_envelope_shape() {
        assert!(validate_ajax_response(&json!({ "success": true, "data": {} })));
        assert!(!validate_ajax_response(&json!({ "success": true })));
        assert!(!validate_ajax_response(&json!(["success", "data"])));
        assert!(!validate_ajax_response(&json!("success")));
    }
}
