// src/response.rs

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;

/// `HX-Trigger` that makes the page raise a blocking notification.
pub fn show_message_headers(message: &str, kind: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let payload = json!({
        "showMessage": {
            "message": message,
            "type": kind
        }
    });
    match HeaderValue::from_str(&payload.to_string()) {
        Ok(val) => {
            headers.insert("HX-Trigger", val);
        }
        Err(e) => tracing::warn!("Could not build HX-Trigger header: {}", e),
    }
    headers
}

/// Full-page navigation for htmx requests.
pub fn hx_redirect_headers(path: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(val) = HeaderValue::from_str(path) {
        headers.insert(HeaderName::from_static("hx-redirect"), val);
    }
    headers
}

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("HX-Request")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_payload_is_json() {
        let headers = show_message_headers("Please enter a business name", "error");
        let raw = headers.get("HX-Trigger").unwrap().to_str().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed["showMessage"]["type"], "error");
        assert_eq!(parsed["showMessage"]["message"], "Please enter a business name");
    }
}
