//! Gateway response assembly.
//!
//! | Outcome | Status | Body | `isBase64Encoded` |
//! |---|---|---|---|
//! | image | 200 | base64 image bytes | true |
//! | failure, text style | 400 | `Text path: <reason>` | false |
//! | failure, binary style | 400 | base64 of `Binary path: <reason>` | true |

use crate::event::GatewayResponse;
use crate::params::ErrorStyle;
use crate::responder::{EncodedImage, EncodingResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;
use std::fmt::Display;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Build the response for a finished pipeline run.
pub fn build(result: &EncodingResult, style: ErrorStyle) -> GatewayResponse {
    match result {
        Ok(image) => success(image),
        Err(error) => failure(error, style),
    }
}

/// 200 with the image base64-encoded and open CORS.
pub fn success(image: &EncodedImage) -> GatewayResponse {
    GatewayResponse {
        status_code: STATUS_OK,
        headers: BTreeMap::from([
            ("Content-Type".to_string(), image.mime_type.to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]),
        body: STANDARD.encode(&image.bytes),
        is_base64_encoded: true,
    }
}

/// 400 carrying `reason` in the requested style.
pub fn failure(reason: &impl Display, style: ErrorStyle) -> GatewayResponse {
    let (body, is_base64_encoded) = match style {
        ErrorStyle::Text => (format!("Text path: {reason}"), false),
        ErrorStyle::Binary => (STANDARD.encode(format!("Binary path: {reason}")), true),
    };
    GatewayResponse {
        status_code: STATUS_BAD_REQUEST,
        headers: BTreeMap::from([("Content-Type".to_string(), "text/plain".to_string())]),
        body,
        is_base64_encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponderError;

    #[test]
    fn success_is_base64_with_cors() {
        let image = EncodedImage {
            mime_type: "image/png",
            bytes: vec![1, 2, 3],
        };
        let response = build(&Ok(image), ErrorStyle::Text);

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "image/png");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.body, "AQID");
        assert!(response.is_base64_encoded);
    }

    #[test]
    fn failure_text_path() {
        let response = build(&Err(ResponderError::UnsupportedEncoding), ErrorStyle::Text);

        assert_eq!(response.status_code, 400);
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.headers["Content-Type"], "text/plain");
        assert_eq!(response.body, "Text path: Unknown encoding requested");
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn failure_binary_path() {
        let response = build(&Err(ResponderError::UnsupportedMethod), ErrorStyle::Binary);

        assert_eq!(response.status_code, 400);
        assert!(response.is_base64_encoded);
        let decoded = STANDARD.decode(&response.body).unwrap();
        assert_eq!(decoded, b"Binary path: Unsupported HTTP method");
    }
}
