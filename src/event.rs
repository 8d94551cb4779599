//! API Gateway HTTP event and response shapes.
//!
//! The gateway delivers a JSON document per invocation; these structs are the
//! typed view of the parts the handlers read. Every field is optional on the
//! wire, so absent keys fall back to documented defaults instead of failing
//! deserialization.
//!
//! ```json
//! {
//!   "requestContext": { "http": { "method": "POST" } },
//!   "queryStringParameters": { "w": "100", "h": "50", "demo64Flag": "1" },
//!   "headers": { "accept": "image/png", "content-type": "image/jpeg" },
//!   "body": "<base64>",
//!   "isBase64Encoded": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Method assumed when the event carries no `requestContext.http.method`.
pub const DEFAULT_METHOD: &str = "GET";

/// An incoming API Gateway (HTTP API, payload v2) event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default)]
    pub request_context: RequestContext,
    /// The gateway sends `null` rather than `{}` when there is no query string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: QueryParameters,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: HttpContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpContext {
    #[serde(default)]
    pub method: Option<String>,
}

/// Query parameters understood by the image handler.
///
/// Values stay as strings: the gateway never types them, and parsing (with its
/// error reporting) belongs to [`crate::params`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(default)]
    pub w: Option<String>,
    #[serde(default)]
    pub h: Option<String>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
    #[serde(default, rename = "demo64Flag")]
    pub demo64_flag: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GatewayRequest {
    /// The request verb: first whitespace-delimited token of the context method.
    pub fn method(&self) -> &str {
        self.request_context
            .http
            .method
            .as_deref()
            .and_then(|m| m.split_whitespace().next())
            .unwrap_or(DEFAULT_METHOD)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The response document handed back to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}
