//! Echo handler.
//!
//! Deployed beside the image responder to show what the gateway actually
//! delivers: the request's headers, body and base64 flag come straight back.
//!
//! An event whose `body` is JSON `null` counts as having no body and gets
//! the 400, the same as an event without the key.

use crate::event::{GatewayRequest, GatewayResponse};
use crate::response::{STATUS_BAD_REQUEST, STATUS_OK};
use std::collections::BTreeMap;
use tracing::info;

pub const NOTHING_TO_ECHO: &str = "Error: nothing to echo. Are you using the right endpoint";

/// Return the request as the response, or 400 when there is no body.
pub fn echo(request: &GatewayRequest) -> GatewayResponse {
    let Some(body) = &request.body else {
        info!(method = request.method(), "nothing to echo");
        return GatewayResponse {
            status_code: STATUS_BAD_REQUEST,
            headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
            body: NOTHING_TO_ECHO.to_string(),
            is_base64_encoded: false,
        };
    };

    info!(
        method = request.method(),
        len = body.len(),
        base64 = request.is_base64_encoded,
        "echoing request"
    );
    GatewayResponse {
        status_code: STATUS_OK,
        headers: request.headers.clone(),
        body: body.clone(),
        is_base64_encoded: request.is_base64_encoded,
    }
}
