//! CLI output for local invocations.
//!
//! `invoke` runs a handler against a saved event and prints a short summary
//! instead of the raw response document:
//!
//! ```text
//! Status: 200
//!     content-type: image/png
//!     access-control-allow-origin: *
//! Body: 1234 bytes (base64)
//! ```
//!
//! Text bodies are shown inline after `Body:`. Each summary has a `format_*`
//! function (returns `Vec<String>`) for testability and a `print_*` wrapper
//! that writes to stdout.

use crate::event::GatewayResponse;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Describe a response body: decoded size when base64, the text otherwise.
fn body_line(response: &GatewayResponse) -> String {
    if !response.is_base64_encoded {
        return format!("Body: {}", response.body);
    }
    match STANDARD.decode(&response.body) {
        Ok(bytes) => format!("Body: {} bytes (base64)", bytes.len()),
        Err(_) => format!("Body: {} chars (invalid base64)", response.body.len()),
    }
}

pub fn format_invoke_summary(response: &GatewayResponse) -> Vec<String> {
    let mut lines = vec![format!("Status: {}", response.status_code)];
    for (name, value) in &response.headers {
        lines.push(format!("{}{}: {}", indent(1), name, value));
    }
    lines.push(body_line(response));
    lines
}

pub fn print_invoke_summary(response: &GatewayResponse) {
    for line in format_invoke_summary(response) {
        println!("{}", line);
    }
}
