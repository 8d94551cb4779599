//! Request parameter extraction.
//!
//! Pulls image dimensions, noise range, output preference and error-body
//! style out of a [`GatewayRequest`]. Absent values take the configured
//! defaults. Present values must parse and lie in range; anything else is a
//! [`ParamError`] rather than a silent coercion.

use crate::config::ResponderConfig;
use crate::event::{GatewayRequest, QueryParameters};
use crate::imaging::NoiseRange;
use thiserror::Error;

/// Content type assumed for a body sent without a `Content-Type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid query parameter '{name}': {reason}")]
pub struct ParamError {
    pub name: &'static str,
    pub reason: String,
}

impl ParamError {
    fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

/// How a failure message is placed in the response body.
///
/// Purely presentational: both styles carry the same message, one as plain
/// text and one base64-encoded, so API consumers can see either path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStyle {
    #[default]
    Text,
    Binary,
}

/// Everything the pipeline needs from a request, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub width: u32,
    pub height: u32,
    pub noise: NoiseRange,
    /// Raw Accept preference list, fed to [`crate::negotiate::negotiate`].
    pub accept: String,
    pub content_type: String,
    pub error_style: ErrorStyle,
}

/// Extract and validate request parameters.
pub fn extract(
    request: &GatewayRequest,
    config: &ResponderConfig,
) -> Result<RequestParams, ParamError> {
    let query = &request.query_string_parameters;
    let defaults = &config.defaults;

    let width = parse_dimension(
        "w",
        query.w.as_deref(),
        defaults.width,
        config.limits.max_width,
    )?;
    let height = parse_dimension(
        "h",
        query.h.as_deref(),
        defaults.height,
        config.limits.max_height,
    )?;
    let min = parse_intensity("min", query.min.as_deref(), defaults.noise_min)?;
    let max = parse_intensity("max", query.max.as_deref(), defaults.noise_max)?;
    let noise = NoiseRange::new(min, max)
        .ok_or_else(|| ParamError::new("min", format!("{min} is greater than max ({max})")))?;

    let error_style = match query.demo64_flag.as_deref() {
        None => ErrorStyle::Text,
        Some(raw) => match parse_int("demo64Flag", raw)? {
            0 => ErrorStyle::Text,
            _ => ErrorStyle::Binary,
        },
    };

    Ok(RequestParams {
        width,
        height,
        noise,
        accept: request
            .header("accept")
            .unwrap_or(defaults.accept.as_str())
            .to_string(),
        content_type: request
            .header("content-type")
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string(),
        error_style,
    })
}

/// Error style for a request whose parameters may not have parsed.
///
/// A malformed `demo64Flag` falls back to [`ErrorStyle::Text`]; the flag's own
/// parse error is reported by [`extract`].
pub fn error_style(query: &QueryParameters) -> ErrorStyle {
    match query.demo64_flag.as_deref().map(str::trim).map(str::parse::<i64>) {
        Some(Ok(flag)) if flag != 0 => ErrorStyle::Binary,
        _ => ErrorStyle::Text,
    }
}

fn parse_int(name: &'static str, raw: &str) -> Result<i64, ParamError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParamError::new(name, format!("'{raw}' is not an integer")))
}

fn parse_dimension(
    name: &'static str,
    raw: Option<&str>,
    default: u32,
    limit: u32,
) -> Result<u32, ParamError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = parse_int(name, raw)?;
    if value < 1 || value > i64::from(limit) {
        return Err(ParamError::new(name, format!("{value} is outside 1..={limit}")));
    }
    Ok(value as u32)
}

fn parse_intensity(name: &'static str, raw: Option<&str>, default: u8) -> Result<u8, ParamError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = parse_int(name, raw)?;
    u8::try_from(value).map_err(|_| ParamError::new(name, format!("{value} is outside 0..=255")))
}
