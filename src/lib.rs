//! # noise-responder
//!
//! A serverless HTTP handler that serves or transforms images. `GET` returns
//! generated greyscale noise; `POST` decodes an uploaded image (or renders
//! submitted text), overlays noise and returns the result; `OPTIONS` answers
//! preflight checks with a 1x1 image. Output is encoded in the client's
//! preferred format, chosen from the `Accept` header.
//!
//! # Architecture: One Stateless Pipeline
//!
//! Each invocation runs the same forward-only pipeline:
//!
//! ```text
//! 1. Extract     event     →  RequestParams   (query + headers, defaults applied)
//! 2. Negotiate   Accept    →  output format   (first supported preference)
//! 3. Resolve     method    →  source image    (noise / decoded upload / text / placeholder)
//! 4. Overlay     image     →  noised image    (POST only)
//! 5. Encode      image     →  bytes           (JPEG / PNG / GIF / BMP)
//! 6. Respond     outcome   →  GatewayResponse (200 base64 image, or 400 text)
//! ```
//!
//! Nothing is shared between invocations beyond read-only configuration and
//! the codec, so the hosting platform can scale by running many instances.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`event`] | Typed API Gateway request and response documents |
//! | [`params`] | Parameter extraction and validation |
//! | [`negotiate`] | `Accept` header to output format |
//! | [`imaging`] | Codec trait, noise, overlay, text rendering |
//! | [`responder`] | The pipeline and its error type |
//! | [`response`] | Gateway response assembly |
//! | [`echo`] | Companion handler that returns the request verbatim |
//! | [`config`] | `config.toml` loading, defaults and limits |
//! | [`logging`] | JSON `tracing` subscriber for CloudWatch |
//! | [`output`] | CLI output for local invocations |
//!
//! # Design Decisions
//!
//! ## Failures Are Responses
//!
//! Unsupported encodings, unsupported methods, bad query parameters,
//! malformed base64 and undecodable uploads all become a 400 with a fixed
//! message. The Lambda handler itself never returns an error for a bad
//! request, so the gateway never sees a 502.
//!
//! ## Content-Sniffed Decoding
//!
//! Uploads are decoded by magic bytes, not by their declared content type;
//! the header only decides between "image" and "text". Decoding sits behind
//! [`imaging::ImageCodec`] so the `image` crate can be swapped or mocked.

pub mod config;
pub mod echo;
pub mod event;
pub mod imaging;
pub mod logging;
pub mod negotiate;
pub mod output;
pub mod params;
pub mod responder;
pub mod response;
