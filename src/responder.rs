//! The image responder: one gateway request in, one gateway response out.
//!
//! ```text
//! extract params → negotiate Accept → resolve source by method → overlay noise → encode → respond
//! ```
//!
//! | Method | Source image | Noise overlay |
//! |---|---|---|
//! | `GET` | `w` x `h` greyscale noise | no (the image *is* noise) |
//! | `POST` | decoded upload, or rendered text | yes, sized to the source |
//! | `OPTIONS` | 1x1 placeholder | no |
//! | other | none, fails with `Unsupported HTTP method` | |
//!
//! Every failure is a [`ResponderError`] and becomes a 400; nothing here
//! panics on bad input or returns a partial image.

use crate::config::ResponderConfig;
use crate::event::{GatewayRequest, GatewayResponse};
use crate::imaging::{self, CodecError, ImageCodec, classify_body, image_from_body, overlay_noise};
use crate::negotiate::{Negotiated, negotiate};
use crate::params::{self, ParamError, RequestParams};
use crate::response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use rand::Rng;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Unknown encoding requested")]
    UnsupportedEncoding,
    #[error("Unsupported HTTP method")]
    UnsupportedMethod,
    #[error(transparent)]
    InvalidParameter(#[from] ParamError),
    #[error("Request body is not valid base64")]
    MalformedBody,
    #[error("Unable to decode image data")]
    Decode(#[source] CodecError),
    #[error("Unable to encode image")]
    Encode(#[source] CodecError),
}

/// A successfully encoded image and the mime type it is served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Tagged outcome of one pipeline run.
pub type EncodingResult = Result<EncodedImage, ResponderError>;

/// Request verbs the responder distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other,
}

impl Method {
    /// Methods are case-sensitive, as in HTTP.
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "OPTIONS" => Method::Options,
            _ => Method::Other,
        }
    }
}

/// Serialize `image` in the negotiated format.
pub fn encode(
    codec: &impl ImageCodec,
    image: &DynamicImage,
    negotiated: Negotiated,
) -> EncodingResult {
    let Negotiated::Supported { mime_type, format } = negotiated else {
        return Err(ResponderError::UnsupportedEncoding);
    };
    let bytes = codec.encode(image, format).map_err(ResponderError::Encode)?;
    Ok(EncodedImage { mime_type, bytes })
}

/// Raw POST body bytes, base64-decoded when the gateway flagged it.
fn body_bytes(request: &GatewayRequest) -> Result<Cow<'_, [u8]>, ResponderError> {
    let body = request.body.as_deref().unwrap_or_default();
    if request.is_base64_encoded {
        STANDARD
            .decode(body)
            .map(Cow::Owned)
            .map_err(|_| ResponderError::MalformedBody)
    } else {
        Ok(Cow::Borrowed(body.as_bytes()))
    }
}

/// Stateless request handler. Build once, share across invocations.
pub struct Responder<C> {
    config: ResponderConfig,
    codec: C,
}

impl<C: ImageCodec> Responder<C> {
    pub fn new(config: ResponderConfig, codec: C) -> Self {
        Self { config, codec }
    }

    /// Handle one request with thread-local randomness.
    pub fn respond(&self, request: &GatewayRequest) -> GatewayResponse {
        self.respond_with_rng(request, &mut rand::thread_rng())
    }

    /// Handle one request drawing noise from `rng`.
    pub fn respond_with_rng<R: Rng + ?Sized>(
        &self,
        request: &GatewayRequest,
        rng: &mut R,
    ) -> GatewayResponse {
        let result = self.render(request, rng);
        let style = params::error_style(&request.query_string_parameters);
        let response = response::build(&result, style);

        match &result {
            Ok(image) => info!(
                method = request.method(),
                mime_type = image.mime_type,
                bytes = image.bytes.len(),
                status = response.status_code,
                "request served"
            ),
            Err(error) => warn!(
                method = request.method(),
                error = %error,
                cause = ?std::error::Error::source(error),
                status = response.status_code,
                "request rejected"
            ),
        }
        response
    }

    /// Run the pipeline up to the encoded image.
    pub fn render<R: Rng + ?Sized>(
        &self,
        request: &GatewayRequest,
        rng: &mut R,
    ) -> EncodingResult {
        let params = params::extract(request, &self.config)?;
        let negotiated = negotiate(&params.accept);
        debug!(
            accept = %params.accept,
            negotiated = negotiated.mime_type(),
            "negotiated output format"
        );

        let image = match Method::parse(request.method()) {
            Method::Options => imaging::placeholder_image(),
            Method::Get => imaging::noise_image(params.width, params.height, params.noise, rng),
            Method::Post => self.post_image(request, &params, rng)?,
            Method::Other => return Err(ResponderError::UnsupportedMethod),
        };

        encode(&self.codec, &image, negotiated)
    }

    fn post_image<R: Rng + ?Sized>(
        &self,
        request: &GatewayRequest,
        params: &RequestParams,
        rng: &mut R,
    ) -> Result<DynamicImage, ResponderError> {
        let body = body_bytes(request)?;
        let kind = classify_body(&params.content_type);
        debug!(
            content_type = %params.content_type,
            ?kind,
            len = body.len(),
            "resolving POST body"
        );

        let mut image = image_from_body(&self.codec, &body, kind, params.width, params.height)
            .map_err(ResponderError::Decode)?;
        overlay_noise(&mut image, params.noise, rng);
        Ok(image)
    }
}
