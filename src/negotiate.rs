//! Content negotiation over the `Accept` header.
//!
//! Strictly first match in client order: quality parameters are ignored and
//! there is no best-match scoring. `*/*` is answered with JPEG.
//!
//! | Accept | Format |
//! |---|---|
//! | `image/jpeg`, `*/*` | JPEG |
//! | `image/png`, `image/apng` | PNG |
//! | `image/gif` | GIF |
//! | `image/bmp` | BMP |

use crate::imaging::OutputFormat;

/// Mime type reported when nothing in the Accept list is supported.
pub const UNKNOWN_MIME: &str = "unknown/unknown";

const WILDCARD: &str = "*/*";
const WILDCARD_MIME: &str = "image/jpeg";

const SUPPORTED: &[(&str, OutputFormat)] = &[
    ("image/jpeg", OutputFormat::Jpeg),
    ("image/png", OutputFormat::Png),
    ("image/apng", OutputFormat::Png),
    ("image/gif", OutputFormat::Gif),
    ("image/bmp", OutputFormat::Bmp),
];

/// Outcome of negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiated {
    /// `mime_type` is the client's own spelling, so `image/apng` is answered
    /// as `image/apng` even though the bytes are PNG.
    Supported {
        mime_type: &'static str,
        format: OutputFormat,
    },
    Unknown,
}

impl Negotiated {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Negotiated::Supported { mime_type, .. } => mime_type,
            Negotiated::Unknown => UNKNOWN_MIME,
        }
    }
}

/// Look up a single media type in the supported set.
pub fn lookup(mime_type: &str) -> Negotiated {
    SUPPORTED
        .iter()
        .find(|(mime, _)| *mime == mime_type)
        .map(|&(mime_type, format)| Negotiated::Supported { mime_type, format })
        .unwrap_or(Negotiated::Unknown)
}

/// Pick the first supported type from a comma-separated Accept list.
pub fn negotiate(accept: &str) -> Negotiated {
    for option in accept.split(',') {
        let media_type = option.split(';').next().unwrap_or_default().trim();
        let media_type = if media_type == WILDCARD {
            WILDCARD_MIME
        } else {
            media_type
        };
        let negotiated = lookup(media_type);
        if negotiated != Negotiated::Unknown {
            return negotiated;
        }
    }
    Negotiated::Unknown
}
