//! Data-URI encoders for SVG icons.
//!
//! [`IconEncoding`] tries a base64 encoder first and a percent-encoded one
//! second. Both enforce the same length limit.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

/// Default upper bound for an encoded data URI.
pub const DEFAULT_MAX_DATA_URI_BYTES: usize = 64 * 1024;

const BASE64_PREFIX: &str = "data:image/svg+xml;base64,";
const PERCENT_PREFIX: &str = "data:image/svg+xml;charset=UTF-8,";

/// Errors raised while turning markup into a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconEncodingError {
    /// There was nothing to encode.
    #[error("icon markup is empty")]
    EmptyMarkup,
    /// The encoded URI exceeded the configured limit.
    #[error("encoded icon is {length} bytes, limit is {limit}")]
    TooLong {
        /// Length of the encoded URI.
        length: usize,
        /// Configured limit.
        limit: usize,
    },
    /// An encoder failed for another reason.
    #[error("icon encoder failed: {message}")]
    Failed {
        /// Failure description.
        message: String,
    },
}

/// Turns SVG markup into a data URI.
pub trait IconEncoder: Send + Sync + fmt::Debug {
    /// Short name used in traces.
    fn name(&self) -> &'static str;

    /// Encode `markup`.
    ///
    /// # Errors
    ///
    /// Returns [`IconEncodingError`] when the markup is empty or the result
    /// would be unusable.
    fn encode(&self, markup: &str) -> Result<String, IconEncodingError>;
}

fn check_output(uri: String, limit: usize) -> Result<String, IconEncodingError> {
    if uri.len() > limit {
        return Err(IconEncodingError::TooLong {
            length: uri.len(),
            limit,
        });
    }
    Ok(uri)
}

/// Encodes markup as `data:image/svg+xml;base64,...`.
#[derive(Debug, Clone, Copy)]
pub struct Base64SvgEncoder {
    max_len: usize,
}

impl Base64SvgEncoder {
    /// Encoder rejecting URIs longer than `max_len` bytes.
    pub const fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl IconEncoder for Base64SvgEncoder {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encode(&self, markup: &str) -> Result<String, IconEncodingError> {
        if markup.trim().is_empty() {
            return Err(IconEncodingError::EmptyMarkup);
        }
        check_output(
            format!("{BASE64_PREFIX}{}", STANDARD.encode(markup)),
            self.max_len,
        )
    }
}

/// Encodes markup as `data:image/svg+xml;charset=UTF-8,...` with percent
/// escapes.
#[derive(Debug, Clone, Copy)]
pub struct PercentSvgEncoder {
    max_len: usize,
}

impl PercentSvgEncoder {
    /// Encoder rejecting URIs longer than `max_len` bytes.
    pub const fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl IconEncoder for PercentSvgEncoder {
    fn name(&self) -> &'static str {
        "percent"
    }

    fn encode(&self, markup: &str) -> Result<String, IconEncodingError> {
        if markup.trim().is_empty() {
            return Err(IconEncodingError::EmptyMarkup);
        }
        // Form encoding writes spaces as `+` and escapes a literal `+`, so the
        // swap below is lossless.
        let escaped: String = form_urlencoded::byte_serialize(markup.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        check_output(format!("{PERCENT_PREFIX}{escaped}"), self.max_len)
    }
}

/// Primary and fallback encoders tried in order.
#[derive(Debug, Clone)]
pub struct IconEncoding {
    primary: Arc<dyn IconEncoder>,
    fallback: Arc<dyn IconEncoder>,
}

impl IconEncoding {
    /// Base64 then percent encoding, both limited to `max_data_uri_bytes`.
    pub fn new(max_data_uri_bytes: usize) -> Self {
        Self::with_encoders(
            Arc::new(Base64SvgEncoder::new(max_data_uri_bytes)),
            Arc::new(PercentSvgEncoder::new(max_data_uri_bytes)),
        )
    }

    /// Custom encoder pair.
    pub fn with_encoders(primary: Arc<dyn IconEncoder>, fallback: Arc<dyn IconEncoder>) -> Self {
        Self { primary, fallback }
    }

    /// Encode with the primary encoder, falling back on failure.
    ///
    /// # Errors
    ///
    /// Returns the fallback encoder's error when both fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::icons::IconEncoding;
    ///
    /// let uri = IconEncoding::default().encode("<svg/>").expect("encoded");
    /// assert!(uri.starts_with("data:image/svg+xml;base64,"));
    /// ```
    pub fn encode(&self, markup: &str) -> Result<String, IconEncodingError> {
        match self.primary.encode(markup) {
            Ok(uri) => Ok(uri),
            Err(primary_error) => {
                debug!(
                    encoder = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %primary_error,
                    "primary icon encoding failed; trying fallback"
                );
                self.fallback.encode(markup)
            }
        }
    }
}

impl Default for IconEncoding {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DATA_URI_BYTES)
    }
}
