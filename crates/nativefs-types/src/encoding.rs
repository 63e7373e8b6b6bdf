//! Content encodings and conversion to the base64 transport form.
//!
//! File contents cross the engine contract as base64 strings. Callers work
//! with one of three logical encodings:
//!
//! - `utf8`: the transport holds base64 of UTF-8 bytes
//! - `ascii`: the transport holds base64 of raw bytes, one char per byte
//! - `base64`: the transport is handed through unchanged

use crate::{NativeFsError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Logical encoding of file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8 text.
    #[default]
    Utf8,
    /// Single-byte characters (U+0000 to U+00FF).
    Ascii,
    /// Base64 text, passed through untouched.
    Base64,
}

impl Encoding {
    /// Returns the encoding as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Ascii => "ascii",
            Self::Base64 => "base64",
        }
    }

    /// Returns all supported encodings.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Utf8, Self::Ascii, Self::Base64]
    }

    /// Converts transport bytes (base64) into content.
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::MalformedContent`] if the transport is not
    /// valid base64, or does not decode to valid UTF-8 for [`Encoding::Utf8`].
    pub fn decode(self, transport: &str) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(decode_transport(transport)?)
                .map_err(|e| NativeFsError::MalformedContent(format!("invalid UTF-8: {e}"))),
            Self::Ascii => Ok(decode_transport(transport)?
                .into_iter()
                .map(char::from)
                .collect()),
            Self::Base64 => Ok(transport.to_string()),
        }
    }

    /// Converts content into transport bytes (base64).
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::MalformedContent`] if [`Encoding::Ascii`]
    /// content holds a character above U+00FF.
    pub fn encode(self, content: &str) -> Result<String> {
        match self {
            Self::Utf8 => Ok(BASE64.encode(content.as_bytes())),
            Self::Ascii => {
                let bytes = content
                    .chars()
                    .map(|c| {
                        u8::try_from(u32::from(c)).map_err(|_| {
                            NativeFsError::MalformedContent(format!(
                                "character {c:?} is outside the single-byte range"
                            ))
                        })
                    })
                    .collect::<Result<Vec<u8>>>()?;
                Ok(BASE64.encode(bytes))
            }
            Self::Base64 => Ok(content.to_string()),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = NativeFsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "utf8" => Ok(Self::Utf8),
            "ascii" => Ok(Self::Ascii),
            "base64" => Ok(Self::Base64),
            _ => Err(NativeFsError::InvalidEncoding(s.to_string())),
        }
    }
}

/// Decodes a base64 transport string into raw bytes.
///
/// # Errors
///
/// Returns [`NativeFsError::MalformedContent`] if `transport` is not valid base64.
pub fn decode_transport(transport: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(transport)
        .map_err(|e| NativeFsError::MalformedContent(format!("invalid base64: {e}")))
}

/// Encodes raw bytes into a base64 transport string.
#[must_use]
pub fn encode_transport(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes `transport` using an encoding given by name.
///
/// # Errors
///
/// Returns [`NativeFsError::InvalidEncoding`] for an unknown name, or the
/// errors of [`Encoding::decode`].
pub fn decode(transport: &str, encoding: &str) -> Result<String> {
    encoding.parse::<Encoding>()?.decode(transport)
}

/// Encodes `content` using an encoding given by name.
///
/// # Errors
///
/// Returns [`NativeFsError::InvalidEncoding`] for an unknown name, or the
/// errors of [`Encoding::encode`].
pub fn encode(content: &str, encoding: &str) -> Result<String> {
    encoding.parse::<Encoding>()?.encode(content)
}

/// Options for content-bearing reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodingOptions {
    /// Encoding of the caller-side content. Defaults to `utf8`.
    #[serde(default)]
    pub encoding: Encoding,
}

impl From<Encoding> for EncodingOptions {
    fn from(encoding: Encoding) -> Self {
        Self { encoding }
    }
}

impl From<Option<Encoding>> for EncodingOptions {
    fn from(encoding: Option<Encoding>) -> Self {
        Self {
            encoding: encoding.unwrap_or_default(),
        }
    }
}

impl TryFrom<&str> for EncodingOptions {
    type Error = NativeFsError;

    fn try_from(name: &str) -> Result<Self> {
        name.parse::<Encoding>().map(Self::from)
    }
}

/// Anything content-bearing operations accept as their encoding argument.
///
/// Typed values convert infallibly; names are resolved with
/// [`Encoding::from_str`] and fail with [`NativeFsError::InvalidEncoding`].
pub trait IntoEncodingOptions {
    /// Resolves `self` into options.
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::InvalidEncoding`] for an unknown encoding name.
    fn into_encoding_options(self) -> Result<EncodingOptions>;
}

impl IntoEncodingOptions for EncodingOptions {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        Ok(self)
    }
}

impl IntoEncodingOptions for Encoding {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        Ok(self.into())
    }
}

impl IntoEncodingOptions for Option<Encoding> {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        Ok(self.into())
    }
}

impl IntoEncodingOptions for &str {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        EncodingOptions::try_from(self)
    }
}

impl IntoEncodingOptions for &String {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        EncodingOptions::try_from(self.as_str())
    }
}

impl IntoEncodingOptions for String {
    fn into_encoding_options(self) -> Result<EncodingOptions> {
        EncodingOptions::try_from(self.as_str())
    }
}
