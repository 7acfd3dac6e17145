//! # Codec Gateway
//!
//! The single entry point callers use to turn payloads into artifacts and
//! back.
//!
//! ```text
//! encode: payload -> [format encode] -> text | bytes -> [compression] -> artifact
//! decode: artifact -> [decompression] -> text | bytes -> [format decode] -> payload
//! ```
//!
//! The gateway is stateless: it holds an immutable [`CodecConfig`] and every
//! call is independent, so one `Codec` can be shared freely across threads.
//! Artifacts carry no record of how they were produced; `decode` must be given
//! the same format and compression that `encode` used.
//!
//! ## Compression selectors
//! Anything convertible into a [`CompressionOption`] selects compression:
//! - `false` / `None` / `"none"`: no compression
//! - `true`: gzip
//! - `CompressionKind::Gzip` / `"gzip"`, `CompressionKind::Brotli` / `"brotli"`
//!
//! Unknown textual tags fail with `UnsupportedCompression` on encode and
//! `UnsupportedDecompression` on decode.
//!
//! ## Usage
//! ```rust
//! use codec_gateway::{Codec, CompressionKind, Format, Payload};
//! use serde_json::json;
//!
//! # async fn demo() -> codec_gateway::error::Result<()> {
//! let codec = Codec::default();
//! let artifact = codec.encode(&json!({"x": 1}), Format::Json, CompressionKind::Brotli)?;
//! assert!(artifact.is_binary());
//!
//! let payload: Payload = codec.decode(artifact, Format::Json, "brotli").await?;
//! assert_eq!(payload, json!({"x": 1}));
//! # Ok(())
//! # }
//! ```

use crate::config::CodecConfig;
use crate::core::artifact::Artifact;
use crate::core::serialization::{decode_format, encode_format, Format};
use crate::error::constants::ERR_DECOMPRESSED_NOT_UTF8;
use crate::error::{CodecError, Result};
use crate::utils::compression::{compress, decompress, CompressionKind};
use crate::utils::timing::Timer;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

/// Caller-facing compression selector: a flag, a typed algorithm or a textual tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOption<'a> {
    /// `false` disables compression, `true` selects gzip
    Flag(bool),
    /// A typed algorithm, or `None` for no compression
    Kind(Option<CompressionKind>),
    /// A textual tag, validated when the call is made
    Tag(&'a str),
}

/// Which half of the pipeline is resolving a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl CompressionOption<'_> {
    /// Resolve the selector into an algorithm, or `None` for no compression
    ///
    /// # Errors
    /// Unknown tags yield `UnsupportedCompression` when compressing and
    /// `UnsupportedDecompression` when decompressing.
    pub fn resolve(self, direction: Direction) -> Result<Option<CompressionKind>> {
        match self {
            CompressionOption::Flag(false) => Ok(None),
            CompressionOption::Flag(true) => Ok(Some(CompressionKind::Gzip)),
            CompressionOption::Kind(kind) => Ok(kind),
            CompressionOption::Tag("none") => Ok(None),
            CompressionOption::Tag(tag) => match CompressionKind::from_tag(tag) {
                Some(kind) => Ok(Some(kind)),
                None => Err(match direction {
                    Direction::Compress => CodecError::UnsupportedCompression(tag.to_string()),
                    Direction::Decompress => CodecError::UnsupportedDecompression(tag.to_string()),
                }),
            },
        }
    }
}

impl Default for CompressionOption<'_> {
    fn default() -> Self {
        CompressionOption::Flag(false)
    }
}

impl From<bool> for CompressionOption<'_> {
    fn from(flag: bool) -> Self {
        CompressionOption::Flag(flag)
    }
}

impl From<CompressionKind> for CompressionOption<'_> {
    fn from(kind: CompressionKind) -> Self {
        CompressionOption::Kind(Some(kind))
    }
}

impl From<Option<CompressionKind>> for CompressionOption<'_> {
    fn from(kind: Option<CompressionKind>) -> Self {
        CompressionOption::Kind(kind)
    }
}

impl<'a> From<&'a str> for CompressionOption<'a> {
    fn from(tag: &'a str) -> Self {
        CompressionOption::Tag(tag)
    }
}

impl<'a> From<&'a String> for CompressionOption<'a> {
    fn from(tag: &'a String) -> Self {
        CompressionOption::Tag(tag.as_str())
    }
}

/// Stateless multi-format encoder/decoder
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec that applies `config` to every call
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The configuration this codec was built with
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Serialize `data` into `format`, then apply the selected compression
    ///
    /// Uncompressed JSON and XML yield text artifacts; everything else is binary.
    ///
    /// # Errors
    /// - `UnsupportedCompression` for an unknown compression tag
    /// - `TypeMismatch` for a non-mapping payload under BSON, or a bare sequence under XML
    /// - `SerializeError` when the format encoder rejects the value
    /// - `CompressionFailure` when the compression filter fails
    pub fn encode<'a, T>(
        &self,
        data: &T,
        format: Format,
        compress_with: impl Into<CompressionOption<'a>>,
    ) -> Result<Artifact>
    where
        T: Serialize + ?Sized,
    {
        let compression = compress_with.into().resolve(Direction::Compress)?;
        let _timer = Timer::start("encode");

        let encoded = encode_format(data, format, &self.config.xml)?;
        trace!(%format, kind = encoded.kind(), size = encoded.len(), "Payload encoded");

        let Some(kind) = compression else {
            return Ok(encoded);
        };

        let compressed = compress(encoded.as_bytes(), kind, &self.config.compression)?;
        debug!(
            %format,
            compression = %kind,
            encoded_size = encoded.len(),
            compressed_size = compressed.len(),
            "Artifact compressed"
        );
        Ok(Artifact::Binary(Bytes::from(compressed)))
    }

    /// Encode with a textual format tag, as received from an outer request layer
    ///
    /// # Errors
    /// `UnsupportedFormat` naming the tag when it is not one of
    /// `json`, `msgpack`, `bson`, `xml`; otherwise as [`Codec::encode`].
    pub fn encode_tagged<'a, T>(
        &self,
        data: &T,
        format: &str,
        compress_with: impl Into<CompressionOption<'a>>,
    ) -> Result<Artifact>
    where
        T: Serialize + ?Sized,
    {
        let format: Format = format.parse()?;
        self.encode(data, format, compress_with)
    }

    /// Undo the selected compression, then deserialize from `format`
    ///
    /// Always awaited; the work itself never suspends.
    ///
    /// # Errors
    /// - `UnsupportedDecompression` for an unknown decompression tag
    /// - `InvalidDataOrFormat` for corrupt compressed bytes, oversize output,
    ///   malformed input, or a text/binary artifact the format cannot read
    pub async fn decode<'a, T>(
        &self,
        data: impl Into<Artifact>,
        format: Format,
        decompress_with: impl Into<CompressionOption<'a>>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let compression = decompress_with.into().resolve(Direction::Decompress)?;
        self.decode_resolved(data.into(), format, compression)
    }

    /// Decode with a textual format tag, as received from an outer request layer
    ///
    /// The decompression selector is checked first. An unknown format tag is
    /// reported as `InvalidDataOrFormat` naming the tag.
    pub async fn decode_tagged<'a, T>(
        &self,
        data: impl Into<Artifact>,
        format: &str,
        decompress_with: impl Into<CompressionOption<'a>>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let compression = decompress_with.into().resolve(Direction::Decompress)?;
        let format: Format = format.parse().map_err(|e| match e {
            CodecError::UnsupportedFormat(tag) => {
                CodecError::invalid(format_args!("unknown format tag {tag:?}"))
            }
            other => other,
        })?;
        self.decode_resolved(data.into(), format, compression)
    }

    fn decode_resolved<T>(
        &self,
        artifact: Artifact,
        format: Format,
        compression: Option<CompressionKind>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let _timer = Timer::start("decode");

        let artifact = match compression {
            None => artifact,
            Some(kind) => {
                let raw = decompress(artifact.as_bytes(), kind, &self.config.compression)?;
                debug!(
                    %format,
                    compression = %kind,
                    compressed_size = artifact.len(),
                    decompressed_size = raw.len(),
                    "Artifact decompressed"
                );
                if format.is_text() {
                    String::from_utf8(raw)
                        .map(Artifact::Text)
                        .map_err(|_| CodecError::invalid(ERR_DECOMPRESSED_NOT_UTF8))?
                } else {
                    Artifact::Binary(Bytes::from(raw))
                }
            }
        };

        trace!(%format, kind = artifact.kind(), size = artifact.len(), "Decoding artifact");
        decode_format(artifact, format, &self.config.decode)
    }
}
