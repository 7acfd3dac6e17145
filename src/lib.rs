//! # Codec Gateway
//!
//! Multi-format payload serializer with optional compression.
//!
//! One contract converts in-memory values to and from four wire formats, with
//! a compression filter layered orthogonally on top:
//!
//! | Format    | Tag       | Artifact | Notes                                    |
//! |-----------|-----------|----------|------------------------------------------|
//! | JSON      | `json`    | text     | compact, keys in insertion order         |
//! | MessagePack | `msgpack` | binary | maps and arrays                          |
//! | BSON      | `bson`    | binary   | mapping payloads only                    |
//! | XML       | `xml`     | text     | leaves decode as single-item sequences   |
//!
//! Compression is `gzip` or `brotli` (or `true` as shorthand for gzip) and
//! always produces a binary artifact.
//!
//! ## Example
//! ```rust
//! use codec_gateway::{decode, encode, Format, Payload};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> codec_gateway::error::Result<()> {
//! let artifact = encode(&json!({"x": 1}), Format::Json, false)?;
//! assert_eq!(artifact.as_text(), Some(r#"{"x":1}"#));
//!
//! let xml = encode(&json!({"user": {"name": "Carol", "age": 25}}), Format::Xml, false)?;
//! let tree: Payload = decode(xml, Format::Xml, false).await?;
//! assert_eq!(tree, json!({"user": {"name": ["Carol"], "age": ["25"]}}));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`codec`]: the gateway and its compression selectors
//! - [`core`]: artifacts, format dispatch, the XML tree codec
//! - [`utils`]: compression filters, logging, timing
//! - [`config`]: TOML/env configuration with validation
//! - [`error`]: the error taxonomy

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::codec::{Codec, CompressionOption, Direction};
pub use crate::config::CodecConfig;
pub use crate::core::artifact::Artifact;
pub use crate::core::serialization::{Format, SerializationFormat};
pub use crate::error::{CodecError, Result};
pub use crate::utils::compression::CompressionKind;

/// Dynamic payload: mapping, sequence, text, number, boolean or null
pub type Payload = serde_json::Value;

/// Encode with a default [`Codec`]
pub fn encode<'a, T>(
    data: &T,
    format: Format,
    compress_with: impl Into<CompressionOption<'a>>,
) -> Result<Artifact>
where
    T: serde::Serialize + ?Sized,
{
    Codec::default().encode(data, format, compress_with)
}

/// Decode with a default [`Codec`]
pub async fn decode<'a, T>(
    data: impl Into<Artifact>,
    format: Format,
    decompress_with: impl Into<CompressionOption<'a>>,
) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    Codec::default().decode(data, format, decompress_with).await
}
