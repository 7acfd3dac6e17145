//! # Serialization Formats
//!
//! This module provides the format layer of the gateway: one closed set of
//! wire formats and a single encode/decode dispatch over it.
//!
//! ## Formats
//! - **JSON**: compact text, keys in insertion order (`{"x":1}`)
//! - **MessagePack**: compact binary map/array notation; structs encode as maps
//! - **BSON**: binary document notation; the payload must be a mapping
//! - **XML**: markup tree, see [`crate::core::xml`] for the tree conventions
//!
//! ## Text vs binary
//! JSON and XML produce [`Artifact::Text`], MessagePack and BSON produce
//! [`Artifact::Binary`]. Decoders insist on the same kind: a binary artifact
//! never reaches the JSON parser.
//!
//! ## Limits
//! Decoders reject input nested deeper than [`DecodeConfig::max_depth`] with
//! `InvalidDataOrFormat` before any recursive deserializer sees it.
//!
//! ## Usage
//! ```rust
//! use codec_gateway::config::{DecodeConfig, XmlConfig};
//! use codec_gateway::core::serialization::{decode_format, encode_format, Format};
//! use serde_json::{json, Value};
//!
//! let artifact = encode_format(&json!({"x": 1}), Format::Json, &XmlConfig::default()).unwrap();
//! assert_eq!(artifact.as_text(), Some(r#"{"x":1}"#));
//!
//! let limits = DecodeConfig::default();
//! let value: Value = decode_format(artifact, Format::Json, &limits).unwrap();
//! assert_eq!(value, json!({"x": 1}));
//! ```

use crate::config::{DecodeConfig, XmlConfig};
use crate::core::artifact::Artifact;
use crate::core::{json, xml};
use crate::error::constants::{ERR_EXPECTED_BINARY, ERR_EXPECTED_TEXT, ERR_NESTING_LIMIT};
use crate::error::{CodecError, Result};
use bson::{Bson, RawBsonRef, RawDocument};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationFormat {
    /// Human-readable JSON text
    Json,
    /// Compact binary map/array encoding
    MessagePack,
    /// Binary document encoding, mappings only
    Bson,
    /// Markup tree text
    Xml,
}

/// Short alias used throughout the public API
pub type Format = SerializationFormat;

impl SerializationFormat {
    /// All formats, in tag order
    pub const ALL: [SerializationFormat; 4] = [
        SerializationFormat::Json,
        SerializationFormat::MessagePack,
        SerializationFormat::Bson,
        SerializationFormat::Xml,
    ];

    /// The textual tag callers use to select this format
    pub fn tag(self) -> &'static str {
        match self {
            SerializationFormat::Json => "json",
            SerializationFormat::MessagePack => "msgpack",
            SerializationFormat::Bson => "bson",
            SerializationFormat::Xml => "xml",
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
            SerializationFormat::Bson => "BSON",
            SerializationFormat::Xml => "XML",
        }
    }

    /// Whether the encoder produces text (and the decoder expects text)
    pub fn is_text(self) -> bool {
        matches!(self, SerializationFormat::Json | SerializationFormat::Xml)
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SerializationFormat {
    type Err = CodecError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "json" => Ok(SerializationFormat::Json),
            "msgpack" => Ok(SerializationFormat::MessagePack),
            "bson" => Ok(SerializationFormat::Bson),
            "xml" => Ok(SerializationFormat::Xml),
            other => Err(CodecError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Serialize a value into an uncompressed artifact of the given format
pub fn encode_format<T>(data: &T, format: Format, xml_config: &XmlConfig) -> Result<Artifact>
where
    T: Serialize + ?Sized,
{
    match format {
        Format::Json => json::to_string(data).map(Artifact::Text),
        Format::MessagePack => rmp_serde::to_vec_named(data)
            .map(|bytes| Artifact::Binary(Bytes::from(bytes)))
            .map_err(CodecError::serialize),
        Format::Bson => encode_bson(data),
        Format::Xml => {
            let tree = serde_json::to_value(data).map_err(CodecError::serialize)?;
            xml::build(&tree, xml_config).map(Artifact::Text)
        }
    }
}

/// Deserialize an uncompressed artifact of the given format
pub fn decode_format<T>(artifact: Artifact, format: Format, limits: &DecodeConfig) -> Result<T>
where
    T: DeserializeOwned,
{
    match (format, artifact) {
        (Format::Json, Artifact::Text(text)) => {
            if json_nesting_exceeds(&text, limits.max_depth) {
                return Err(CodecError::invalid(ERR_NESTING_LIMIT));
            }
            serde_json::from_str(&text).map_err(CodecError::invalid)
        }
        (Format::MessagePack, Artifact::Binary(bytes)) => {
            let mut deserializer = rmp_serde::Deserializer::new(&bytes[..]);
            deserializer.set_max_depth(limits.max_depth);
            T::deserialize(&mut deserializer).map_err(CodecError::invalid)
        }
        (Format::Bson, Artifact::Binary(bytes)) => {
            let document = RawDocument::from_bytes(&bytes).map_err(CodecError::invalid)?;
            check_bson_depth(document, 1, limits.max_depth)?;
            bson::from_slice(&bytes).map_err(CodecError::invalid)
        }
        (Format::Xml, Artifact::Text(text)) => {
            let tree = xml::parse(&text, limits.max_depth)?;
            serde_json::from_value(tree).map_err(CodecError::invalid)
        }
        (format, Artifact::Binary(_)) => Err(CodecError::invalid(format_args!(
            "{format} {ERR_EXPECTED_TEXT}"
        ))),
        (format, Artifact::Text(_)) => Err(CodecError::invalid(format_args!(
            "{format} {ERR_EXPECTED_BINARY}"
        ))),
    }
}

// Deepest `[`/`{` nesting outside string literals
fn json_nesting_exceeds(text: &str, max_depth: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max_depth {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

// Walks the raw document so `bson::from_slice` never recurses past the limit
fn check_bson_depth(document: &RawDocument, depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(CodecError::invalid(ERR_NESTING_LIMIT));
    }
    for element in document {
        let (_, value) = element.map_err(CodecError::invalid)?;
        check_bson_value(value, depth, max_depth)?;
    }
    Ok(())
}

fn check_bson_value(value: RawBsonRef<'_>, depth: usize, max_depth: usize) -> Result<()> {
    match value {
        RawBsonRef::Document(document) => check_bson_depth(document, depth + 1, max_depth),
        RawBsonRef::Array(array) => {
            if depth + 1 > max_depth {
                return Err(CodecError::invalid(ERR_NESTING_LIMIT));
            }
            for item in array {
                check_bson_value(item.map_err(CodecError::invalid)?, depth + 1, max_depth)?;
            }
            Ok(())
        }
        RawBsonRef::JavaScriptCodeWithScope(code) => {
            check_bson_depth(code.scope, depth + 1, max_depth)
        }
        _ => Ok(()),
    }
}

// BSON only has a top-level representation for documents
fn encode_bson<T>(data: &T) -> Result<Artifact>
where
    T: Serialize + ?Sized,
{
    let document = match bson::to_bson(data).map_err(CodecError::serialize)? {
        Bson::Document(document) => document,
        other => {
            return Err(CodecError::TypeMismatch {
                format: Format::Bson,
                found: bson_kind(&other),
            })
        }
    };

    let mut out = Vec::new();
    document
        .to_writer(&mut out)
        .map_err(CodecError::serialize)?;
    Ok(Artifact::Binary(Bytes::from(out)))
}

fn bson_kind(value: &Bson) -> &'static str {
    match value {
        Bson::Null | Bson::Undefined => "null",
        Bson::String(_) | Bson::Symbol(_) => "string",
        Bson::Array(_) => "sequence",
        Bson::Boolean(_) => "boolean",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => "number",
        Bson::Binary(_) => "bytes",
        _ => "value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Member {
        role: String,
        active: bool,
    }

    fn xml_config() -> XmlConfig {
        XmlConfig::default()
    }

    fn limits() -> DecodeConfig {
        DecodeConfig::default()
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_tag_roundtrip() {
        for format in Format::ALL {
            let parsed: Format = format.tag().parse().expect("known tag");
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_unknown_tag_is_named() {
        match "yaml".parse::<Format>() {
            Err(CodecError::UnsupportedFormat(tag)) => assert_eq!(tag, "yaml"),
            other => panic!("unexpected result: {other:?}"),
        }
        // tags are case-sensitive
        assert!("JSON".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(Format::Json.name(), "JSON");
        assert_eq!(Format::MessagePack.name(), "MessagePack");
        assert_eq!(Format::Bson.name(), "BSON");
        assert_eq!(Format::Xml.name(), "XML");
        assert!(Format::Json.is_text());
        assert!(!Format::Bson.is_text());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_json_is_compact_and_ordered() {
        let data = json!({"name": "Alice", "age": 30});
        let artifact = encode_format(&data, Format::Json, &xml_config()).expect("serialize");
        assert_eq!(artifact.as_text(), Some(r#"{"name":"Alice","age":30}"#));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_messagepack_struct_as_map() {
        let member = Member {
            role: "Admin".to_string(),
            active: true,
        };
        let artifact =
            encode_format(&member, Format::MessagePack, &xml_config()).expect("serialize");
        assert!(artifact.is_binary());

        // fixmap with two entries
        assert_eq!(artifact.as_bytes()[0], 0x82);

        let as_value: Value =
            decode_format(artifact.clone(), Format::MessagePack, &limits()).expect("decode");
        assert_eq!(as_value, json!({"role": "Admin", "active": true}));

        let recovered: Member =
            decode_format(artifact, Format::MessagePack, &limits()).expect("decode");
        assert_eq!(recovered, member);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_bson_document_roundtrip() {
        let data = json!({"user": "Bob", "age": 40});
        let artifact = encode_format(&data, Format::Bson, &xml_config()).expect("serialize");
        assert!(artifact.is_binary());

        // BSON documents open with their little-endian total length
        let bytes = artifact.as_bytes();
        let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(declared, bytes.len());

        let recovered: Value = decode_format(artifact, Format::Bson, &limits()).expect("decode");
        assert_eq!(recovered, data);
    }

    #[test]
    fn test_bson_rejects_non_documents() {
        for (payload, kind) in [
            (json!("bare string"), "string"),
            (json!(null), "null"),
            (json!([1, 2]), "sequence"),
            (json!(7), "number"),
        ] {
            match encode_format(&payload, Format::Bson, &xml_config()) {
                Err(CodecError::TypeMismatch { format, found }) => {
                    assert_eq!(format, Format::Bson);
                    assert_eq!(found, kind);
                }
                other => panic!("unexpected result for {payload}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_decoders_enforce_artifact_kind() {
        let binary = Artifact::from(b"{}".as_slice());
        assert!(matches!(
            decode_format::<Value>(binary, Format::Json, &limits()),
            Err(CodecError::InvalidDataOrFormat(_))
        ));

        let text = Artifact::from("{}");
        assert!(matches!(
            decode_format::<Value>(text.clone(), Format::MessagePack, &limits()),
            Err(CodecError::InvalidDataOrFormat(_))
        ));
        assert!(matches!(
            decode_format::<Value>(text, Format::Bson, &limits()),
            Err(CodecError::InvalidDataOrFormat(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let result = decode_format::<Value>(Artifact::from("not-json"), Format::Json, &limits());
        assert!(matches!(result, Err(CodecError::InvalidDataOrFormat(_))));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_json_floats_use_stringify_notation() {
        let data = json!({"whole": 1.0, "big": 1e21, "small": 1.5e-7, "zero": -0.0});
        let artifact = encode_format(&data, Format::Json, &xml_config()).expect("serialize");
        assert_eq!(
            artifact.as_text(),
            Some(r#"{"whole":1,"big":1e+21,"small":1.5e-7,"zero":0}"#)
        );
    }

    #[test]
    fn test_json_nesting_scan_skips_strings() {
        assert!(!json_nesting_exceeds(r#"{"a":"[[[[[[[["}"#, 2));
        assert!(!json_nesting_exceeds(r#"["\"[[[["]"#, 1));
        assert!(json_nesting_exceeds("[[[]]]", 2));
        assert!(!json_nesting_exceeds("[[]][[]]", 2));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_depth_limit_counts_the_root() {
        let data = json!({"a": {"b": [1]}});
        let exact = DecodeConfig { max_depth: 3 };
        let tight = DecodeConfig { max_depth: 2 };

        for format in [Format::Json, Format::MessagePack, Format::Bson] {
            let artifact = encode_format(&data, format, &xml_config()).expect("serialize");
            let value: Value =
                decode_format(artifact.clone(), format, &exact).expect("decode");
            assert_eq!(value, data, "{format}");
            assert!(
                matches!(
                    decode_format::<Value>(artifact, format, &tight),
                    Err(CodecError::InvalidDataOrFormat(_))
                ),
                "{format} should reject depth 3 under a limit of 2"
            );
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_format_sizes() {
        let data = json!({"command": "benchmark", "payload": [1, 2, 3, 4, 5, 6, 7, 8]});

        let json_size = encode_format(&data, Format::Json, &xml_config()).expect("json").len();
        let msgpack_size = encode_format(&data, Format::MessagePack, &xml_config())
            .expect("msgpack")
            .len();

        // MessagePack should be more compact than JSON
        assert!(msgpack_size < json_size);
    }
}
