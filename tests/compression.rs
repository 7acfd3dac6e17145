//! Integration tests for the compression filters behind the gateway

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use codec_gateway::config::{CodecConfig, CompressionConfig};
use codec_gateway::utils::compression::{compress, decompress};
use codec_gateway::{Codec, CodecError, CompressionKind, Format, Payload};
use serde_json::json;

#[test]
fn test_compressed_output_is_smaller_for_repetitive_payloads() {
    let codec = Codec::default();
    let payload = json!({"blob": "abc".repeat(10_000)});
    let plain = codec.encode(&payload, Format::Json, false).unwrap();

    for kind in [CompressionKind::Gzip, CompressionKind::Brotli] {
        let compressed = codec.encode(&payload, Format::Json, kind).unwrap();
        assert!(
            compressed.len() < plain.len() / 10,
            "{kind} barely compressed: {} -> {}",
            plain.len(),
            compressed.len()
        );
    }
}

#[tokio::test]
async fn test_gzip_output_readable_by_stock_decoder() {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let codec = Codec::default();
    let artifact = codec.encode(&json!({"x": 1}), Format::Json, "gzip").unwrap();

    let mut text = String::new();
    GzDecoder::new(artifact.as_bytes())
        .read_to_string(&mut text)
        .expect("stock gzip decoder should read the artifact");
    assert_eq!(text, r#"{"x":1}"#);
}

#[tokio::test]
async fn test_externally_compressed_input_decodes() {
    let settings = CompressionConfig {
        gzip_level: 1,
        brotli_quality: 3,
        ..CompressionConfig::default()
    };
    let codec = Codec::default();
    let json_bytes = br#"{"from":"elsewhere"}"#;

    for kind in [CompressionKind::Gzip, CompressionKind::Brotli] {
        let compressed = compress(json_bytes, kind, &settings).unwrap();
        let value: Payload = codec.decode(compressed, Format::Json, kind).await.unwrap();
        assert_eq!(value, json!({"from": "elsewhere"}));
    }
}

#[tokio::test]
async fn test_binary_formats_stay_binary_after_decompression() {
    let codec = Codec::default();
    // msgpack bytes are not valid UTF-8, so decoding must not force text
    let payload = json!({"bin": 255, "neg": -1, "text": "ok"});

    for format in [Format::MessagePack, Format::Bson] {
        for kind in [CompressionKind::Gzip, CompressionKind::Brotli] {
            let artifact = codec.encode(&payload, format, kind).unwrap();
            let value: Payload = codec.decode(artifact, format, kind).await.unwrap();
            assert_eq!(value, payload, "{format} + {kind}");
        }
    }
}

#[tokio::test]
async fn test_decompressed_non_utf8_for_text_format_is_invalid() {
    let settings = CompressionConfig::default();
    let codec = Codec::default();
    let compressed = compress(&[0xff, 0xfe, 0x00, 0x80], CompressionKind::Gzip, &settings).unwrap();

    let result = codec.decode::<Payload>(compressed, Format::Json, "gzip").await;
    match result {
        Err(CodecError::InvalidDataOrFormat(msg)) => assert!(msg.contains("UTF-8")),
        other => panic!("expected InvalidDataOrFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn test_limit_applies_per_codec() {
    let payload = json!({"blob": "z".repeat(8 * 1024)});
    let artifact = Codec::default().encode(&payload, Format::Json, "brotli").unwrap();

    let strict = Codec::new(CodecConfig::default_with_overrides(|c| {
        c.compression.max_decompressed_size = 4 * 1024;
    }));
    assert!(matches!(
        strict.decode::<Payload>(artifact.clone(), Format::Json, "brotli").await,
        Err(CodecError::InvalidDataOrFormat(_))
    ));

    let roomy: Payload = Codec::default().decode(artifact, Format::Json, "brotli").await.unwrap();
    assert_eq!(roomy, payload);
}

#[test]
fn test_every_gzip_level_roundtrips() {
    let data = b"level sweep ".repeat(500);
    for level in 0..=9 {
        let settings = CompressionConfig {
            gzip_level: level,
            ..CompressionConfig::default()
        };
        let compressed = compress(&data, CompressionKind::Gzip, &settings).unwrap();
        assert_eq!(decompress(&compressed, CompressionKind::Gzip, &settings).unwrap(), data);
    }
}
