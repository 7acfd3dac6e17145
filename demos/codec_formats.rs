//! Example: Encoding one payload in every format
//!
//! This example walks a profile through JSON, MessagePack, BSON and XML,
//! then layers gzip and brotli on top and compares artifact sizes.
//!
//! Run with: `cargo run --example codec_formats`

#![allow(clippy::uninlined_format_args)]

use codec_gateway::config::CodecConfig;
use codec_gateway::utils::logging::init_logging;
use codec_gateway::{Codec, CodecError, CompressionKind, Format, Payload};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
    roles: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CodecConfig::from_env()?;
    config.validate_strict()?;
    init_logging(&config.logging)?;

    let codec = Codec::new(config);

    println!("=== Codec Gateway Formats Demo ===\n");

    let profile = Profile {
        name: "Alice".to_string(),
        age: 30,
        roles: vec!["Admin".to_string(), "Editor".to_string()],
    };
    println!("Original profile: {:?}\n", profile);

    // 1. Typed roundtrip through every document format
    println!("1. TYPED ROUNDTRIP");
    for format in [Format::Json, Format::MessagePack, Format::Bson] {
        let artifact = codec.encode(&profile, format, false)?;
        let recovered: Profile = codec.decode(artifact.clone(), format, false).await?;
        println!(
            "   - {:12}: {:4} bytes ({}) | Roundtrip: {}",
            format.name(),
            artifact.len(),
            artifact.kind(),
            if profile == recovered { "✓" } else { "✗" }
        );
    }
    println!();

    // 2. JSON is compact text
    println!("2. JSON");
    let artifact = codec.encode(&profile, Format::Json, false)?;
    println!("   - {}", artifact.as_text().unwrap_or_default());
    println!();

    // 3. XML decodes to a tree, not the original value
    println!("3. XML");
    let user = json!({"user": {"name": "Carol", "age": 25}});
    let artifact = codec.encode(&user, Format::Xml, false)?;
    println!("{}", artifact.as_text().unwrap_or_default());
    let tree: Payload = codec.decode(artifact, Format::Xml, false).await?;
    println!("   - Decoded tree: {}", tree);
    println!("   - Leaves come back as one-item sequences of text");
    println!();

    // 4. Compression
    println!("4. COMPRESSION");
    let items: Vec<Payload> = (0..200)
        .map(|i| json!({"id": i, "label": format!("item-{i}")}))
        .collect();
    let catalog = json!({"items": items});

    for format in Format::ALL {
        let plain = codec.encode(&catalog, format, false)?.len();
        print!("   - {:12}: {:6} bytes", format.name(), plain);
        for kind in [CompressionKind::Gzip, CompressionKind::Brotli] {
            let compressed = codec.encode(&catalog, format, kind)?;
            print!(" | {} {:5} bytes", kind, compressed.len());
        }
        println!();
    }
    println!();

    // 5. Errors name the offending selector
    println!("5. ERRORS");
    let errors: [CodecError; 3] = [
        codec.encode_tagged(&catalog, "yaml", false).err().ok_or("yaml accepted")?,
        codec.encode(&catalog, Format::Json, "lz4").err().ok_or("lz4 accepted")?,
        codec.encode("bare string", Format::Bson, false).err().ok_or("bson accepted a string")?,
    ];
    for err in errors {
        println!("   - {}", err);
    }

    Ok(())
}
