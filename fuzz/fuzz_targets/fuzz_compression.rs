#![no_main]

use codec_gateway::config::CompressionConfig;
use codec_gateway::utils::compression::{compress, decompress, CompressionKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let settings = CompressionConfig {
        max_decompressed_size: 1024 * 1024,
        ..CompressionConfig::default()
    };

    for kind in [CompressionKind::Gzip, CompressionKind::Brotli] {
        // Compressed output must always decompress back to the input
        if let Ok(compressed) = compress(data, kind, &settings) {
            if let Ok(out) = decompress(&compressed, kind, &settings) {
                assert_eq!(out, data);
            }
        }

        // Raw decompression of arbitrary bytes must not panic and must respect the limit
        if let Ok(out) = decompress(data, kind, &settings) {
            assert!(out.len() <= settings.max_decompressed_size);
        }
    }
});
