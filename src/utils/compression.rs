use crate::config::CompressionConfig;
use crate::error::constants::{ERR_DECOMPRESSION_FAILED, ERR_DECOMPRESSION_LIMIT};
use crate::error::{CodecError, Result};
use std::fmt;
use std::io::{Read, Write};

/// Compression filters that can be layered over any format
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    Gzip,
    Brotli,
}

impl CompressionKind {
    /// The textual tag callers use to select this algorithm
    pub fn tag(self) -> &'static str {
        match self {
            CompressionKind::Gzip => "gzip",
            CompressionKind::Brotli => "brotli",
        }
    }

    /// Look up an algorithm by its textual tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "gzip" => Some(CompressionKind::Gzip),
            "brotli" => Some(CompressionKind::Brotli),
            _ => None,
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Compresses data using the specified compression algorithm
///
/// # Errors
/// Returns `CodecError::CompressionFailure` if the encoder fails to write
pub fn compress(
    data: &[u8],
    kind: CompressionKind,
    settings: &CompressionConfig,
) -> Result<Vec<u8>> {
    match kind {
        CompressionKind::Gzip => {
            let mut encoder = flate2::write::GzEncoder::new(
                Vec::with_capacity(data.len() / 2),
                flate2::Compression::new(settings.gzip_level),
            );
            encoder
                .write_all(data)
                .map_err(|e| CodecError::CompressionFailure(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| CodecError::CompressionFailure(e.to_string()))
        }
        CompressionKind::Brotli => {
            let mut encoder = brotli::CompressorWriter::new(
                Vec::with_capacity(data.len() / 2),
                settings.buffer_size,
                settings.brotli_quality,
                settings.brotli_window,
            );
            encoder
                .write_all(data)
                .map_err(|e| CodecError::CompressionFailure(e.to_string()))?;
            encoder
                .flush()
                .map_err(|e| CodecError::CompressionFailure(e.to_string()))?;
            // into_inner finishes the stream
            Ok(encoder.into_inner())
        }
    }
}

/// Decompresses data that was compressed with the specified algorithm
///
/// Enforces `settings.max_decompressed_size` on the output to prevent
/// decompression bombs.
///
/// # Errors
/// Returns `CodecError::InvalidDataOrFormat` if:
/// - the input is not a valid stream for the algorithm
/// - the output exceeds the configured size limit
pub fn decompress(
    data: &[u8],
    kind: CompressionKind,
    settings: &CompressionConfig,
) -> Result<Vec<u8>> {
    match kind {
        CompressionKind::Gzip => {
            read_limited(flate2::read::MultiGzDecoder::new(data), kind, settings)
        }
        CompressionKind::Brotli => read_limited(
            brotli::Decompressor::new(data, settings.buffer_size),
            kind,
            settings,
        ),
    }
}

// Read in chunks so the size limit is checked before the output grows past it
fn read_limited<R: Read>(
    mut reader: R,
    kind: CompressionKind,
    settings: &CompressionConfig,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buffer = vec![0u8; settings.buffer_size.max(1)];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                if out.len() + n > settings.max_decompressed_size {
                    return Err(CodecError::invalid(format_args!(
                        "{kind} {ERR_DECOMPRESSION_LIMIT} ({} bytes)",
                        settings.max_decompressed_size
                    )));
                }
                out.extend_from_slice(&buffer[..n]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CodecError::invalid(format_args!(
                    "{kind} {ERR_DECOMPRESSION_FAILED}: {e}"
                )))
            }
        }
    }
    Ok(out)
}
