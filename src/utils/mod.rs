//! # Utility Modules
//!
//! Supporting utilities for compression, logging, and timing.
//!
//! ## Components
//! - **Compression**: gzip and brotli filters with a decompressed size limit
//! - **Logging**: structured logging configuration
//! - **Timing**: elapsed-time debug events for encode/decode
//!
//! ## Security
//! - Decompression bomb protection (16 MiB default limit)

pub mod compression;
pub mod logging;
pub mod timing;

// Re-export public types for advanced users
pub use compression::CompressionKind;
