//! # Configuration Management
//!
//! Centralized configuration for the codec gateway.
//!
//! This module provides structured configuration for the compression filters,
//! the decoders, the XML tree builder and logging. The gateway itself only reads its
//! configuration; every call is independent of every other.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()` (`CODEC_GATEWAY_*`)
//! - Direct instantiation with defaults
//!
//! ## Security Considerations
//! - Decompressed output is capped at 16 MiB by default to defeat decompression bombs
//! - Decoded nesting depth is capped at 128 levels by default
//! - Compression parameters are range-checked by `validate()`

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Max allowed decompressed size (16 MiB)
pub const MAX_DECOMPRESSED_SIZE: usize = 16 * 1024 * 1024;

/// Max nesting depth accepted by the decoders
pub const MAX_DECODE_DEPTH: usize = 128;

/// Root element name that lets a single-key mapping name the document element
pub const DEFAULT_XML_ROOT: &str = "root";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Compression filter configuration
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Decoder limits
    #[serde(default)]
    pub decode: DecodeConfig,

    /// XML builder configuration
    #[serde(default)]
    pub xml: XmlConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| CodecError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CodecError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CODEC_GATEWAY_GZIP_LEVEL") {
            if let Ok(val) = level.parse::<u32>() {
                config.compression.gzip_level = val;
            }
        }

        if let Ok(quality) = std::env::var("CODEC_GATEWAY_BROTLI_QUALITY") {
            if let Ok(val) = quality.parse::<u32>() {
                config.compression.brotli_quality = val;
            }
        }

        if let Ok(limit) = std::env::var("CODEC_GATEWAY_MAX_DECOMPRESSED_SIZE") {
            if let Ok(val) = limit.parse::<usize>() {
                config.compression.max_decompressed_size = val;
            }
        }

        if let Ok(depth) = std::env::var("CODEC_GATEWAY_MAX_DEPTH") {
            if let Ok(val) = depth.parse::<usize>() {
                config.decode.max_depth = val;
            }
        }

        if let Ok(root) = std::env::var("CODEC_GATEWAY_XML_ROOT") {
            config.xml.root_name = root;
        }

        if let Ok(level) = std::env::var("CODEC_GATEWAY_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.compression.validate());
        errors.extend(self.decode.validate());
        errors.extend(self.xml.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Compression filter configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CompressionConfig {
    /// Gzip level, 0 (store) to 9 (best)
    pub gzip_level: u32,

    /// Brotli quality, 0 to 11
    pub brotli_quality: u32,

    /// Brotli window size as log2 of bytes, 10 to 24
    pub brotli_window: u32,

    /// Internal buffer size for the compression streams
    pub buffer_size: usize,

    /// Upper bound on decompressed output
    pub max_decompressed_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            gzip_level: 6,
            brotli_quality: 11,
            brotli_window: 22,
            buffer_size: 8 * 1024,
            max_decompressed_size: MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl CompressionConfig {
    /// Validate compression configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gzip_level > 9 {
            errors.push(format!(
                "Invalid gzip level: {} (valid range: 0-9)",
                self.gzip_level
            ));
        }

        if self.brotli_quality > 11 {
            errors.push(format!(
                "Invalid brotli quality: {} (valid range: 0-11)",
                self.brotli_quality
            ));
        }

        if !(10..=24).contains(&self.brotli_window) {
            errors.push(format!(
                "Invalid brotli window: {} (valid range: 10-24)",
                self.brotli_window
            ));
        }

        if self.buffer_size == 0 {
            errors.push("Buffer size must be greater than 0".to_string());
        } else if self.buffer_size > 1024 * 1024 {
            errors.push(format!(
                "Buffer size too large: {} bytes (maximum: 1 MB)",
                self.buffer_size
            ));
        }

        if self.max_decompressed_size == 0 {
            errors.push("Max decompressed size cannot be 0".to_string());
        } else if self.max_decompressed_size > 1024 * 1024 * 1024 {
            errors.push(format!(
                "Max decompressed size too large: {} bytes (maximum recommended: 1 GB)",
                self.max_decompressed_size
            ));
        }

        errors
    }
}

/// Decoder limits
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DecodeConfig {
    /// Deepest nesting of mappings, sequences or elements a decoder accepts.
    /// JSON is additionally held to its parser's own ceiling of 128.
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DECODE_DEPTH,
        }
    }
}

impl DecodeConfig {
    /// Validate decoder configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_depth == 0 {
            errors.push("Max depth must be greater than 0".to_string());
        } else if self.max_depth > 1024 {
            errors.push(format!(
                "Max depth too large: {} (maximum: 1024)",
                self.max_depth
            ));
        }

        errors
    }
}

/// XML builder configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct XmlConfig {
    /// Document element name used when the payload is not a single-key mapping
    pub root_name: String,

    /// Whether to indent nested elements
    pub pretty: bool,

    /// Spaces per nesting level when `pretty` is set
    pub indent: usize,

    /// Whether to emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            root_name: String::from(DEFAULT_XML_ROOT),
            pretty: true,
            indent: 2,
            declaration: true,
        }
    }
}

impl XmlConfig {
    /// Validate XML configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut chars = self.root_name.chars();
        match chars.next() {
            None => errors.push("XML root name cannot be empty".to_string()),
            Some(first) => {
                let valid = (first.is_alphabetic() || first == '_')
                    && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
                if !valid {
                    errors.push(format!("Invalid XML root name: '{}'", self.root_name));
                }
            }
        }

        if self.pretty && self.indent > 16 {
            errors.push(format!(
                "XML indent too large: {} (maximum: 16)",
                self.indent
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("codec-gateway"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
