//! # Core Codec Components
//!
//! Format encoders/decoders and the artifact type they exchange.
//!
//! ## Components
//! - **Artifact**: text or binary output of an encode, input of a decode
//! - **Serialization**: closed set of formats and the per-format dispatch
//! - **JSON**: compact text with `JSON.stringify` number notation
//! - **XML**: markup tree builder and parser
//!
//! ## Pipeline
//! ```text
//! payload -> [format encode] -> text | bytes -> [compression] -> artifact
//! ```

pub mod artifact;
pub mod json;
pub mod serialization;
pub mod xml;
