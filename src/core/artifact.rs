//! Encoded artifacts.
//!
//! An [`Artifact`] is what `encode` produces and what `decode` consumes. It is
//! either text (uncompressed JSON and XML) or binary (MessagePack, BSON and
//! anything that went through a compression filter). It carries no record of
//! the format or compression that produced it.

use bytes::Bytes;

/// Output of a format encoder, optionally compressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// UTF-8 text artifact
    Text(String),
    /// Binary artifact
    Binary(Bytes),
}

impl Artifact {
    /// Returns true for binary artifacts
    pub fn is_binary(&self) -> bool {
        matches!(self, Artifact::Binary(_))
    }

    /// Returns true for text artifacts
    pub fn is_text(&self) -> bool {
        matches!(self, Artifact::Text(_))
    }

    /// Borrow the text, if this is a text artifact
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            Artifact::Binary(_) => None,
        }
    }

    /// Raw bytes of the artifact; text is viewed as its UTF-8 encoding
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Artifact::Text(text) => text.as_bytes(),
            Artifact::Binary(bytes) => bytes,
        }
    }

    /// Consume the artifact into bytes
    pub fn into_bytes(self) -> Bytes {
        match self {
            Artifact::Text(text) => Bytes::from(text),
            Artifact::Binary(bytes) => bytes,
        }
    }

    /// Size in bytes, for text as well as binary artifacts
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True when the artifact holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Text(_) => "text",
            Artifact::Binary(_) => "binary",
        }
    }
}

impl From<String> for Artifact {
    fn from(text: String) -> Self {
        Artifact::Text(text)
    }
}

impl From<&str> for Artifact {
    fn from(text: &str) -> Self {
        Artifact::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Artifact::Binary(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Artifact {
    fn from(bytes: &[u8]) -> Self {
        Artifact::Binary(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for Artifact {
    fn from(bytes: Bytes) -> Self {
        Artifact::Binary(bytes)
    }
}
