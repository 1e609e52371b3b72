//! Compression setting carried by variables
//!
//! The coercion layer never compresses anything. The setting is stored on
//! variables and the collection and handed to the persistence layer as is.

use serde::{Deserialize, Serialize};

/// Compression codec of a variable or file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionType {
    /// Stored uncompressed
    #[default]
    None,
    /// Run-length encoding of zeros
    Rle,
    /// Huffman
    Huffman,
    /// Adaptive Huffman
    AdaptiveHuffman,
    /// Deflate
    Gzip,
    /// Zstandard
    Zstd,
}

impl CompressionType {
    /// All compression types (for iteration)
    pub const ALL: [CompressionType; 6] = [
        CompressionType::None,
        CompressionType::Rle,
        CompressionType::Huffman,
        CompressionType::AdaptiveHuffman,
        CompressionType::Gzip,
        CompressionType::Zstd,
    ];

    /// On-disk code
    pub const fn code(&self) -> u32 {
        match self {
            CompressionType::None => 0,
            CompressionType::Rle => 1,
            CompressionType::Huffman => 2,
            CompressionType::AdaptiveHuffman => 3,
            CompressionType::Gzip => 5,
            CompressionType::Zstd => 16,
        }
    }

    /// Parse from on-disk code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Lower-case name, as used in configuration files
    pub const fn name(&self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Rle => "rle",
            CompressionType::Huffman => "huffman",
            CompressionType::AdaptiveHuffman => "adaptive_huffman",
            CompressionType::Gzip => "gzip",
            CompressionType::Zstd => "zstd",
        }
    }
}

impl std::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CompressionType::None.code(), 0);
        assert_eq!(CompressionType::Gzip.code(), 5);
        assert_eq!(CompressionType::Zstd.code(), 16);
        for c in CompressionType::ALL {
            assert_eq!(CompressionType::from_code(c.code()), Some(c));
        }
        assert_eq!(CompressionType::from_code(4), None);
    }

    #[test]
    fn test_serde_uses_config_names() {
        for c in CompressionType::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.name()));
        }
    }
}
