pub mod bits;
pub mod deflate;
pub mod error;
pub mod gzip;
pub mod huffman;

#[cfg(test)]
pub(crate) mod testutil;

pub use deflate::DeflateDecoder;
pub use error::{Error, Result};
pub use gzip::{GzipHeader, GzipTrailer, MemberDecoder};

use std::io::{Read, Write};

/// Configuration for decoding
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    /// Verify the trailer CRC32 and ISIZE against the decoded bytes
    pub verify_checksums: bool,
    /// Decoded bytes buffered before flushing to the sink
    pub flush_threshold: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { verify_checksums: true, flush_threshold: 64 * 1024 }
    }
}

/// Statistics from a decode operation
#[derive(Clone, Debug, Default)]
pub struct DecodeStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub blocks_decoded: u64,
}

/// Decode one gzip member from `input` into `output` with the default
/// configuration.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<DecodeStats> {
    decompress_with_config(input, output, &DecodeConfig::default())
}

/// Decode one gzip member from `input` into `output`.
pub fn decompress_with_config<R: Read, W: Write>(
    input: R,
    output: W,
    config: &DecodeConfig,
) -> Result<DecodeStats> {
    MemberDecoder::with_config(input, config)?.decode_to(output)
}
