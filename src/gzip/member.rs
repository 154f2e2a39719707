use super::header::{GzipHeader, GzipTrailer};
use crate::deflate::{DeflateDecoder, OutputWindow};
use crate::error::{Error, Result};
use crate::{DecodeConfig, DecodeStats};
use std::io::{Read, Write};

/// Decoder for one gzip member: header, DEFLATE payload, trailer.
///
/// Construction parses the header immediately, so the caller can inspect
/// it (e.g. for the stored filename) before deciding where the decoded
/// bytes should go.
pub struct MemberDecoder<R: Read> {
    header: GzipHeader,
    deflate: DeflateDecoder<R>,
    verify_checksums: bool,
    flush_threshold: usize,
}

impl<R: Read> MemberDecoder<R> {
    pub fn new(input: R) -> Result<Self> {
        Self::with_config(input, &DecodeConfig::default())
    }

    pub fn with_config(mut input: R, config: &DecodeConfig) -> Result<Self> {
        let header = GzipHeader::parse(&mut input)?;
        Ok(Self {
            header,
            deflate: DeflateDecoder::new(input),
            verify_checksums: config.verify_checksums,
            flush_threshold: config.flush_threshold,
        })
    }

    /// The member header parsed at construction
    pub fn header(&self) -> &GzipHeader {
        &self.header
    }

    /// Decode the whole payload into `output`, read the trailer, and
    /// (unless disabled) verify the CRC32 and ISIZE against the decoded
    /// bytes. Bytes already flushed to `output` remain there on error.
    pub fn decode_to<W: Write>(mut self, output: W) -> Result<DecodeStats> {
        let mut out = OutputWindow::new(output, self.flush_threshold);
        self.deflate.decode_to(&mut out)?;
        let (crc32, total_out) = out.finish()?;

        let trailer = GzipTrailer::read_from(self.deflate.bits_mut())?;
        if self.verify_checksums {
            if trailer.crc32 != crc32 {
                return Err(Error::Crc32Mismatch { expected: trailer.crc32, found: crc32 });
            }
            let reported = (total_out & 0xFFFF_FFFF) as u32;
            if trailer.isize != reported {
                return Err(Error::SizeMismatch { expected: trailer.isize, found: reported });
            }
        }

        Ok(DecodeStats {
            input_bytes: self.header.byte_len() + self.deflate.bytes_read(),
            output_bytes: total_out,
            blocks_decoded: self.deflate.blocks_decoded(),
        })
    }
}
