use super::header::read_dynamic_tables;
use super::lz77::expand_block;
use super::window::OutputWindow;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use std::io::{Read, Write};

/// DEFLATE block type for dynamic Huffman coding
const BTYPE_DYNAMIC: u8 = 2;

/// Drives a DEFLATE stream block by block: reads BFINAL/BTYPE, decodes
/// each dynamic block's tables and symbol stream, and stops after the
/// final block. The output window (and its 32KB history) is shared
/// across blocks, so back-references may reach into earlier blocks.
pub struct DeflateDecoder<R: Read> {
    bits: BitReader<R>,
    blocks_decoded: u64,
    finished: bool,
}

impl<R: Read> DeflateDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { bits: BitReader::new(reader), blocks_decoded: 0, finished: false }
    }

    /// Decode blocks into `out` until the final block completes.
    ///
    /// Only dynamic Huffman blocks (BTYPE=2) are supported; stored and
    /// fixed-Huffman blocks are rejected.
    pub fn decode_to<W: Write>(&mut self, out: &mut OutputWindow<W>) -> Result<()> {
        while !self.finished {
            let is_final = self.bits.read_bit()?;
            let block_type = self.bits.read_bits(2)? as u8;
            if block_type != BTYPE_DYNAMIC {
                return Err(Error::UnsupportedBlockType(block_type));
            }

            let tables = read_dynamic_tables(&mut self.bits)?;
            expand_block(&mut self.bits, &tables, out)?;
            self.blocks_decoded += 1;

            if is_final {
                self.finished = true;
            }
        }
        Ok(())
    }

    /// Number of blocks fully decoded
    pub fn blocks_decoded(&self) -> u64 {
        self.blocks_decoded
    }

    /// Bytes consumed from the underlying source
    pub fn bytes_read(&self) -> u64 {
        self.bits.bytes_read()
    }

    /// Whether the final block has been decoded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn bits_mut(&mut self) -> &mut BitReader<R> {
        &mut self.bits
    }
}
