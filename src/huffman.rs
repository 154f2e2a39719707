use crate::bits::BitReader;
use crate::error::{Error, Result};
use std::io::Read;

/// Maximum code length DEFLATE allows for any alphabet
pub const MAX_CODE_LENGTH: u8 = 15;

/// Canonical Huffman decoder (RFC 1951 section 3.2.2)
///
/// Codes are fully determined by per-symbol code lengths: count the codes
/// of each length, derive the first code per length, then hand out codes
/// in ascending symbol order within equal lengths. Decoding walks the
/// lengths one bit at a time, checking whether the accumulated code falls
/// inside the contiguous range assigned to the current length.
pub struct HuffmanDecoder {
    /// Maximum assigned code length
    max_bits: u8,
    /// Per code length: (first canonical code, index of first symbol)
    bit_info: [(u32, usize); 16],
    /// Symbols ordered by code length, then by symbol value
    symbols: Vec<u16>,
}

impl HuffmanDecoder {
    /// Build a decoder from a code-length vector; length 0 means the
    /// symbol is absent from the code.
    ///
    /// The non-zero lengths must satisfy the Kraft inequality with
    /// equality. The one exception DEFLATE permits is a single symbol of
    /// code length 1 (used by distance alphabets); the unassigned bit
    /// path of such a code fails at decode time.
    pub fn from_code_lengths(lengths: &[u8]) -> Result<Self> {
        let max_bits = lengths.iter().copied().max().unwrap_or(0);
        if max_bits > MAX_CODE_LENGTH {
            return Err(Error::InvalidCodeLength(max_bits));
        }
        if max_bits == 0 {
            return Err(Error::HuffmanIncomplete);
        }

        let mut bl_count = [0u32; 16];
        for &len in lengths {
            if len > 0 {
                bl_count[len as usize] += 1;
            }
        }

        let assigned: u32 = bl_count.iter().sum();
        let degenerate = assigned == 1 && bl_count[1] == 1;
        if !degenerate {
            // Kraft check: each length level halves the remaining code space
            let mut space = 1i64;
            for &count in &bl_count[1..] {
                space <<= 1;
                space -= i64::from(count);
                if space < 0 {
                    return Err(Error::HuffmanOversubscribed);
                }
            }
            if space > 0 {
                return Err(Error::HuffmanIncomplete);
            }
        }

        // First canonical code for each length
        let mut next_code = [0u32; 16];
        let mut code = 0u32;
        for bits in 1..=max_bits as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        // Canonical symbol order: by length, then by symbol value
        let mut ordered: Vec<(u8, u16)> = lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len > 0)
            .map(|(sym, &len)| (len, sym as u16))
            .collect();
        ordered.sort_unstable();
        let symbols: Vec<u16> = ordered.into_iter().map(|(_, sym)| sym).collect();

        let mut bit_info = [(0u32, 0usize); 16];
        let mut index = 0usize;
        for bits in 1..=15usize {
            bit_info[bits] = (next_code[bits], index);
            index += bl_count[bits] as usize;
        }

        Ok(Self { max_bits, bit_info, symbols })
    }

    /// Decode the next symbol, consuming one bit per step. The first bit
    /// read is the most significant bit of the code.
    pub fn decode<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        let mut code = 0u32;
        for len in 1..=self.max_bits as usize {
            code = (code << 1) | bits.read_bits(1)?;

            let (first_code, first_index) = self.bit_info[len];
            let count = if len < 15 {
                self.bit_info[len + 1].1 - first_index
            } else {
                self.symbols.len() - first_index
            };

            if count > 0 && code >= first_code && code < first_code + count as u32 {
                return Ok(self.symbols[first_index + (code - first_code) as usize]);
            }
        }

        Err(Error::InvalidHuffmanCode(code))
    }

    /// Number of symbols with an assigned code
    pub fn assigned_symbols(&self) -> usize {
        self.symbols.len()
    }
}
