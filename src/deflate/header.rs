use super::tables::CODE_LENGTH_ORDER;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::HuffmanDecoder;
use std::io::Read;

/// Number of symbols in the code-length alphabet
const CL_SYMBOLS: usize = 19;

/// Per-block Huffman tables decoded from a dynamic block header.
///
/// `dist` is `None` when every distance code length is zero, which is
/// legal for blocks encoding literals only.
pub struct BlockTables {
    pub litlen: HuffmanDecoder,
    pub dist: Option<HuffmanDecoder>,
}

/// Decode the two-level header of a dynamic Huffman block: HLIT/HDIST/
/// HCLEN, the permuted code-length-alphabet lengths, then the joint
/// literal/length + distance length vector compressed with the 16/17/18
/// run operators.
pub fn read_dynamic_tables<R: Read>(bits: &mut BitReader<R>) -> Result<BlockTables> {
    let nlit = bits.read_bits(5)? as usize + 257;
    let ndist = bits.read_bits(5)? as usize + 1;
    let nclen = bits.read_bits(4)? as usize + 4;

    let mut cl_lengths = [0u8; CL_SYMBOLS];
    for &slot in CODE_LENGTH_ORDER.iter().take(nclen) {
        cl_lengths[slot] = bits.read_bits(3)? as u8;
    }
    let cl_decoder = HuffmanDecoder::from_code_lengths(&cl_lengths)?;

    let expected = nlit + ndist;
    let mut lengths: Vec<u8> = Vec::with_capacity(expected);
    while lengths.len() < expected {
        let sym = cl_decoder.decode(bits)?;
        match sym {
            0..=15 => lengths.push(sym as u8),
            16 => {
                // Repeat the previous length 3-6 times
                let prev = *lengths.last().ok_or(Error::RepeatWithoutPrevious)?;
                let repeat = bits.read_bits(2)? as usize + 3;
                push_run(&mut lengths, prev, repeat, expected)?;
            }
            17 => {
                // Repeat zero 3-10 times
                let repeat = bits.read_bits(3)? as usize + 3;
                push_run(&mut lengths, 0, repeat, expected)?;
            }
            18 => {
                // Repeat zero 11-138 times
                let repeat = bits.read_bits(7)? as usize + 11;
                push_run(&mut lengths, 0, repeat, expected)?;
            }
            _ => return Err(Error::InvalidHuffmanCode(u32::from(sym))),
        }
    }

    let litlen = HuffmanDecoder::from_code_lengths(&lengths[..nlit])?;
    let dist_lengths = &lengths[nlit..];
    let dist = if dist_lengths.iter().all(|&len| len == 0) {
        None
    } else {
        Some(HuffmanDecoder::from_code_lengths(dist_lengths)?)
    };

    Ok(BlockTables { litlen, dist })
}

fn push_run(lengths: &mut Vec<u8>, value: u8, repeat: usize, expected: usize) -> Result<()> {
    if lengths.len() + repeat > expected {
        return Err(Error::CodeLengthOverrun { produced: lengths.len() + repeat, expected });
    }
    lengths.resize(lengths.len() + repeat, value);
    Ok(())
}
