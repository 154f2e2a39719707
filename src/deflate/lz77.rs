use super::header::BlockTables;
use super::tables::{DISTANCE_TABLE, LENGTH_TABLE};
use super::window::OutputWindow;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use std::io::{Read, Write};

/// Expand one block's literal/length + distance symbol stream into the
/// output window, until the end-of-block symbol 256.
pub fn expand_block<R: Read, W: Write>(
    bits: &mut BitReader<R>,
    tables: &BlockTables,
    out: &mut OutputWindow<W>,
) -> Result<()> {
    loop {
        let sym = tables.litlen.decode(bits)?;

        match sym {
            0..=255 => out.push_literal(sym as u8)?,
            256 => return Ok(()),
            257..=285 => {
                let (base, extra_bits) = LENGTH_TABLE[(sym - 257) as usize];
                let extra = if extra_bits > 0 { bits.read_bits(extra_bits)? } else { 0 };
                let length = base + extra as u16;

                let dist_table = tables.dist.as_ref().ok_or(Error::MissingDistanceCode)?;
                let dist_sym = dist_table.decode(bits)?;
                if dist_sym > 29 {
                    return Err(Error::InvalidDistanceCode(dist_sym));
                }

                let (dist_base, dist_extra_bits) = DISTANCE_TABLE[dist_sym as usize];
                let dist_extra =
                    if dist_extra_bits > 0 { bits.read_bits(dist_extra_bits)? } else { 0 };
                let distance = dist_base + dist_extra as u16;

                out.copy_match(distance, length)?;
            }
            _ => return Err(Error::InvalidLengthCode(sym)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::HuffmanDecoder;
    use crate::testutil::{canonical_codes, BitSink};

    /// LITLEN lengths assigning one code each to the given symbols
    fn litlen_lengths(symbols: &[u16]) -> Vec<u8> {
        let lens = crate::testutil::complete_lengths(symbols.len());
        let size = (symbols.iter().copied().max().unwrap() as usize + 1).max(257);
        let mut v = vec![0u8; size];
        for (i, &sym) in symbols.iter().enumerate() {
            v[sym as usize] = lens[i];
        }
        v
    }

    fn tables_for(litlen: &[u8], dist: Option<&[u8]>) -> BlockTables {
        BlockTables {
            litlen: HuffmanDecoder::from_code_lengths(litlen).unwrap(),
            dist: dist.map(|d| HuffmanDecoder::from_code_lengths(d).unwrap()),
        }
    }

    #[test]
    fn test_literals_until_end_of_block() {
        let lengths = litlen_lengths(&[b'h'.into(), b'i'.into(), 256]);
        let codes = canonical_codes(&lengths);
        let tables = tables_for(&lengths, None);

        let mut sink = BitSink::new();
        for sym in [usize::from(b'h'), usize::from(b'i'), 256] {
            let (code, len) = codes[sym];
            sink.push_code(code, len);
        }
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut buf = Vec::new();
        let mut out = OutputWindow::new(&mut buf, 64 * 1024);
        expand_block(&mut bits, &tables, &mut out).unwrap();
        out.finish().unwrap();
        assert_eq!(buf, b"hi");
    }

    #[test]
    fn test_overlapping_reference_makes_run() {
        // Literal 'A', then a distance-1 length-5 copy: "AAAAAA"
        let lengths = litlen_lengths(&[b'A'.into(), 256, 259]);
        let codes = canonical_codes(&lengths);
        let dist_lengths = [1u8]; // distance symbol 0 -> distance 1
        let dist_codes = canonical_codes(&dist_lengths);
        let tables = tables_for(&lengths, Some(&dist_lengths));

        let mut sink = BitSink::new();
        let (code, len) = codes[usize::from(b'A')];
        sink.push_code(code, len);
        let (code, len) = codes[259]; // length 5, no extra bits
        sink.push_code(code, len);
        let (code, len) = dist_codes[0];
        sink.push_code(code, len);
        let (code, len) = codes[256];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut buf = Vec::new();
        let mut out = OutputWindow::new(&mut buf, 64 * 1024);
        expand_block(&mut bits, &tables, &mut out).unwrap();
        out.finish().unwrap();
        assert_eq!(buf, b"AAAAAA");
    }

    #[test]
    fn test_end_of_block_ignores_following_bits() {
        let lengths = litlen_lengths(&[b'A'.into(), 256]);
        let codes = canonical_codes(&lengths);
        let tables = tables_for(&lengths, None);

        let mut sink = BitSink::new();
        let (code, len) = codes[usize::from(b'A')];
        sink.push_code(code, len);
        let (code, len) = codes[256];
        sink.push_code(code, len);
        // More decodable symbols follow the end-of-block marker
        let (code, len) = codes[usize::from(b'A')];
        sink.push_code(code, len);
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut buf = Vec::new();
        let mut out = OutputWindow::new(&mut buf, 64 * 1024);
        expand_block(&mut bits, &tables, &mut out).unwrap();
        out.finish().unwrap();
        assert_eq!(buf, b"A");
    }

    #[test]
    fn test_length_extra_bits() {
        // Code 265 is base 11 with one extra bit: extra 1 -> length 12
        let lengths = litlen_lengths(&[b'x'.into(), 256, 265]);
        let codes = canonical_codes(&lengths);
        let dist_lengths = [1u8];
        let dist_codes = canonical_codes(&dist_lengths);
        let tables = tables_for(&lengths, Some(&dist_lengths));

        let mut sink = BitSink::new();
        let (code, len) = codes[usize::from(b'x')];
        sink.push_code(code, len);
        let (code, len) = codes[265];
        sink.push_code(code, len);
        sink.push_bits(1, 1); // extra bit
        let (code, len) = dist_codes[0];
        sink.push_code(code, len);
        let (code, len) = codes[256];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut buf = Vec::new();
        let mut out = OutputWindow::new(&mut buf, 64 * 1024);
        expand_block(&mut bits, &tables, &mut out).unwrap();
        out.finish().unwrap();
        assert_eq!(buf, vec![b'x'; 13]);
    }

    #[test]
    fn test_reserved_length_symbol_rejected() {
        // Symbols 286/287 may carry codes but must not decode
        let lengths = litlen_lengths(&[256, 286]);
        let codes = canonical_codes(&lengths);
        let tables = tables_for(&lengths, None);

        let mut sink = BitSink::new();
        let (code, len) = codes[286];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut out = OutputWindow::new(Vec::new(), 64 * 1024);
        assert!(matches!(
            expand_block(&mut bits, &tables, &mut out),
            Err(Error::InvalidLengthCode(286))
        ));
    }

    #[test]
    fn test_reserved_distance_symbol_rejected() {
        let lengths = litlen_lengths(&[256, 257]);
        let codes = canonical_codes(&lengths);
        // Distance symbols 0 and 30 both get codes; 30 must not decode
        let mut dist_lengths = vec![0u8; 31];
        dist_lengths[0] = 1;
        dist_lengths[30] = 1;
        let dist_codes = canonical_codes(&dist_lengths);
        let tables = tables_for(&lengths, Some(&dist_lengths));

        let mut sink = BitSink::new();
        let (code, len) = codes[257];
        sink.push_code(code, len);
        let (code, len) = dist_codes[30];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut out = OutputWindow::new(Vec::new(), 64 * 1024);
        // Need one byte of history so the copy is otherwise plausible
        out.push_literal(b'Q').unwrap();
        assert!(matches!(
            expand_block(&mut bits, &tables, &mut out),
            Err(Error::InvalidDistanceCode(30))
        ));
    }

    #[test]
    fn test_length_code_without_distance_table() {
        let lengths = litlen_lengths(&[256, 257]);
        let codes = canonical_codes(&lengths);
        let tables = tables_for(&lengths, None);

        let mut sink = BitSink::new();
        let (code, len) = codes[257];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();

        let mut bits = BitReader::new(bytes.as_slice());
        let mut out = OutputWindow::new(Vec::new(), 64 * 1024);
        assert!(matches!(
            expand_block(&mut bits, &tables, &mut out),
            Err(Error::MissingDistanceCode)
        ));
    }

    #[test]
    fn test_truncated_extra_bits_is_eof() {
        // Code 284 wants 5 extra bits; position it so the input ends
        // mid-field: five 1-bit literals + the 2-bit code fill 7 bits,
        // one extra bit fits in the byte, the remaining four do not
        let lengths = litlen_lengths(&[b'x'.into(), 256, 284]);
        let codes = canonical_codes(&lengths);
        let dist_lengths = [1u8];
        let tables = tables_for(&lengths, Some(&dist_lengths));

        let mut sink = BitSink::new();
        let (code, len) = codes[usize::from(b'x')];
        for _ in 0..5 {
            sink.push_code(code, len);
        }
        let (code, len) = codes[284];
        sink.push_code(code, len);
        let bytes = sink.into_bytes();
        assert_eq!(bytes.len(), 1);

        let mut bits = BitReader::new(bytes.as_slice());
        let mut out = OutputWindow::new(Vec::new(), 64 * 1024);
        assert!(matches!(
            expand_block(&mut bits, &tables, &mut out),
            Err(Error::UnexpectedEof)
        ));
    }
}
