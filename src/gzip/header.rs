use crate::bits::BitReader;
use crate::error::{Error, Result};
use std::io::Read;

/// Gzip header flags (RFC 1952)
const FTEXT: u8 = 1 << 0;
const FHCRC: u8 = 1 << 1;
const FEXTRA: u8 = 1 << 2;
const FNAME: u8 = 1 << 3;
const FCOMMENT: u8 = 1 << 4;

/// Compression method byte for DEFLATE
const CM_DEFLATE: u8 = 8;

/// Parsed gzip member header (RFC 1952)
#[derive(Debug, Clone)]
pub struct GzipHeader {
    pub compression_method: u8,
    pub flags: u8,
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
    pub extra: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub comment: Option<String>,
    pub header_crc: Option<u16>,
    /// Total header bytes consumed
    byte_len: u64,
}

impl GzipHeader {
    /// Parse a gzip member header, leaving the reader positioned at the
    /// first byte of the DEFLATE payload.
    ///
    /// When the FHCRC flag is set, the stored CRC16 is checked against
    /// the CRC32 of the header bytes that precede it.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut reader = CrcReader::new(reader);

        let mut fixed = [0u8; 10];
        reader.read_exact(&mut fixed)?;

        let magic = u16::from_le_bytes([fixed[0], fixed[1]]);
        if magic != 0x8b1f {
            return Err(Error::InvalidGzipMagic(magic));
        }

        let compression_method = fixed[2];
        if compression_method != CM_DEFLATE {
            return Err(Error::UnsupportedCompressionMethod(compression_method));
        }

        let flags = fixed[3];
        let mtime = u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);
        let extra_flags = fixed[8];
        let os = fixed[9];

        let extra = if flags & FEXTRA != 0 {
            let mut xlen_buf = [0u8; 2];
            reader.read_exact(&mut xlen_buf)?;
            let xlen = u16::from_le_bytes(xlen_buf) as usize;

            let mut extra_data = vec![0u8; xlen];
            reader.read_exact(&mut extra_data)?;
            Some(extra_data)
        } else {
            None
        };

        let filename =
            if flags & FNAME != 0 { Some(reader.read_latin1_until_nul()?) } else { None };

        let comment =
            if flags & FCOMMENT != 0 { Some(reader.read_latin1_until_nul()?) } else { None };

        let header_crc = if flags & FHCRC != 0 {
            // CRC16 covers every header byte before the field itself
            let computed = reader.crc16();
            let mut crc_buf = [0u8; 2];
            reader.read_exact(&mut crc_buf)?;
            let stored = u16::from_le_bytes(crc_buf);
            if stored != computed {
                return Err(Error::GzipHeaderCrcMismatch { expected: stored, found: computed });
            }
            Some(stored)
        } else {
            None
        };

        Ok(GzipHeader {
            compression_method,
            flags,
            mtime,
            extra_flags,
            os,
            extra,
            filename,
            comment,
            header_crc,
            byte_len: reader.bytes_read,
        })
    }

    pub fn is_text(&self) -> bool {
        self.flags & FTEXT != 0
    }

    pub fn has_filename(&self) -> bool {
        self.flags & FNAME != 0
    }

    pub fn has_comment(&self) -> bool {
        self.flags & FCOMMENT != 0
    }

    pub fn has_header_crc(&self) -> bool {
        self.flags & FHCRC != 0
    }

    /// Number of bytes the header occupied
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }
}

/// Gzip member trailer: CRC32 of the uncompressed data, then its size
/// mod 2^32, both little-endian
#[derive(Debug, Clone, Copy)]
pub struct GzipTrailer {
    pub crc32: u32,
    pub isize: u32,
}

impl GzipTrailer {
    /// Read the 8-byte trailer that follows the final DEFLATE block,
    /// discarding the padding bits of the last payload byte first.
    pub fn read_from<R: Read>(bits: &mut BitReader<R>) -> Result<Self> {
        bits.align_to_byte();
        let crc32 = bits.read_u32_le()?;
        let isize = bits.read_u32_le()?;
        Ok(GzipTrailer { crc32, isize })
    }
}

/// Read wrapper that tracks a running CRC32 of everything consumed, for
/// the optional FHCRC16 header check
struct CrcReader<'a, R: Read> {
    inner: &'a mut R,
    hasher: crc32fast::Hasher,
    bytes_read: u64,
}

impl<'a, R: Read> CrcReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, hasher: crc32fast::Hasher::new(), bytes_read: 0 }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::UnexpectedEof
            } else {
                Error::Io(e)
            }
        })?;
        self.hasher.update(buf);
        self.bytes_read += buf.len() as u64;
        Ok(())
    }

    /// NUL-terminated string; gzip specifies ISO-8859-1, so fall back to
    /// a byte-for-byte Latin-1 mapping when the bytes are not UTF-8
    fn read_latin1_until_nul(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            self.read_exact(&mut byte)?;
            if byte[0] == 0 {
                break;
            }
            bytes.push(byte[0]);
        }
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect()))
    }

    /// Low 16 bits of the CRC32 of everything read so far
    fn crc16(&self) -> u16 {
        (self.hasher.clone().finalize() & 0xFFFF) as u16
    }
}
