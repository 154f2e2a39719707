use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Gzip framing errors
    #[error("Invalid gzip magic bytes: expected 0x1f8b, got 0x{0:04x}")]
    InvalidGzipMagic(u16),

    #[error("Unsupported compression method: {0} (only DEFLATE/8 supported)")]
    UnsupportedCompressionMethod(u8),

    #[error("Gzip header CRC mismatch: expected 0x{expected:04x}, got 0x{found:04x}")]
    GzipHeaderCrcMismatch { expected: u16, found: u16 },

    // DEFLATE block errors
    #[error("Unsupported DEFLATE block type: {0} (only dynamic Huffman/2 supported)")]
    UnsupportedBlockType(u8),

    // Huffman table errors
    #[error("Invalid Huffman code length: {0} (max 15)")]
    InvalidCodeLength(u8),

    #[error("Huffman code oversubscribed: more codes than possible for bit length")]
    HuffmanOversubscribed,

    #[error("Huffman code incomplete: not all codes assigned")]
    HuffmanIncomplete,

    #[error("Bit sequence 0x{0:x} matches no Huffman code within 15 bits")]
    InvalidHuffmanCode(u32),

    // Code-length run operator errors
    #[error("Code length repeat with no previous length")]
    RepeatWithoutPrevious,

    #[error("Code length run overflows the table: {produced} produced, {expected} expected")]
    CodeLengthOverrun { produced: usize, expected: usize },

    // LZ77 errors
    #[error("Invalid length code: {0}")]
    InvalidLengthCode(u16),

    #[error("Invalid distance code: {0}")]
    InvalidDistanceCode(u16),

    #[error("Length code in a block with no distance code")]
    MissingDistanceCode,

    #[error("Back-reference distance {distance} exceeds available window {available}")]
    InvalidBackReference { distance: u16, available: usize },

    // Trailer verification errors
    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    Crc32Mismatch { expected: u32, found: u32 },

    #[error("Size mismatch: expected {expected} bytes, got {found}")]
    SizeMismatch { expected: u32, found: u32 },

    #[error("Unexpected end of input")]
    UnexpectedEof,
}

pub type Result<T> = std::result::Result<T, Error>;
