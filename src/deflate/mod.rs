pub mod decoder;
pub mod header;
pub mod lz77;
pub mod tables;
pub mod window;

pub use decoder::DeflateDecoder;
pub use header::{read_dynamic_tables, BlockTables};
pub use window::{OutputWindow, SlidingWindow, WINDOW_SIZE};
