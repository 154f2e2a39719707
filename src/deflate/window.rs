use crate::error::{Error, Result};
use std::io::Write;

/// DEFLATE history size: back-references reach at most this far
pub const WINDOW_SIZE: usize = 32768;

/// 32KB circular buffer holding the most recently emitted bytes
pub struct SlidingWindow {
    buffer: Box<[u8; WINDOW_SIZE]>,
    /// Next write position (0-32767)
    write_pos: usize,
    /// Total bytes ever written
    total_written: u64,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self { buffer: Box::new([0u8; WINDOW_SIZE]), write_pos: 0, total_written: 0 }
    }

    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.buffer[self.write_pos] = byte;
        self.write_pos = (self.write_pos + 1) & (WINDOW_SIZE - 1);
        self.total_written += 1;
    }

    /// Byte `distance` positions behind the write cursor; distance 1 is
    /// the most recently written byte. Caller validates the distance.
    #[inline]
    pub fn byte_at(&self, distance: usize) -> u8 {
        debug_assert!((1..=WINDOW_SIZE).contains(&distance));
        self.buffer[(self.write_pos + WINDOW_SIZE - distance) & (WINDOW_SIZE - 1)]
    }

    /// Bytes currently addressable by a back-reference
    pub fn available(&self) -> usize {
        self.total_written.min(WINDOW_SIZE as u64) as usize
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded-byte sink: every emitted byte enters the sliding window (so
/// later back-references can see it) and a pending buffer that flushes to
/// the writer once it passes the threshold. A running CRC32 and byte
/// count are kept for trailer verification.
pub struct OutputWindow<W: Write> {
    window: SlidingWindow,
    writer: W,
    pending: Vec<u8>,
    flush_threshold: usize,
    hasher: crc32fast::Hasher,
}

impl<W: Write> OutputWindow<W> {
    pub fn new(writer: W, flush_threshold: usize) -> Self {
        Self {
            window: SlidingWindow::new(),
            writer,
            pending: Vec::with_capacity(flush_threshold.min(WINDOW_SIZE * 4)),
            flush_threshold,
            hasher: crc32fast::Hasher::new(),
        }
    }

    #[inline]
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.window.push_byte(byte);
        self.pending.push(byte);
        if self.pending.len() >= self.flush_threshold {
            self.flush_pending()?;
        }
        Ok(())
    }

    /// Append one literal byte
    #[inline]
    pub fn push_literal(&mut self, byte: u8) -> Result<()> {
        self.emit(byte)
    }

    /// Copy `length` bytes from `distance` back, byte by byte. Reads
    /// observe bytes written earlier in the same copy, so an overlapping
    /// reference produces a run.
    pub fn copy_match(&mut self, distance: u16, length: u16) -> Result<()> {
        if u64::from(distance) > self.window.total_written() {
            return Err(Error::InvalidBackReference {
                distance,
                available: self.window.available(),
            });
        }
        for _ in 0..length {
            let byte = self.window.byte_at(distance as usize);
            self.emit(byte)?;
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            self.hasher.update(&self.pending);
            self.writer.write_all(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }

    /// Total bytes emitted so far
    pub fn total_written(&self) -> u64 {
        self.window.total_written()
    }

    /// Flush everything and return (CRC32 of all emitted bytes, total count)
    pub fn finish(mut self) -> Result<(u32, u64)> {
        self.flush_pending()?;
        self.writer.flush()?;
        Ok((self.hasher.finalize(), self.window.total_written()))
    }
}
