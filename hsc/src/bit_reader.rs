//! MSB-first bit streams for the arithmetic coder.
use std::fmt;

/// Reads single bits out of a byte slice, most significant bit first.
///
/// Reading past the end yields zero bits. The arithmetic decoder relies on
/// this: it always looks `precision` bits ahead of the last coded symbol.
pub struct BitReader<'a> {
    input: &'a [u8],
    position: usize,
    last_byte: u8,
    offset: u8,
    bits_read: u64,
}

impl fmt::Debug for BitReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitReader")
            .field("last_byte", &format_args!("{:x?}", &self.last_byte))
            .field("offset", &self.offset)
            .field("position", &self.position)
            .finish()
    }
}

impl<'a> BitReader<'a> {
    pub fn new(input: &'a [u8]) -> BitReader<'a> {
        Self {
            input,
            position: 0,
            last_byte: 0,
            offset: 8,
            bits_read: 0,
        }
    }

    pub fn next_bit(&mut self) -> bool {
        self.bits_read += 1;
        if self.offset == 8 {
            self.last_byte = self.input.get(self.position).copied().unwrap_or(0);
            self.position += 1;
            self.offset = 0;
        }
        let o = 7 - self.offset;
        self.offset += 1;
        (self.last_byte >> o) & 0x01 == 1
    }

    /// Read `count` bits (at most 32) as an unsigned integer.
    pub fn take(&mut self, count: u8) -> u32 {
        debug_assert!(count <= 32);
        let mut out = 0u32;
        for _ in 0..count {
            out = (out << 1) | self.next_bit() as u32;
        }
        out
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

/// Appends single bits to a byte buffer, most significant bit first.
#[derive(Default)]
pub struct BitWriter {
    output: Vec<u8>,
    current: u8,
    offset: u8,
    bits_written: u64,
}

impl fmt::Debug for BitWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitWriter")
            .field("current", &format_args!("{:x?}", &self.current))
            .field("offset", &self.offset)
            .field("bytes", &self.output.len())
            .finish()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_bit(&mut self, bit: bool) {
        self.current |= (bit as u8) << (7 - self.offset);
        self.offset += 1;
        self.bits_written += 1;
        if self.offset == 8 {
            self.output.push(self.current);
            self.current = 0;
            self.offset = 0;
        }
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero pad the last byte and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.offset > 0 {
            self.output.push(self.current);
        }
        self.output
    }
}
