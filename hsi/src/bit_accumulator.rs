//! Bit accumulator for samples that are not a whole number of bytes wide.
//!
//! The register keeps its valid bits left aligned: the oldest valid bit is
//! bit 31. Writers flush whole bytes as soon as they are complete, so between
//! two `push` calls fewer than 8 bits are held. Readers top the register up
//! one byte at a time until a full sample is available.

use std::fmt;

use log::trace;

/// Widest sample the accumulator can move in one call.
pub const MAX_BITS: u8 = 25;

#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct BitAccumulator {
    register: u32,
    valid_bits: u8,
}

impl fmt::Debug for BitAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitAccumulator")
            .field("register", &format_args!("{:#010x}", self.register))
            .field("valid_bits", &self.valid_bits)
            .finish()
    }
}

fn mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

impl BitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid_bits(&self) -> u8 {
        self.valid_bits
    }

    pub fn is_empty(&self) -> bool {
        self.valid_bits == 0
    }

    /// Append the low `bits` bits of `value`, flushing complete bytes to `out`.
    pub fn push(&mut self, value: u32, bits: u8, out: &mut Vec<u8>) {
        debug_assert!(bits >= 1 && bits <= MAX_BITS);
        debug_assert!(self.valid_bits < 8);
        let shift = 32 - self.valid_bits - bits;
        self.register |= (value & mask(bits)) << shift;
        self.valid_bits += bits;
        while self.valid_bits >= 8 {
            out.push((self.register >> 24) as u8);
            self.register <<= 8;
            self.valid_bits -= 8;
        }
    }

    /// Write out a trailing partial byte, zero padded in its low bits.
    pub fn flush(&mut self, out: &mut Vec<u8>) {
        if self.valid_bits > 0 {
            trace!("flushing {} trailing bits", self.valid_bits);
            out.push((self.register >> 24) as u8);
        }
        self.register = 0;
        self.valid_bits = 0;
    }

    /// Take the next `bits` bits from the stream.
    ///
    /// Bytes are consumed from `input` starting at `*cursor`, only as many as
    /// needed. Returns `None` if the input runs out before `bits` valid bits
    /// are available.
    pub fn pull(&mut self, bits: u8, input: &[u8], cursor: &mut usize) -> Option<u32> {
        debug_assert!(bits >= 1 && bits <= MAX_BITS);
        while self.valid_bits < bits {
            let byte = *input.get(*cursor)?;
            *cursor += 1;
            self.register |= (byte as u32) << (24 - self.valid_bits);
            self.valid_bits += 8;
        }
        let value = (self.register >> (32 - bits)) & mask(bits);
        self.register <<= bits;
        self.valid_bits -= bits;
        Some(value)
    }
}
