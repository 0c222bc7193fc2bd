//! Adaptive arithmetic coding.
//!
//! The predictive codec only depends on the two traits in this module:
//! [`SymbolEncoder`] and [`SymbolDecoder`]. [`ArithmeticEncoder`] and
//! [`ArithmeticDecoder`] are the default implementation, an integer range
//! coder in the style of Witten, Neal and Cleary with an adaptive model.
//!
//! # Model
//!
//! Every symbol starts with a count of one. After a symbol is coded its count
//! grows by one; once the total passes the frequency budget every count is
//! halved (rounding up, so no count drops to zero). Encoder and decoder update
//! the model at the same point, so they always agree on the intervals.
//!
//! # Coder
//!
//! `low` and `high` are `precision_bits` wide. Whenever both share their top
//! bit it is emitted (E1/E2). When they straddle the midpoint but sit in the
//! middle half, the interval is expanded and the decision is deferred as a
//! pending bit (E3). The frequency budget is capped at a quarter of the range
//! so every symbol keeps a non-empty interval.

use log::{debug, trace};

use crate::bit_reader::{BitReader, BitWriter};
use crate::error::{Error, Result};

pub const DEFAULT_PRECISION_BITS: u32 = 32;
pub const DEFAULT_TOTAL_FREQUENCY: u32 = 1 << 24;

/// Encode-side contract of an entropy coder.
pub trait SymbolEncoder {
    /// Code one symbol of the alphabet.
    fn code(&mut self, symbol: u32, stream: &mut BitWriter) -> Result<()>;

    /// Flush whatever is needed for the decoder to resolve the last symbol.
    fn finish_coding(&mut self, stream: &mut BitWriter) -> Result<()>;
}

/// Decode-side contract of an entropy coder.
pub trait SymbolDecoder {
    /// Decode `count` symbols from `stream`.
    fn decode(&mut self, stream: &[u8], count: usize) -> Result<Vec<u32>>;
}

/// Parameters shared by encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoderConfig {
    pub precision_bits: u32,
    pub alphabet_size: u32,
    /// Model counts are rescaled when their total exceeds this.
    pub total_frequency: u32,
}

impl CoderConfig {
    pub fn new(alphabet_size: u32) -> Self {
        Self {
            precision_bits: DEFAULT_PRECISION_BITS,
            alphabet_size,
            total_frequency: DEFAULT_TOTAL_FREQUENCY,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(16..=32).contains(&self.precision_bits) {
            return Err(Error::InvalidCoderConfig(format!(
                "precision {} outside [16, 32]",
                self.precision_bits
            )));
        }
        if self.alphabet_size == 0 {
            return Err(Error::InvalidCoderConfig("empty alphabet".to_owned()));
        }
        if self.total_frequency < self.alphabet_size {
            return Err(Error::InvalidCoderConfig(format!(
                "frequency budget {} smaller than alphabet {}",
                self.total_frequency, self.alphabet_size
            )));
        }
        let quarter = 1u64 << (self.precision_bits - 2);
        if self.total_frequency as u64 > quarter {
            return Err(Error::InvalidCoderConfig(format!(
                "frequency budget {} exceeds 2^{}",
                self.total_frequency,
                self.precision_bits - 2
            )));
        }
        Ok(())
    }

    fn check_symbol(&self, symbol: u32) -> Result<()> {
        if symbol >= self.alphabet_size {
            return Err(Error::SymbolOutOfRange {
                symbol,
                alphabet_size: self.alphabet_size,
            });
        }
        Ok(())
    }
}

/// Adaptive symbol counts kept in a Fenwick tree.
#[derive(Debug, Clone)]
struct FrequencyModel {
    counts: Vec<u32>,
    tree: Vec<u32>,
    total: u32,
    budget: u32,
}

impl FrequencyModel {
    fn new(alphabet_size: usize, budget: u32) -> Self {
        let mut model = Self {
            counts: vec![1; alphabet_size],
            tree: vec![0; alphabet_size + 1],
            total: 0,
            budget,
        };
        model.rebuild();
        model
    }

    fn rebuild(&mut self) {
        let n = self.counts.len();
        self.tree.iter_mut().for_each(|t| *t = 0);
        for i in 1..=n {
            self.tree[i] += self.counts[i - 1];
            let parent = i + (i & i.wrapping_neg());
            if parent <= n {
                self.tree[parent] += self.tree[i];
            }
        }
        self.total = self.counts.iter().sum();
    }

    /// Sum of the counts of all symbols below `symbol`.
    fn cumulative(&self, symbol: usize) -> u32 {
        let mut i = symbol;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }

    fn interval(&self, symbol: usize) -> (u32, u32) {
        let low = self.cumulative(symbol);
        (low, low + self.counts[symbol])
    }

    /// The symbol whose interval contains `target`.
    fn find(&self, target: u32) -> usize {
        let n = self.counts.len();
        let mut pos = 0;
        let mut remaining = target;
        let mut step = if n == 0 {
            0
        } else {
            1 << (usize::BITS - 1 - n.leading_zeros())
        };
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        pos.min(n - 1)
    }

    fn update(&mut self, symbol: usize) {
        self.counts[symbol] += 1;
        self.total += 1;
        let n = self.counts.len();
        let mut i = symbol + 1;
        while i <= n {
            self.tree[i] += 1;
            i += i & i.wrapping_neg();
        }
        if self.total > self.budget {
            trace!("rescaling model, total {}", self.total);
            for count in self.counts.iter_mut() {
                *count = (*count + 1) / 2;
            }
            self.rebuild();
        }
    }
}

/// Range limits derived from the precision.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    full: u64,
    half: u64,
    quarter: u64,
}

impl Bounds {
    fn new(precision_bits: u32) -> Self {
        let full = 1u64 << precision_bits;
        Self {
            full,
            half: full >> 1,
            quarter: full >> 2,
        }
    }

    fn mask(&self) -> u64 {
        self.full - 1
    }
}

/// Narrow `[low, high]` to the sub-interval `[cum_low, cum_high)` of `total`.
fn narrow(low: u64, high: u64, cum_low: u32, cum_high: u32, total: u32) -> (u64, u64) {
    let range = high - low + 1;
    let new_high = low + range * cum_high as u64 / total as u64 - 1;
    let new_low = low + range * cum_low as u64 / total as u64;
    (new_low, new_high)
}

#[derive(Debug, Clone)]
pub struct ArithmeticEncoder {
    config: CoderConfig,
    model: FrequencyModel,
    bounds: Bounds,
    low: u64,
    high: u64,
    pending: u64,
    coded: usize,
}

impl ArithmeticEncoder {
    pub fn new(config: CoderConfig) -> Result<Self> {
        config.validate()?;
        let bounds = Bounds::new(config.precision_bits);
        Ok(Self {
            model: FrequencyModel::new(config.alphabet_size as usize, config.total_frequency),
            config,
            bounds,
            low: 0,
            high: bounds.mask(),
            pending: 0,
            coded: 0,
        })
    }

    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    fn emit(&mut self, bit: bool, stream: &mut BitWriter) {
        stream.put_bit(bit);
        for _ in 0..self.pending {
            stream.put_bit(!bit);
        }
        self.pending = 0;
    }
}

impl SymbolEncoder for ArithmeticEncoder {
    fn code(&mut self, symbol: u32, stream: &mut BitWriter) -> Result<()> {
        self.config.check_symbol(symbol)?;
        let (cum_low, cum_high) = self.model.interval(symbol as usize);
        let (low, high) = narrow(self.low, self.high, cum_low, cum_high, self.model.total);
        self.low = low;
        self.high = high;

        let Bounds { half, quarter, .. } = self.bounds;
        loop {
            if self.high < half {
                self.emit(false, stream);
            } else if self.low >= half {
                self.emit(true, stream);
                self.low -= half;
                self.high -= half;
            } else if self.low >= quarter && self.high < half + quarter {
                self.pending += 1;
                self.low -= quarter;
                self.high -= quarter;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }

        self.model.update(symbol as usize);
        self.coded += 1;
        Ok(())
    }

    fn finish_coding(&mut self, stream: &mut BitWriter) -> Result<()> {
        self.pending += 1;
        let bit = self.low >= self.bounds.quarter;
        self.emit(bit, stream);
        debug!(
            "arithmetic coder finished: {} symbols in {} bits",
            self.coded,
            stream.bits_written()
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ArithmeticDecoder {
    config: CoderConfig,
}

impl ArithmeticDecoder {
    pub fn new(config: CoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CoderConfig {
        &self.config
    }
}

impl SymbolDecoder for ArithmeticDecoder {
    fn decode(&mut self, stream: &[u8], count: usize) -> Result<Vec<u32>> {
        let config = self.config;
        let bounds = Bounds::new(config.precision_bits);
        let Bounds { half, quarter, .. } = bounds;
        let mut model = FrequencyModel::new(config.alphabet_size as usize, config.total_frequency);
        let mut reader = BitReader::new(stream);

        let mut value = reader.take(config.precision_bits as u8) as u64;
        let mut low = 0u64;
        let mut high = bounds.mask();
        let mut symbols = Vec::with_capacity(count);

        for _ in 0..count {
            let range = high - low + 1;
            let total = model.total as u64;
            let target = ((value - low + 1) * total - 1) / range;
            let symbol = model.find(target as u32);
            symbols.push(symbol as u32);

            let (cum_low, cum_high) = model.interval(symbol);
            let (new_low, new_high) = narrow(low, high, cum_low, cum_high, model.total);
            low = new_low;
            high = new_high;

            loop {
                if high < half {
                    // nothing to subtract
                } else if low >= half {
                    low -= half;
                    high -= half;
                    value -= half;
                } else if low >= quarter && high < half + quarter {
                    low -= quarter;
                    high -= quarter;
                    value -= quarter;
                } else {
                    break;
                }
                low <<= 1;
                high = (high << 1) | 1;
                value = (value << 1) | reader.next_bit() as u64;
            }

            model.update(symbol);
        }
        debug!(
            "arithmetic decoder read {} symbols from {} bytes",
            symbols.len(),
            stream.len()
        );
        Ok(symbols)
    }
}
