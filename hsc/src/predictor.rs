//! Causal sample predictors.
//!
//! A predictor looks at the samples before `position` and proposes a value for
//! the sample at `position`. It never reads `data[position]` or anything after
//! it except to compare its candidate with the true value, so a decoder that
//! has only reconstructed `data[..position]` computes the same candidate as
//! the encoder did.
//!
//! The candidate stays available from [`PredictiveFunction::prediction`] after
//! `predict` returns, whether or not it matched. That is how the decoder
//! recovers a value the encoder replaced with the "predicted" symbol.

use log::trace;

use crate::error::{Error, Result};

pub trait PredictiveFunction {
    /// Compute the candidate for `data[position]`.
    ///
    /// Returns true iff a candidate exists and equals `data[position]`.
    fn predict(&mut self, data: &[u32], position: usize) -> Result<bool>;

    /// Candidate from the last call to `predict`, `None` if it had none.
    fn prediction(&self) -> Option<u32>;

    /// Forget everything learned so far. Called before every coding session.
    fn reset_statistics(&mut self);
}

fn check_position(data: &[u32], position: usize) -> Result<()> {
    if position >= data.len() {
        return Err(Error::PositionOutOfBounds {
            position,
            len: data.len(),
        });
    }
    Ok(())
}

fn matches(candidate: Option<u32>, actual: u32) -> bool {
    candidate == Some(actual)
}

/// Never predicts. Every sample is coded as a raw symbol.
#[derive(Debug, Clone, Default)]
pub struct NoPrediction;

impl PredictiveFunction for NoPrediction {
    fn predict(&mut self, data: &[u32], position: usize) -> Result<bool> {
        check_position(data, position)?;
        Ok(false)
    }

    fn prediction(&self) -> Option<u32> {
        None
    }

    fn reset_statistics(&mut self) {}
}

/// Predicts the previous sample.
#[derive(Debug, Clone, Default)]
pub struct LastValue1D {
    prediction: Option<u32>,
}

impl LastValue1D {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PredictiveFunction for LastValue1D {
    fn predict(&mut self, data: &[u32], position: usize) -> Result<bool> {
        check_position(data, position)?;
        self.prediction = position.checked_sub(1).map(|prev| data[prev]);
        Ok(matches(self.prediction, data[position]))
    }

    fn prediction(&self) -> Option<u32> {
        self.prediction
    }

    fn reset_statistics(&mut self) {
        self.prediction = None;
    }
}

/// Predicts from the north, west and north-west neighbours on a row-major
/// `rows x cols` grid.
///
/// In priority order: no north neighbour, take west; no west neighbour, take
/// north; north equals north-west, take north; otherwise take west.
#[derive(Debug, Clone)]
pub struct Neighborhood2D {
    rows: usize,
    cols: usize,
    prediction: Option<u32>,
}

impl Neighborhood2D {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            prediction: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

impl PredictiveFunction for Neighborhood2D {
    fn predict(&mut self, data: &[u32], position: usize) -> Result<bool> {
        let len = self.rows * self.cols;
        if position >= len {
            return Err(Error::PositionOutOfBounds { position, len });
        }
        if data.len() < len {
            return Err(Error::GridTooSmall {
                rows: self.rows,
                cols: self.cols,
                len: data.len(),
            });
        }

        let (row, col) = (position / self.cols, position % self.cols);
        let north = (row > 0).then(|| data[position - self.cols]);
        let west = (col > 0).then(|| data[position - 1]);
        let north_west = (row > 0 && col > 0).then(|| data[position - self.cols - 1]);

        self.prediction = match (north, west) {
            (None, west) => west,
            (north, None) => north,
            (Some(n), Some(_)) if north_west == Some(n) => Some(n),
            (Some(_), west) => west,
        };
        Ok(matches(self.prediction, data[position]))
    }

    fn prediction(&self) -> Option<u32> {
        self.prediction
    }

    fn reset_statistics(&mut self) {
        self.prediction = None;
    }
}

/// Predicts the most frequent value among the last `look_back` samples.
///
/// Ties go to the tied value seen most recently: the window is scanned from
/// oldest to newest and every sample whose value reaches the maximum count
/// replaces the candidate.
#[derive(Debug, Clone)]
pub struct LookBackMajority1D {
    look_back: usize,
    alphabet_size: u32,
    tally: Vec<u32>,
    prediction: Option<u32>,
}

impl LookBackMajority1D {
    pub fn new(look_back: usize, alphabet_size: u32) -> Result<Self> {
        if look_back == 0 {
            return Err(Error::InvalidLookBack(look_back));
        }
        Ok(Self {
            look_back,
            alphabet_size,
            tally: vec![0; alphabet_size as usize],
            prediction: None,
        })
    }

    pub fn look_back(&self) -> usize {
        self.look_back
    }
}

impl PredictiveFunction for LookBackMajority1D {
    fn predict(&mut self, data: &[u32], position: usize) -> Result<bool> {
        check_position(data, position)?;
        if position <= self.look_back {
            self.prediction = None;
            return Ok(false);
        }

        let window = &data[position - self.look_back..position];
        self.tally.iter_mut().for_each(|t| *t = 0);
        for &value in window {
            let slot = self
                .tally
                .get_mut(value as usize)
                .ok_or(Error::SymbolOutOfRange {
                    symbol: value,
                    alphabet_size: self.alphabet_size,
                })?;
            *slot += 1;
        }

        let max = window
            .iter()
            .map(|&v| self.tally[v as usize])
            .max()
            .unwrap_or(0);
        let mut candidate = None;
        for &value in window {
            if self.tally[value as usize] == max {
                candidate = Some(value);
            }
        }
        trace!("look-back {} at {}: {:?} x{}", self.look_back, position, candidate, max);

        self.prediction = candidate;
        Ok(matches(self.prediction, data[position]))
    }

    fn prediction(&self) -> Option<u32> {
        self.prediction
    }

    fn reset_statistics(&mut self) {
        self.tally.iter_mut().for_each(|t| *t = 0);
        self.prediction = None;
    }
}
