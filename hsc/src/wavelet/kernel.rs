//! Convolution form of the CDF-9/7 transform.

use log::debug;

use super::{pack, unpack, WaveletTransform};
use crate::error::{Error, Result};

/// Analysis lowpass, center tap first.
const CDF97_LOWPASS: [f64; 5] = [
    0.602_949_018_236_358_5,
    0.266_864_118_442_875_5,
    -0.078_223_266_528_991_35,
    -0.016_864_118_442_874_824,
    0.026_748_757_410_809_895,
];

/// Analysis highpass, center tap first. Normalized to the gain of the lifting
/// form's `K / 2` scale.
const CDF97_HIGHPASS: [f64; 4] = [
    0.557_543_526_228_500_7,
    -0.295_635_881_557_125_9,
    -0.028_771_763_114_249_893,
    0.045_635_881_557_124_745,
];

/// Synthesis filter gain.
const SYNTHESIS_GAIN: f64 = 2.0;

/// A symmetric convolution kernel.
///
/// `coefficients()[0]` is the center tap and `coefficients()[i]` applies to
/// both offsets `+i` and `-i`, so a kernel of `k` coefficients spans `2k - 1`
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    coefficients: Vec<f64>,
    corner_factor: f64,
}

impl Kernel {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self {
            coefficients,
            corner_factor: 1.0,
        }
    }

    /// Scale applied to the result when the signal has a single sample.
    pub fn with_corner_factor(mut self, corner_factor: f64) -> Self {
        self.corner_factor = corner_factor;
        self
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn corner_factor(&self) -> f64 {
        self.corner_factor
    }

    /// Number of samples the kernel spans.
    pub fn span(&self) -> usize {
        (2 * self.coefficients.len()).saturating_sub(1)
    }

    /// The kernel with every odd-indexed coefficient negated.
    pub fn reversed(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, &c)| if i % 2 == 1 { -c } else { c })
            .collect();
        Self {
            coefficients,
            corner_factor: self.corner_factor,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| c * factor).collect(),
            corner_factor: self.corner_factor,
        }
    }

    /// Convolve around `position` with mirror extension at both ends.
    pub fn apply(&self, signal: &[f64], position: usize) -> Result<f64> {
        if position >= signal.len() {
            return Err(Error::PositionOutOfBounds {
                position,
                len: signal.len(),
            });
        }
        Ok(self.convolve(signal, position))
    }

    /// `position < signal.len()`.
    fn convolve(&self, signal: &[f64], position: usize) -> f64 {
        let n = signal.len();
        if n == 1 {
            let (center, taps) = match self.coefficients.split_first() {
                Some(split) => split,
                None => return 0.0,
            };
            let weight = center + 2.0 * taps.iter().sum::<f64>();
            return signal[0] * weight * self.corner_factor;
        }

        let p = position as isize;
        let mut acc = 0.0;
        for (i, &c) in self.coefficients.iter().enumerate() {
            if i == 0 {
                acc += c * signal[position];
                continue;
            }
            let i = i as isize;
            acc += c * (signal[mirror(p - i, n)] + signal[mirror(p + i, n)]);
        }
        acc
    }
}

/// Reflects `idx` into `[0, n)` about the first and last samples. `n >= 2`.
fn mirror(mut idx: isize, n: usize) -> usize {
    let last = n as isize - 1;
    loop {
        if idx < 0 {
            idx = -idx;
        } else if idx > last {
            idx = last - (idx - last);
        } else {
            return idx as usize;
        }
    }
}

/// A lowpass/highpass kernel pair evaluated as one polyphase analysis step.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelApplier {
    lowpass: Kernel,
    highpass: Kernel,
}

impl KernelApplier {
    pub fn new(lowpass: Kernel, highpass: Kernel) -> Self {
        Self { lowpass, highpass }
    }

    pub fn lowpass(&self) -> &Kernel {
        &self.lowpass
    }

    pub fn highpass(&self) -> &Kernel {
        &self.highpass
    }

    /// Even outputs from the lowpass kernel, odd outputs from the highpass,
    /// each evaluated at its own position.
    pub fn transform(&self, signal: &[f64]) -> Vec<f64> {
        (0..signal.len())
            .map(|i| {
                if i % 2 == 0 {
                    self.lowpass.convolve(signal, i)
                } else {
                    self.highpass.convolve(signal, i)
                }
            })
            .collect()
    }
}

/// 1-D wavelet transform through explicit convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelWavelet {
    analysis: KernelApplier,
    synthesis_lowpass: Kernel,
    synthesis_highpass: Kernel,
}

impl KernelWavelet {
    /// Builds the synthesis pair from the analysis pair: the synthesis lowpass
    /// is the reversed analysis highpass and the synthesis highpass is the
    /// reversed analysis lowpass, both scaled by `gain`.
    pub fn from_analysis(lowpass: Kernel, highpass: Kernel, gain: f64) -> Self {
        let synthesis_lowpass = highpass
            .reversed()
            .scaled(gain)
            .with_corner_factor(1.0 / gain);
        let synthesis_highpass = lowpass.reversed().scaled(gain);
        Self {
            analysis: KernelApplier::new(lowpass, highpass),
            synthesis_lowpass,
            synthesis_highpass,
        }
    }

    pub fn cdf97() -> Self {
        Self::from_analysis(
            Kernel::new(CDF97_LOWPASS.to_vec()),
            Kernel::new(CDF97_HIGHPASS.to_vec()),
            SYNTHESIS_GAIN,
        )
    }

    pub fn analysis(&self) -> &KernelApplier {
        &self.analysis
    }

    pub fn synthesis_lowpass(&self) -> &Kernel {
        &self.synthesis_lowpass
    }

    pub fn synthesis_highpass(&self) -> &Kernel {
        &self.synthesis_highpass
    }
}

impl WaveletTransform for KernelWavelet {
    fn forward_transform(&self, signal: &mut [f64]) {
        if signal.is_empty() {
            return;
        }
        debug!("kernel forward over {} samples", signal.len());
        let out = self.analysis.transform(signal);
        signal.copy_from_slice(&out);
        pack(signal);
    }

    fn reverse_transform(&self, signal: &mut [f64]) {
        if signal.is_empty() {
            return;
        }
        debug!("kernel reverse over {} samples", signal.len());
        unpack(signal);

        let n = signal.len();
        let mut low = vec![0.0; n];
        let mut high = vec![0.0; n];
        for (i, &v) in signal.iter().enumerate() {
            if i % 2 == 0 {
                low[i] = v;
            } else {
                high[i] = v;
            }
        }
        for (i, out) in signal.iter_mut().enumerate() {
            *out = self.synthesis_lowpass.convolve(&low, i)
                + self.synthesis_highpass.convolve(&high, i);
        }
    }
}
