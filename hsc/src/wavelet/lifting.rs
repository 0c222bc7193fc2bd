//! In-place lifting form of the CDF-9/7 transform.

use log::debug;

use super::{pack, unpack, WaveletTransform};

/// Lifting parameters for the 9-7 irreversible filter
pub mod lifting_params_97 {
    /// α (alpha) first predict coefficient
    pub const ALPHA: f64 = -1.586_134_342_059_924;
    /// β (beta) first update coefficient
    pub const BETA: f64 = -0.052_980_118_572_961;
    /// γ (gamma) second predict coefficient
    pub const GAMMA: f64 = 0.882_911_075_530_934;
    /// δ (delta) second update coefficient
    pub const DELTA: f64 = 0.443_506_852_043_971;
    /// K scaling parameter
    pub const K: f64 = 1.230_174_104_914_001;
}

/// Adds `c * (left + right)` to every odd sample. At an even length the last
/// sample has one neighbour, which counts twice.
fn predict(s: &mut [f64], c: f64) {
    let n = s.len();
    let mut i = 1;
    while i + 1 < n {
        s[i] += c * (s[i - 1] + s[i + 1]);
        i += 2;
    }
    if n % 2 == 0 {
        s[n - 1] += 2.0 * c * s[n - 2];
    }
}

/// Adds `c * (left + right)` to every even sample, doubling the single
/// neighbour at either end.
fn update(s: &mut [f64], c: f64) {
    let n = s.len();
    if n < 2 {
        return;
    }
    s[0] += 2.0 * c * s[1];
    let mut i = 2;
    while i + 1 < n {
        s[i] += c * (s[i - 1] + s[i + 1]);
        i += 2;
    }
    if n % 2 == 1 {
        s[n - 1] += 2.0 * c * s[n - 2];
    }
}

fn scale(s: &mut [f64], even: f64, odd: f64) {
    for (i, v) in s.iter_mut().enumerate() {
        *v *= if i % 2 == 0 { even } else { odd };
    }
}

/// 1-D wavelet transform through predict and update passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftingWavelet {
    predict1: f64,
    update1: f64,
    predict2: f64,
    update2: f64,
    k0: f64,
    k1: f64,
}

impl LiftingWavelet {
    pub fn cdf97() -> Self {
        use lifting_params_97::*;
        Self {
            predict1: ALPHA,
            update1: BETA,
            predict2: GAMMA,
            update2: DELTA,
            k0: 1.0 / K,
            k1: K / 2.0,
        }
    }
}

impl Default for LiftingWavelet {
    fn default() -> Self {
        Self::cdf97()
    }
}

impl WaveletTransform for LiftingWavelet {
    fn forward_transform(&self, signal: &mut [f64]) {
        if signal.len() < 2 {
            return;
        }
        debug!("lifting forward over {} samples", signal.len());
        predict(signal, self.predict1);
        update(signal, self.update1);
        predict(signal, self.predict2);
        update(signal, self.update2);
        scale(signal, self.k0, self.k1);
        pack(signal);
    }

    fn reverse_transform(&self, signal: &mut [f64]) {
        if signal.len() < 2 {
            return;
        }
        debug!("lifting reverse over {} samples", signal.len());
        unpack(signal);
        scale(signal, 1.0 / self.k0, 1.0 / self.k1);
        update(signal, -self.update2);
        predict(signal, -self.predict2);
        update(signal, -self.update1);
        predict(signal, -self.predict1);
    }
}
