//! Predictive arithmetic coding.
//!
//! The alphabet of the underlying coder is the raw value range plus one
//! reserved symbol, [`PredictiveArithmeticCodec::predicted_symbol`], which
//! stands for "the predictor got this one right". Runs the predictor handles
//! well collapse into a single very likely symbol.

use log::{debug, warn};

use crate::bit_reader::BitWriter;
use crate::coder::{
    ArithmeticDecoder, ArithmeticEncoder, CoderConfig, SymbolDecoder, SymbolEncoder,
};
use crate::error::{Error, Result};
use crate::predictor::PredictiveFunction;

#[derive(Debug, Clone)]
pub struct PredictiveArithmeticCodec<P> {
    predictor: P,
    config: CoderConfig,
}

impl<P: PredictiveFunction> PredictiveArithmeticCodec<P> {
    /// Codec for raw values in `[0, number_of_chars)` with the default coder
    /// precision and frequency budget.
    pub fn new(predictor: P, number_of_chars: u32) -> Result<Self> {
        let alphabet_size = number_of_chars
            .checked_add(1)
            .ok_or_else(|| Error::InvalidCoderConfig("alphabet too large".to_owned()))?;
        Self::with_config(predictor, CoderConfig::new(alphabet_size))
    }

    /// Codec over an explicit coder configuration. The last symbol of the
    /// alphabet is the reserved one.
    pub fn with_config(predictor: P, config: CoderConfig) -> Result<Self> {
        config.validate()?;
        if config.alphabet_size < 2 {
            return Err(Error::InvalidCoderConfig(
                "alphabet must hold at least one raw value".to_owned(),
            ));
        }
        Ok(Self { predictor, config })
    }

    pub fn number_of_chars(&self) -> u32 {
        self.config.alphabet_size - 1
    }

    pub fn predicted_symbol(&self) -> u32 {
        self.number_of_chars()
    }

    pub fn coder_config(&self) -> &CoderConfig {
        &self.config
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Code `data` through `encoder` and finish the coding session.
    pub fn encode_with<E: SymbolEncoder>(
        &mut self,
        data: &[u32],
        encoder: &mut E,
        stream: &mut BitWriter,
    ) -> Result<()> {
        self.predictor.reset_statistics();
        let reserved = self.predicted_symbol();
        let mut hits = 0usize;
        for (position, &value) in data.iter().enumerate() {
            if value >= reserved {
                return Err(Error::SymbolOutOfRange {
                    symbol: value,
                    alphabet_size: reserved,
                });
            }
            if self.predictor.predict(data, position)? {
                hits += 1;
                encoder.code(reserved, stream)?;
            } else {
                encoder.code(value, stream)?;
            }
        }
        encoder.finish_coding(stream)?;
        debug!("predicted {} of {} samples", hits, data.len());
        Ok(())
    }

    /// Recover `len` values from `stream` through `decoder`.
    pub fn decode_with<D: SymbolDecoder>(
        &mut self,
        stream: &[u8],
        len: usize,
        decoder: &mut D,
    ) -> Result<Vec<u32>> {
        self.predictor.reset_statistics();
        let reserved = self.predicted_symbol();
        let symbols = decoder.decode(stream, len)?;

        let mut out = vec![0u32; len];
        for (position, &symbol) in symbols.iter().enumerate() {
            if symbol == reserved {
                self.predictor.predict(&out, position)?;
                out[position] = self
                    .predictor
                    .prediction()
                    .ok_or(Error::MissingPrediction { position })?;
            } else {
                out[position] = symbol;
                if self.predictor.predict(&out, position)? {
                    warn!(
                        "raw symbol {} at {} matches the prediction; stream from a different encoder?",
                        symbol, position
                    );
                }
            }
        }
        Ok(out)
    }

    /// Code `data` with a fresh [`ArithmeticEncoder`].
    pub fn encode(&mut self, data: &[u32]) -> Result<Vec<u8>> {
        let mut encoder = ArithmeticEncoder::new(self.config)?;
        let mut stream = BitWriter::new();
        self.encode_with(data, &mut encoder, &mut stream)?;
        let bytes = stream.finish();
        debug!("coded {} samples into {} bytes", data.len(), bytes.len());
        Ok(bytes)
    }

    /// Decode `len` values with a fresh [`ArithmeticDecoder`].
    pub fn decode(&mut self, stream: &[u8], len: usize) -> Result<Vec<u32>> {
        let mut decoder = ArithmeticDecoder::new(self.config)?;
        self.decode_with(stream, len, &mut decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{LastValue1D, LookBackMajority1D, Neighborhood2D, NoPrediction};

    #[test]
    fn test_last_value_round_trip() {
        let data = [5, 5, 5, 2, 5, 5, 5, 5];
        let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 6).unwrap();
        assert_eq!(codec.predicted_symbol(), 6);
        let bytes = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&bytes, data.len()).unwrap(), data);
    }

    #[test]
    fn test_codec_is_reusable() {
        let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 16).unwrap();
        let a = [1, 2, 3, 3, 3, 15, 0];
        let b = [9, 9, 9, 9];
        let bytes_a = codec.encode(&a).unwrap();
        let bytes_b = codec.encode(&b).unwrap();
        assert_eq!(codec.decode(&bytes_b, b.len()).unwrap(), b);
        assert_eq!(codec.decode(&bytes_a, a.len()).unwrap(), a);
    }

    #[test]
    fn test_no_prediction_round_trip() {
        let data: Vec<u32> = (0..200).map(|i| (i * 13) % 64).collect();
        let mut codec = PredictiveArithmeticCodec::new(NoPrediction, 64).unwrap();
        let bytes = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&bytes, data.len()).unwrap(), data);
    }

    #[test]
    fn test_neighborhood_round_trip() {
        let (rows, cols) = (6, 9);
        let data: Vec<u32> = (0..rows * cols)
            .map(|i| ((i / cols) / 2 + (i % cols) / 3) as u32)
            .collect();
        let mut codec = PredictiveArithmeticCodec::new(Neighborhood2D::new(rows, cols), 8).unwrap();
        let bytes = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&bytes, data.len()).unwrap(), data);
    }

    #[test]
    fn test_look_back_round_trip() {
        let data = [1, 1, 2, 1, 1, 3, 1, 1, 2, 2, 2, 0, 2, 2];
        let predictor = LookBackMajority1D::new(3, 4).unwrap();
        let mut codec = PredictiveArithmeticCodec::new(predictor, 4).unwrap();
        let bytes = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&bytes, data.len()).unwrap(), data);
    }

    #[test]
    fn test_prediction_shrinks_stream() {
        let data: Vec<u32> = (0..4096).map(|i| i / 64).collect();
        let mut predicted = PredictiveArithmeticCodec::new(LastValue1D::new(), 256).unwrap();
        let mut raw = PredictiveArithmeticCodec::new(NoPrediction, 256).unwrap();
        let a = predicted.encode(&data).unwrap();
        let b = raw.encode(&data).unwrap();
        assert!(a.len() < b.len(), "{} vs {}", a.len(), b.len());
    }

    #[test]
    fn test_rejects_out_of_range_value() {
        let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 6).unwrap();
        assert_eq!(
            codec.encode(&[1, 6]),
            Err(Error::SymbolOutOfRange {
                symbol: 6,
                alphabet_size: 6
            })
        );
    }

    #[test]
    fn test_reserved_symbol_without_prediction() {
        // A stream whose first symbol is the reserved one cannot be decoded
        // with a predictor that has no candidate at position 0.
        let config = CoderConfig::new(3);
        let mut encoder = ArithmeticEncoder::new(config).unwrap();
        let mut stream = BitWriter::new();
        encoder.code(2, &mut stream).unwrap();
        encoder.finish_coding(&mut stream).unwrap();
        let bytes = stream.finish();

        let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 2).unwrap();
        assert_eq!(
            codec.decode(&bytes, 1),
            Err(Error::MissingPrediction { position: 0 })
        );
    }

    #[test]
    fn test_empty_data() {
        let mut codec = PredictiveArithmeticCodec::new(LastValue1D::new(), 4).unwrap();
        let bytes = codec.encode(&[]).unwrap();
        assert!(codec.decode(&bytes, 0).unwrap().is_empty());
    }
}
