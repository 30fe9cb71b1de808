//! MACD (Moving Average Convergence Divergence) indicator.

use super::Ema;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Closes needed before the first histogram value exists.
    pub fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    /// MACD line, one value per close from `closes[slow_period - 1]`.
    pub fn line_series(&self, closes: &[f64]) -> Vec<f64> {
        if self.fast_period > self.slow_period {
            return Vec::new();
        }

        let fast_ema = Ema::new(self.fast_period).series(closes);
        let slow_ema = Ema::new(self.slow_period).series(closes);

        if fast_ema.is_empty() || slow_ema.is_empty() {
            return Vec::new();
        }

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect()
    }

    /// Histogram series (MACD line minus signal line).
    ///
    /// Only steps where the signal line exists are included.
    pub fn histogram_series(&self, closes: &[f64]) -> Vec<f64> {
        let macd_line = self.line_series(closes);
        let signal_line = Ema::new(self.signal_period).series(&macd_line);

        if signal_line.is_empty() {
            return Vec::new();
        }

        macd_line
            .iter()
            .skip(self.signal_period - 1)
            .zip(signal_line.iter())
            .map(|(m, s)| m - s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_histogram_length() {
        let closes = vec![1.1; 40];
        let macd = Macd::default();
        assert_eq!(macd.line_series(&closes).len(), 15);
        assert_eq!(macd.histogram_series(&closes).len(), 7);
        assert_eq!(macd.histogram_series(&closes[..34]).len(), 1);
        assert!(macd.histogram_series(&closes[..33]).is_empty());
    }

    #[test]
    fn test_flat_prices_have_zero_histogram() {
        let closes = vec![1.1; 50];
        let histogram = Macd::default().histogram_series(&closes);
        assert!(histogram.iter().all(|h| h.abs() < 1e-12));
    }

    #[test]
    fn test_rising_prices_positive_macd_line() {
        let closes: Vec<f64> = (0..60).map(|i| 1.0 + i as f64 * 0.001).collect();
        let line = Macd::default().line_series(&closes);
        assert!(line.iter().all(|m| *m > 0.0));
    }

    #[test]
    fn test_acceleration_turns_histogram_positive() {
        // Flat, then a sharp rally: MACD line pulls ahead of its signal line.
        let mut closes = vec![1.0; 40];
        closes.extend((1..=10).map(|i| 1.0 + i as f64 * 0.01));
        let histogram = Macd::default().histogram_series(&closes);
        assert!(*histogram.last().unwrap() > 0.0);
    }

    #[test]
    fn test_invalid_periods() {
        let closes = vec![1.0; 60];
        assert!(Macd::new(26, 12, 9).histogram_series(&closes).is_empty());
    }
}
