//! Relative Strength Index (RSI) indicator.

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// RSI series over closing prices using Wilder smoothing.
    ///
    /// One value per close starting at `closes[period]`.
    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        let period = self.period;
        if period == 0 || closes.len() < self.min_periods() {
            return Vec::new();
        }

        let mut gains = Vec::with_capacity(closes.len() - 1);
        let mut losses = Vec::with_capacity(closes.len() - 1);

        for window in closes.windows(2) {
            let change = window[1] - window[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        // Calculate initial averages
        let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
        let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;

        let mut values = Vec::with_capacity(gains.len() - period + 1);
        values.push(Self::value(avg_gain, avg_loss));

        // Use smoothed averages for remaining data
        for i in period..gains.len() {
            avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
            values.push(Self::value(avg_gain, avg_loss));
        }

        values
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return 100.0;
        }
        if avg_gain == 0.0 {
            return 0.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    fn downtrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 200.0 - i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert!(Rsi::default().series(&uptrend(14)).is_empty());
        assert_eq!(Rsi::default().series(&uptrend(15)).len(), 1);
    }

    #[test]
    fn test_rsi_series_length() {
        assert_eq!(Rsi::default().series(&uptrend(60)).len(), 46);
    }

    #[test]
    fn test_rsi_extremes() {
        let up = Rsi::default().series(&uptrend(50));
        let down = Rsi::default().series(&downtrend(50));
        assert!(up.iter().all(|v| *v == 100.0));
        assert!(down.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_rsi_alternating_near_midline() {
        let closes: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let series = Rsi::default().series(&closes);
        // Equal gains and losses seed the average at exactly 50.
        assert!((series[0] - 50.0).abs() < 1e-9);
        assert!(series.iter().all(|v| (40.0..=60.0).contains(v)));
    }

    #[test]
    fn test_rsi_wilder_smoothing_step() {
        // 14 alternating changes average to 0.5/0.5, then one gain of 1.
        let mut closes: Vec<f64> = (0..15)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        closes.push(closes[14] + 1.0);
        let series = Rsi::default().series(&closes);
        assert_eq!(series.len(), 2);
        let avg_gain = (0.5 * 13.0 + 1.0) / 14.0;
        let avg_loss = (0.5 * 13.0) / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((series[1] - expected).abs() < 1e-9);
    }
}
