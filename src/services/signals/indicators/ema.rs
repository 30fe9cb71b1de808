//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) over a value series.
///
/// Seeded with the simple average of the first `period` values, then
/// `ema = (value - ema) * 2 / (period + 1) + ema`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Full EMA series. The first element lines up with `values[period - 1]`.
    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        if self.period == 0 || values.len() < self.period {
            return Vec::new();
        }

        let multiplier = 2.0 / (self.period as f64 + 1.0);
        let mut ema = Vec::with_capacity(values.len() - self.period + 1);

        // First EMA is SMA
        let sma: f64 = values.iter().take(self.period).sum::<f64>() / self.period as f64;
        ema.push(sma);

        let mut last = sma;
        for value in &values[self.period..] {
            last = (value - last) * multiplier + last;
            ema.push(last);
        }

        ema
    }
}
