use crate::DEFAULT_DEPRECIATION_RATE;

/// Linear depreciation: `original * (1 - rate * age)`.
///
/// Unbounded unless [`PriceCalculator::with_floor_at_zero`] is set; old
/// enough devices (or a steep rate) produce negative prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceCalculator {
    rate: f64,
    floor_at_zero: bool,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DEPRECIATION_RATE)
    }
}

impl PriceCalculator {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            floor_at_zero: false,
        }
    }

    pub fn with_floor_at_zero(mut self, floor: bool) -> Self {
        self.floor_at_zero = floor;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn current_price(&self, original_price: f64, age_years: i32) -> f64 {
        let reduction = self.rate * f64::from(age_years);
        let price = original_price * (1.0 - reduction);
        if self.floor_at_zero && price < 0.0 {
            0.0
        } else {
            price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn five_percent_per_year() {
        let calc = PriceCalculator::default();
        assert!(close(calc.current_price(1000.0, 2), 900.0));
    }

    #[test]
    fn zero_age_keeps_price() {
        assert_eq!(PriceCalculator::new(0.05).current_price(1234.5, 0), 1234.5);
    }

    #[test]
    fn negative_age_appreciates() {
        assert!(close(PriceCalculator::new(0.05).current_price(1000.0, -2), 1100.0));
    }

    #[test]
    fn goes_negative_without_floor() {
        let price = PriceCalculator::new(0.05).current_price(1000.0, 30);
        assert!(close(price, -500.0));
    }

    #[test]
    fn floor_clamps_to_zero() {
        let calc = PriceCalculator::new(0.05).with_floor_at_zero(true);
        assert_eq!(calc.current_price(1000.0, 30), 0.0);
        assert!(close(calc.current_price(1000.0, 2), 900.0));
    }
}
