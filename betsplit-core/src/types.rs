use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// All stakes, odds and payouts are fixed-point decimals.
pub type Money = Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WagerId(Uuid);

impl WagerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WagerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerStatus {
    Pending,
    Won,
    Lost,
}

impl WagerStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, WagerStatus::Pending)
    }
}

impl fmt::Display for WagerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WagerStatus::Pending => "Pending",
            WagerStatus::Won => "Won",
            WagerStatus::Lost => "Lost",
        };
        f.write_str(label)
    }
}

/// Parse user input into a decimal. Accepts plain and scientific notation.
pub fn parse_decimal(input: &str) -> Option<Money> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

/// Standard rounding to the currency's smallest unit.
pub fn round_money(value: Money, scale: u32) -> Money {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_money(value: Money, symbol: &str, scale: u32) -> String {
    let rounded = round_money(value, scale);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.*}", symbol, scale as usize, rounded.abs())
    } else {
        format!("{}{:.*}", symbol, scale as usize, rounded.abs())
    }
}

/// Render a 0..1 share as a percentage with one decimal place.
pub fn format_percentage(share: Decimal) -> String {
    let pct = round_money(share * Decimal::ONE_HUNDRED, 1);
    format!("{:.1}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("100"), Some(dec!(100)));
        assert_eq!(parse_decimal(" 12.50 "), Some(dec!(12.50)));
        assert_eq!(parse_decimal("1e2"), Some(dec!(100)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(150), "$", 2), "$150.00");
        assert_eq!(format_money(dec!(-12.345), "$", 2), "-$12.35");
        assert_eq!(format_money(dec!(0.001), "$", 2), "$0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(1) / dec!(3)), "33.3%");
        assert_eq!(format_percentage(dec!(0)), "0.0%");
    }

    #[test]
    fn test_status() {
        assert!(!WagerStatus::Pending.is_resolved());
        assert!(WagerStatus::Won.is_resolved());
        assert_eq!(WagerStatus::Lost.to_string(), "Lost");
    }
}
