use crate::error::{BetSplitError, Result};
use serde::{Deserialize, Serialize};

/// Largest currency scale the settlement arithmetic accepts.
pub const MAX_CURRENCY_SCALE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Decimal places of the smallest currency unit (2 for cents).
    pub currency_scale: u32,
    pub currency_symbol: String,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency_scale: 2,
            currency_symbol: "$".to_string(),
        }
    }
}

impl SettlementConfig {
    pub fn new(currency_scale: u32, currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_scale,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_scale > MAX_CURRENCY_SCALE {
            return Err(BetSplitError::config(format!(
                "Currency scale must be at most {}",
                MAX_CURRENCY_SCALE
            )));
        }

        if self.currency_symbol.is_empty() {
            return Err(BetSplitError::config("Currency symbol cannot be empty"));
        }

        Ok(())
    }

    pub fn format(&self, value: crate::Money) -> String {
        crate::types::format_money(value, &self.currency_symbol, self.currency_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = SettlementConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.format(dec!(1.5)), "$1.50");
    }

    #[test]
    fn test_invalid_config() {
        assert!(SettlementConfig::new(9, "$").validate().is_err());
        assert!(SettlementConfig::new(2, "").validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SettlementConfig =
            serde_json::from_str(r#"{ "currency_symbol": "€" }"#).unwrap();
        assert_eq!(config.currency_scale, 2);
        assert_eq!(config.format(dec!(3)), "€3.00");
    }
}
