//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit. The store prices in
//! Kuwaiti dinar, which has three decimal places (1 KD = 1000 fils).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Currency {
    #[default]
    KWD,
    SAR,
    AED,
    BHD,
    OMR,
    QAR,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "KWD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::KWD => "KWD",
            Currency::SAR => "SAR",
            Currency::AED => "AED",
            Currency::BHD => "BHD",
            Currency::OMR => "OMR",
            Currency::QAR => "QAR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the display symbol (e.g., "KD").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::KWD => "KD",
            Currency::SAR => "SR",
            Currency::AED => "AED",
            Currency::BHD => "BD",
            Currency::OMR => "OMR",
            Currency::QAR => "QR",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::KWD | Currency::BHD | Currency::OMR => 3,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "KWD" => Some(Currency::KWD),
            "SAR" => Some(Currency::SAR),
            "AED" => Some(Currency::AED),
            "BHD" => Some(Currency::BHD),
            "OMR" => Some(Currency::OMR),
            "QAR" => Some(Currency::QAR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in the smallest currency unit (fils for KWD).
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Kuwaiti dinar amount in fils.
    pub fn kwd(fils: i64) -> Self {
        Self::new(fils, Currency::KWD)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use mobi_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.995, Currency::KWD);
    /// assert_eq!(price.amount_minor, 49995);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_minor = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_major() as f64
    }

    /// Format without symbol (e.g., "49.995").
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major();
        let places = self.currency.decimal_places() as usize;
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let whole = abs / per_major as u64;
        let frac = abs % per_major as u64;
        if places == 0 {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{frac:0places$}")
        }
    }

    /// Format as a display string (e.g., "KD 49.995", "$10.00").
    pub fn display(&self) -> String {
        let symbol = self.currency.symbol();
        if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            format!("{} {}", symbol, self.display_amount())
        } else {
            format!("{}{}", symbol, self.display_amount())
        }
    }

    /// Try to add another Money value; `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to multiply by a scalar.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, clamping at the numeric bounds.
    pub fn saturating_multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_minor.saturating_mul(factor), self.currency)
    }

    /// Calculate a percentage of this amount, rounded to the minor unit.
    pub fn percentage(&self, percent: f64) -> Money {
        let amount = (self.amount_minor as f64 * percent / 100.0).round() as i64;
        Money::new(amount, self.currency)
    }

    /// Sum an iterator of Money values; `None` on mismatch or overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.995, Currency::KWD);
        assert_eq!(m.amount_minor, 49995);

        let m = Money::from_decimal(10.5, Currency::USD);
        assert_eq!(m.amount_minor, 1050);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::kwd(299_000).display(), "KD 299.000");
        assert_eq!(Money::kwd(1_250).display(), "KD 1.250");
        assert_eq!(Money::new(1000, Currency::USD).display(), "$10.00");
        assert_eq!(Money::kwd(-500).display_amount(), "-0.500");
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let a = Money::kwd(1000);
        let b = Money::kwd(500);
        assert_eq!(a.try_add(&b), Some(Money::kwd(1500)));
        assert_eq!(a.try_subtract(&b), Some(Money::kwd(500)));
        assert_eq!(a.try_multiply(3), Some(Money::kwd(3000)));
        assert_eq!(Money::kwd(i64::MAX).try_multiply(2), None);
    }

    #[test]
    fn test_money_currency_mismatch() {
        let kwd = Money::kwd(1000);
        let usd = Money::new(1000, Currency::USD);
        assert_eq!(kwd.try_add(&usd), None);
    }

    #[test]
    fn test_money_sum() {
        let values = [Money::kwd(100), Money::kwd(250), Money::kwd(650)];
        assert_eq!(
            Money::try_sum(values.iter(), Currency::KWD),
            Some(Money::kwd(1000))
        );
        let mixed = [Money::kwd(100), Money::new(100, Currency::USD)];
        assert_eq!(Money::try_sum(mixed.iter(), Currency::KWD), None);
    }

    #[test]
    fn test_money_ordering() {
        let mut prices = vec![Money::kwd(250_000), Money::kwd(90_000), Money::kwd(120_000)];
        prices.sort();
        assert_eq!(prices[0], Money::kwd(90_000));
        assert!(Money::kwd(1) < Money::kwd(2));
    }

    #[test]
    fn test_money_percentage() {
        let m = Money::kwd(100_000);
        assert_eq!(m.percentage(15.0).amount_minor, 15_000);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("kwd"), Some(Currency::KWD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
