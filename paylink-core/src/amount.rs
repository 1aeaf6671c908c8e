//! Coin amounts as exact integers of the smallest unit, with strict decimal
//! parsing and the two display styles used by wallets.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AmountError, UriError};

/// Conversion factor: 1 coin = 100,000,000 smallest units.
pub const UNITS_PER_COIN: i64 = 100_000_000;
/// One hundredth of a coin in smallest units.
pub const UNITS_PER_CENT: i64 = 1_000_000;
/// Decimal places a coin amount may carry.
pub const MAX_DECIMALS: i64 = 8;

/// Integer amount in smallest currency units.
///
/// The codec itself is signed so that display helpers can render debits;
/// payment requests only ever hold nonnegative values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(i64);

impl Amount {
    /// Nothing
    pub const ZERO: Amount = Amount(0);
    /// One hundredth of a coin
    pub const CENT: Amount = Amount(UNITS_PER_CENT);
    /// One whole coin
    pub const COIN: Amount = Amount(UNITS_PER_COIN);

    /// Wrap a raw count of smallest units.
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Raw count of smallest units.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// True below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `coins` whole coins plus `cents` hundredths of a coin.
    ///
    /// `cents` is added as-is, so a negative value subtracts from `coins`:
    /// `from_coins_and_cents(1, -1)` is 0.99 coins. Existing callers depend on
    /// that arithmetic; new code should pass a nonnegative `cents`.
    pub fn from_coins_and_cents(coins: i64, cents: i64) -> Result<Self, AmountError> {
        if cents >= 100 {
            return Err(AmountError::CentsOutOfRange { cents });
        }
        let whole = coins
            .checked_mul(UNITS_PER_COIN)
            .ok_or(AmountError::Overflow)?;
        let fraction = cents
            .checked_mul(UNITS_PER_CENT)
            .ok_or(AmountError::Overflow)?;
        whole
            .checked_add(fraction)
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Negate, or `None` for the one value without a positive counterpart.
    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    /// Coins with at least two decimals, e.g. `1.00` or `0.001`.
    pub fn to_friendly_string(&self) -> String {
        let (sign, whole, fraction) = self.split();
        let mut fraction = format!("{fraction:08}");
        while fraction.len() > 2 && fraction.ends_with('0') {
            fraction.pop();
        }
        format!("{sign}{whole}.{fraction}")
    }

    /// Exact coins with no trailing zeros, e.g. `1` or `12.34`.
    pub fn to_plain_string(&self) -> String {
        let (sign, whole, fraction) = self.split();
        if fraction == 0 {
            return format!("{sign}{whole}");
        }

        let mut fraction = format!("{fraction:08}");
        while fraction.ends_with('0') {
            fraction.pop();
        }
        format!("{sign}{whole}.{fraction}")
    }

    fn split(&self) -> (&'static str, u64, u64) {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_coin = UNITS_PER_COIN.unsigned_abs();
        (sign, magnitude / per_coin, magnitude % per_coin)
    }
}

/// Parse a decimal coin string into smallest units with no floating-point math.
///
/// Accepts an optional sign, digits with an optional `.` (either side may be
/// empty, not both) and an optional `e`/`E` exponent. The number of decimal
/// places left after applying the exponent must not exceed [`MAX_DECIMALS`];
/// this is checked on the digits as written, so `1.000000000` and `2E-20` are
/// both rejected.
pub fn parse_decimal(input: &str) -> Result<Amount, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if !input
        .bytes()
        .all(|byte| byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return Err(AmountError::InvalidCharacters);
    }

    let (negative, unsigned) = if let Some(rest) = input.strip_prefix('-') {
        (true, rest)
    } else {
        (false, input.strip_prefix('+').unwrap_or(input))
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], parse_exponent(&unsigned[idx + 1..])?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::InvalidFormat);
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::InvalidFormat);
    }

    let fraction_len = i64::try_from(fraction.len()).map_err(|_| AmountError::Overflow)?;
    let decimals = fraction_len.saturating_sub(exponent);
    if decimals > MAX_DECIMALS {
        return Err(AmountError::TooPrecise { decimals });
    }

    let digits = format!("{whole}{fraction}");
    let significant = digits.trim_start_matches('0');
    let magnitude = if significant.is_empty() {
        0
    } else {
        let value: i64 = significant.parse().map_err(|_| AmountError::Overflow)?;
        let shift = MAX_DECIMALS
            .checked_sub(decimals)
            .and_then(|shift| u32::try_from(shift).ok())
            .ok_or(AmountError::Overflow)?;
        10_i64
            .checked_pow(shift)
            .and_then(|scale| value.checked_mul(scale))
            .ok_or(AmountError::Overflow)?
    };

    Ok(Amount(if negative { -magnitude } else { magnitude }))
}

/// Whole coins plus cents; see [`Amount::from_coins_and_cents`].
pub fn combine(coins: i64, cents: i64) -> Result<Amount, AmountError> {
    Amount::from_coins_and_cents(coins, cents)
}

/// Render with at least two decimal places, more only when the value needs them.
pub fn format_friendly(amount: Amount) -> String {
    amount.to_friendly_string()
}

/// Render the exact value without trailing zeros or a dangling separator.
pub fn format_plain(amount: Option<Amount>) -> Result<String, UriError> {
    amount
        .map(|value| value.to_plain_string())
        .ok_or_else(|| UriError::invalid_argument("Value cannot be null"))
}

fn parse_exponent(input: &str) -> Result<i64, AmountError> {
    let (negative, digits) = if let Some(rest) = input.strip_prefix('-') {
        (true, rest)
    } else {
        (false, input.strip_prefix('+').unwrap_or(input))
    };
    if digits.is_empty() || !all_digits(digits) {
        return Err(AmountError::InvalidFormat);
    }

    let value: i64 = digits.parse().map_err(|_| AmountError::Overflow)?;
    Ok(if negative { -value } else { value })
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|byte| byte.is_ascii_digit())
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_decimal(&value)
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_plain_string()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}
