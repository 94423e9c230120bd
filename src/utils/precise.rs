//! Precise - arbitrary precision decimal arithmetic for coin amounts
//!
//! Token amounts are scaled between display units (und/fund) and the
//! base denomination (nund, 10^-9) without ever touching f64 arithmetic.

use crate::errors::{UndError, UndResult};
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;
use std::str::FromStr;

/// Precise number with arbitrary precision decimal support
#[derive(Clone, Debug)]
pub struct Precise {
    /// The integer representation (scaled by 10^decimals)
    pub integer: BigInt,
    /// Number of decimal places
    pub decimals: i32,
}

impl Precise {
    /// Create a new Precise from BigInt and decimal count
    pub fn new(integer: BigInt, decimals: i32) -> Self {
        Precise { integer, decimals }
    }

    /// Parse a decimal string, rejecting anything that is not a number.
    ///
    /// Accepts an optional leading sign, one decimal point and scientific
    /// notation (`1.5e9`). Anything else is an error so that a malformed
    /// amount never silently becomes zero.
    pub fn from_string(number: &str) -> UndResult<Self> {
        let number = number.trim().to_lowercase();
        if number.is_empty() {
            return Err(UndError::InvalidInput {
                message: "amount should not be empty".to_string(),
            });
        }

        // Split off scientific notation exponent
        let (num_part, modifier) = if let Some(e_pos) = number.find('e') {
            let (num, exp) = number.split_at(e_pos);
            let modifier: i32 = exp[1..].parse().map_err(|_| UndError::InvalidInput {
                message: format!("invalid number: {number}"),
            })?;
            (num.to_string(), modifier)
        } else {
            (number.clone(), 0)
        };

        if num_part.matches('.').count() > 1 {
            return Err(UndError::InvalidInput {
                message: format!("invalid number: {number}"),
            });
        }

        let decimals = match num_part.find('.') {
            Some(idx) => (num_part.len() - idx - 1) as i32,
            None => 0,
        };

        let integer_string = num_part.replace('.', "");
        let integer = BigInt::from_str(&integer_string).map_err(|_| UndError::InvalidInput {
            message: format!("invalid number: {number}"),
        })?;

        Ok(Precise {
            integer,
            decimals: decimals - modifier,
        })
    }

    /// Multiply two Precise numbers
    pub fn mul(&self, other: &Precise) -> Precise {
        let integer_result = &self.integer * &other.integer;
        Precise::new(integer_result, self.decimals + other.decimals)
    }

    /// True if the reduced value has no fractional part
    pub fn is_integer(&self) -> bool {
        let mut copy = self.clone();
        copy.reduce();
        copy.decimals <= 0
    }

    /// True if the value is exactly zero
    pub fn is_zero(&self) -> bool {
        self.integer.is_zero()
    }

    /// True if the value is strictly positive
    pub fn is_positive(&self) -> bool {
        self.integer > BigInt::zero()
    }

    /// Reduce the number by removing trailing zeros
    pub fn reduce(&mut self) {
        let string = self.integer.to_string();
        let string = string.trim_start_matches('-');

        if string == "0" {
            self.decimals = 0;
            return;
        }

        let mut trailing_zeros = 0;
        for c in string.chars().rev() {
            if c == '0' {
                trailing_zeros += 1;
            } else {
                break;
            }
        }

        if trailing_zeros > 0 {
            self.decimals -= trailing_zeros as i32;
            let new_len = string.len() - trailing_zeros;
            let is_negative = self.integer < BigInt::zero();
            let new_string = &string[..new_len];
            self.integer = BigInt::from_str(new_string).unwrap_or_else(|_| BigInt::zero());
            if is_negative {
                self.integer = -&self.integer;
            }
        }
    }

    /// Check equality with another Precise
    pub fn equals(&self, other: &Precise) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.reduce();
        b.reduce();
        a.decimals == b.decimals && a.integer == b.integer
    }

    /// Convert to string representation
    pub fn to_str_repr(&self) -> String {
        let mut copy = self.clone();
        copy.reduce();

        let (sign, abs) = if copy.integer < BigInt::zero() {
            ("-", -&copy.integer)
        } else {
            ("", copy.integer.clone())
        };

        let abs_string = abs.to_string();

        if copy.decimals <= 0 {
            // No decimal point needed, may need trailing zeros
            if copy.decimals < 0 {
                return format!(
                    "{}{}{}",
                    sign,
                    abs_string,
                    "0".repeat((-copy.decimals) as usize)
                );
            }
            return format!("{sign}{abs_string}");
        }

        // Need to add decimal point
        let padded = format!("{:0>width$}", abs_string, width = copy.decimals as usize);
        let decimal_pos = padded.len() as i32 - copy.decimals;

        if decimal_pos <= 0 {
            let zeros_needed = (-decimal_pos) as usize;
            return format!("{}0.{}{}", sign, "0".repeat(zeros_needed), padded);
        }

        let (integer_part, decimal_part) = padded.split_at(decimal_pos as usize);
        if decimal_part.is_empty() {
            format!("{sign}{integer_part}")
        } else {
            format!("{sign}{integer_part}.{decimal_part}")
        }
    }
}

impl fmt::Display for Precise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str_repr())
    }
}

impl PartialEq for Precise {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Precise {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_integer() {
        let p = Precise::from_string("123").unwrap();
        assert_eq!(p.integer, BigInt::from(123));
        assert_eq!(p.decimals, 0);
    }

    #[test]
    fn test_from_string_decimal() {
        let p = Precise::from_string("123.456").unwrap();
        assert_eq!(p.integer, BigInt::from(123456));
        assert_eq!(p.decimals, 3);
    }

    #[test]
    fn test_from_string_scientific() {
        let p = Precise::from_string("1.5e2").unwrap();
        assert_eq!(p.to_string(), "150");
    }

    #[test]
    fn test_from_string_rejects_garbage() {
        assert!(Precise::from_string("abc").is_err());
        assert!(Precise::from_string("1.2.3").is_err());
        assert!(Precise::from_string("").is_err());
    }

    #[test]
    fn test_mul() {
        let a = Precise::from_string("2.5").unwrap();
        let b = Precise::from_string("4").unwrap();
        assert_eq!(a.mul(&b).to_string(), "10");
    }

    #[test]
    fn test_base_unit_scaling() {
        // 2.001770112 display units -> 2001770112 base units
        let amount = Precise::from_string("2.001770112").unwrap();
        let factor = Precise::from_string("1000000000").unwrap();
        let scaled = amount.mul(&factor);
        assert_eq!(scaled.to_string(), "2001770112");
        assert!(scaled.is_integer());
    }

    #[test]
    fn test_fractional_base_amount_detected() {
        let amount = Precise::from_string("2.0000000001").unwrap();
        let factor = Precise::from_string("1000000000").unwrap();
        let scaled = amount.mul(&factor);
        assert_eq!(scaled.to_string(), "2000000000.1");
        assert!(!scaled.is_integer());
    }

    #[test]
    fn test_predicates() {
        assert!(Precise::from_string("0").unwrap().is_zero());
        assert!(Precise::from_string("0.000").unwrap().is_zero());
        assert!(Precise::from_string("1.2").unwrap().is_positive());
        assert!(!Precise::from_string("-1.2").unwrap().is_positive());
    }

    #[test]
    fn test_large_numbers() {
        let a = Precise::from_string("999999999999999999999999999999").unwrap();
        let b = Precise::from_string("1000").unwrap();
        assert_eq!(
            a.mul(&b).to_string(),
            "999999999999999999999999999999000"
        );
    }
}
