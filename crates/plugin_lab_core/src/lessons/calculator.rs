//! Calculator with validated operands.
//!
//! Operands arrive loosely typed ([`Operand`]) so the non-numeric error path
//! stays reachable.

use crate::ajax::number::parse_numeric;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CALCULATOR_VERSION: &str = "1.0.0";

/// Loosely typed calculator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    /// An operand was neither a number nor a numeric string.
    NonNumeric,
    /// Factorial input was not a non-negative integer.
    InvalidFactorialArgument,
    Overflow,
}

impl Display for CalculatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonNumeric => write!(f, "both arguments must be numeric"),
            Self::InvalidFactorialArgument => {
                write!(f, "argument must be an integer greater than or equal to 0")
            }
            Self::Overflow => write!(f, "result does not fit in a 64-bit integer"),
        }
    }
}

impl Error for CalculatorError {}

#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn add(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> Result<f64, CalculatorError> {
        Ok(numeric(&a.into())? + numeric(&b.into())?)
    }

    pub fn multiply(
        &self,
        a: impl Into<Operand>,
        b: impl Into<Operand>,
    ) -> Result<f64, CalculatorError> {
        Ok(numeric(&a.into())? * numeric(&b.into())?)
    }

    pub fn version(&self) -> &'static str {
        CALCULATOR_VERSION
    }

    /// `n!` for integer `n >= 0`; `0! == 1`.
    pub fn factorial(&self, n: impl Into<Operand>) -> Result<u64, CalculatorError> {
        let n = match n.into() {
            Operand::Int(value) if value >= 0 => value as u64,
            _ => return Err(CalculatorError::InvalidFactorialArgument),
        };
        (2..=n).try_fold(1u64, |acc, factor| {
            acc.checked_mul(factor).ok_or(CalculatorError::Overflow)
        })
    }

    /// Fixed decimals with `,` thousands separators, e.g. `1,234.57`.
    pub fn format_number(&self, number: f64, decimals: usize) -> String {
        let fixed = format!("{:.*}", decimals, number.abs());
        let (integral, fraction) = match fixed.split_once('.') {
            Some((integral, fraction)) => (integral, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let digits = integral.as_bytes();
        let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
        for (index, digit) in digits.iter().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(char::from(*digit));
        }

        let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
        let sign = if number.is_sign_negative() && !is_zero { "-" } else { "" };
        match fraction {
            Some(fraction) => format!("{sign}{grouped}.{fraction}"),
            None => format!("{sign}{grouped}"),
        }
    }
}

fn numeric(operand: &Operand) -> Result<f64, CalculatorError> {
    match operand {
        Operand::Int(value) => Ok(*value as f64),
        Operand::Float(value) if value.is_finite() => Ok(*value),
        Operand::Float(_) => Err(CalculatorError::NonNumeric),
        Operand::Text(text) => parse_numeric(text).ok_or(CalculatorError::NonNumeric),
    }
}
