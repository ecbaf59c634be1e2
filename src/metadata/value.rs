use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// Attribute value stored on a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Error, PartialEq)]
#[error("cannot convert '{raw}' to {expected}")]
pub struct CoercionError {
    pub raw: String,
    pub expected: &'static str,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Converts raw command-line text to the same variant as `self`.
    pub fn coerce_like(&self, raw: &str) -> Result<Value, CoercionError> {
        let mismatch = || CoercionError {
            raw: raw.to_string(),
            expected: self.type_name(),
        };

        match self {
            Value::String(_) => Ok(Value::String(raw.to_string())),
            Value::Integer(_) => raw.trim().parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch()),
            // JSON has no spelling for nan or infinities.
            Value::Float(_) => raw.trim().parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Value::Float)
                .ok_or_else(mismatch),
            Value::Boolean(_) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Python literal rendering, the format the display string uses.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&float_literal(*x)),
            Value::String(s) => f.write_str(&quote_literal(s)),
        }
    }
}

/// Shortest round-trip digits, switching to `1e+20` style exponents
/// outside `1e-4 <= |x| < 1e16`.
pub(crate) fn float_literal(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x == 0.0 {
        return format!("{}0.0", sign);
    }

    let scientific = format!("{:e}", x.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..16).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exponent.abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{}0.{}{}", sign, zeros, digits);
    }

    let int_len = exponent as usize + 1;
    if digits.len() > int_len {
        format!("{}{}.{}", sign, &digits[..int_len], &digits[int_len..])
    } else {
        format!("{}{}{}.0", sign, digits, "0".repeat(int_len - digits.len()))
    }
}

pub(crate) fn quote_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
