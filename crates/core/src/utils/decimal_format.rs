//! Serde helpers that keep `Decimal` values as JSON numbers.
//!
//! A value an `f64` cannot carry exactly is written as a numeric string
//! instead, so every written value reads back unchanged. Reading accepts
//! numbers, numeric strings and scientific notation.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{self, Deserialize, Deserializer, Serializer};
use serde_json::Number;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    String(String),
    Number(Number),
}

pub(crate) fn parse_decimal_value(value: &str) -> std::result::Result<Decimal, String> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| format!("Invalid decimal value '{}': {}", value, e))
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract().is_zero() {
        if let Some(int) = value.to_i64() {
            return serializer.serialize_i64(int);
        }
    }
    match exact_f64(value) {
        Some(float) => serializer.serialize_f64(float),
        None => serializer.serialize_str(&value.normalize().to_string()),
    }
}

/// The `f64` whose shortest decimal form parses back to `value`, if any.
fn exact_f64(value: &Decimal) -> Option<f64> {
    let float = value.to_f64()?;
    let round_trip = parse_decimal_value(&float.to_string()).ok()?;
    (round_trip == *value).then_some(float)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalInput::deserialize(deserializer)? {
        DecimalInput::String(s) => parse_decimal_value(&s).map_err(serde::de::Error::custom),
        DecimalInput::Number(n) => {
            parse_decimal_value(&n.to_string()).map_err(serde::de::Error::custom)
        }
    }
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<DecimalInput>::deserialize(deserializer)? {
            None => Ok(None),
            Some(DecimalInput::String(s)) if s.trim().is_empty() => Ok(None),
            Some(DecimalInput::String(s)) => parse_decimal_value(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(DecimalInput::Number(n)) => parse_decimal_value(&n.to_string())
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
