//! Conversions to and from `serde_json::Value`.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::number::{Number, NumberError};
use crate::value::Value;

/// Reads the number's text, so an `arbitrary_precision` literal keeps every
/// digit and its scale.
impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        // serde_json only prints finite JSON number literals.
        n.to_string().parse().unwrap_or_default()
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::from(*b),
            serde_json::Value::Number(n) => Value::Number(Number::from(n)),
            serde_json::Value::String(s) => Value::String(Arc::from(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<IndexMap<_, _>>(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from(&value)
    }
}

/// Integral values that fit `i64`/`u64` convert exactly; every other number
/// goes through `f64`.
impl TryFrom<&Number> for serde_json::Number {
    type Error = NumberError;

    fn try_from(n: &Number) -> Result<Self, Self::Error> {
        if let Ok(i) = n.to_i64_exact() {
            return Ok(serde_json::Number::from(i));
        }
        if let Ok(u) = n.to_u64_exact() {
            return Ok(serde_json::Number::from(u));
        }
        serde_json::Number::from_f64(n.to_f64()).ok_or(NumberError::OutOfRange)
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = NumberError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::True => serde_json::Value::Bool(true),
            Value::False => serde_json::Value::Bool(false),
            Value::Number(n) => serde_json::Value::Number(serde_json::Number::try_from(n)?),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    out.insert(k.clone(), serde_json::Value::try_from(v)?);
                }
                serde_json::Value::Object(out)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use serde_json::json;

    #[test]
    fn from_serde_keeps_order_and_numbers() {
        let v = Value::from(json!({"z": 1, "a": [true, null, "s", 1.5, -7]}));
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
        let list = v.get("a").unwrap().as_array().unwrap();
        assert_eq!(list[3], Value::Number("1.5".parse().unwrap()));
        assert_eq!(list[4], Value::from(-7));
    }

    #[test]
    fn serde_numbers_follow_their_text() {
        let n = Number::from(&serde_json::Number::from(u64::MAX));
        assert_eq!(n.to_string(), "18446744073709551615");
        let n = Number::from(&serde_json::Number::from(-3i64));
        assert_eq!((n.unscaled(), n.scale()), (&BigInt::from(-3), 0));
        let n = Number::from(&serde_json::Number::from_f64(0.25).unwrap());
        assert_eq!((n.unscaled(), n.scale()), (&BigInt::from(25), 2));
        let n = Number::from(&serde_json::Number::from_f64(1e-7).unwrap());
        assert_eq!(n, "1e-7".parse::<Number>().unwrap());
    }

    #[test]
    fn to_serde() {
        let doc = json!({"a": [1, 2.5, u64::MAX], "b": {"c": null}});
        let back = serde_json::Value::try_from(&Value::from(&doc)).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn to_serde_rejects_huge_numbers() {
        let v = Value::Number("1e400".parse().unwrap());
        assert_eq!(serde_json::Value::try_from(&v), Err(NumberError::OutOfRange));
    }
}
