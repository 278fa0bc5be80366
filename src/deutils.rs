// src/deutils.rs
//
// Lenient field decoders for host snapshots. Hosts hand us whatever their
// own storage holds: ids as numbers or strings, readings as floats or text,
// timers as epoch floats or RFC 3339.
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use chrono::{DateTime, TimeZone, Utc};

pub fn default_zero_f64() -> f64 { 0.0 }

/// Any scalar becomes its string form, null becomes None.
pub fn deserialize_loose_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Object references: a number, a numeric string, or nothing.
/// Empty or non-numeric strings are treated as "not assigned".
pub fn deserialize_id_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Integer-ish state values: 0/1, "0"/"1", true/false.
pub fn deserialize_numeric_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(b as i64),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom("non-integer")),
        Value::String(s) => s.trim().parse().map_err(|_| D::Error::custom("non-integer")),
        _ => Err(D::Error::custom("non-integer")),
    }
}

/// Floats that may arrive as strings. Missing or null reads as 0.0.
pub fn deserialize_numeric_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let v = Value::deserialize(deserializer)?;
    match v {
        Value::Null => Ok(0.0),
        Value::Number(n) => n.as_f64().ok_or_else(|| D::Error::custom("non-numeric")),
        Value::String(s) => s.trim().parse().map_err(|_| D::Error::custom("non-numeric")),
        _ => Err(D::Error::custom("non-numeric")),
    }
}

/// Converts fractional epoch seconds into a UTC timestamp.
pub fn epoch_to_utc(float_epoch: f64) -> Option<DateTime<Utc>> {
    if !float_epoch.is_finite() {
        return None;
    }
    let secs = float_epoch.trunc() as i64;
    let nanos = (float_epoch.fract().abs() * 1_000_000_000.0) as u32;
    Utc.timestamp_opt(secs, nanos).earliest()
}

/// Absolute timers: epoch seconds (int, float or numeric string) or RFC 3339.
pub fn deserialize_epoch_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let v = Option::<Value>::deserialize(deserializer)?;
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let epoch = n.as_f64().ok_or_else(|| D::Error::custom("invalid epoch timestamp"))?;
            epoch_to_utc(epoch)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid epoch timestamp: {}", epoch)))
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(epoch) = s.parse::<f64>() {
                return epoch_to_utc(epoch)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid epoch timestamp: {}", s)));
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", s, e)))
        }
        Some(other) => Err(D::Error::custom(format!("invalid timestamp: {}", other))),
    }
}
