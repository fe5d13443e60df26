//! Lenient numeric coercion for JSON input coming from UIs and storage

use serde_json::Value;

/// Coerce a JSON value into a non-negative integer.
///
/// Accepts unsigned integers, integral floats and numeric strings. Anything
/// else (negative, fractional, null, objects, garbage text) yields `None` so
/// the caller can keep its previous value.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Same as [`coerce_u64`], narrowed to `u32`.
pub fn coerce_u32(value: &Value) -> Option<u32> {
    coerce_u64(value).and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_u64(&json!(25)), Some(25));
        assert_eq!(coerce_u64(&json!(25.0)), Some(25));
        assert_eq!(coerce_u64(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_u64(&json!(0)), Some(0));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(coerce_u64(&json!(-1)), None);
        assert_eq!(coerce_u64(&json!(2.5)), None);
        assert_eq!(coerce_u64(&json!("abc")), None);
        assert_eq!(coerce_u64(&json!(null)), None);
        assert_eq!(coerce_u64(&json!({"n": 1})), None);
        assert_eq!(coerce_u64(&json!(true)), None);
    }

    #[test]
    fn u32_rejects_overflow() {
        assert_eq!(coerce_u32(&json!(u64::from(u32::MAX) + 1)), None);
        assert_eq!(coerce_u32(&json!(7)), Some(7));
    }
}
