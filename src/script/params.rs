//! Lenient readers for instruction parameter bags.
//!
//! The editor stores an empty string when a numeric field is cleared, and
//! older scripts carry numbers as strings. Anything that does not read as a
//! finite number becomes zero so the instruction runs with no effect.

use serde_json::Value;
use tracing::warn;

/// Read a numeric field, falling back to zero.
pub(crate) fn number(value: Option<&Value>, field: &str) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return 0.0,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => {
            warn!(field, value = ?value, "invalid_numeric_parameter");
            0.0
        }
    }
}

/// Read a text field; numbers and booleans are rendered, other shapes are empty.
pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Convert a loop count to whole iterations.
///
/// Fractional counts round up because the loop runs while `count < times`.
pub(crate) fn iterations(times: f64) -> u32 {
    if !times.is_finite() || times <= 0.0 {
        0
    } else if times >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = times.ceil() as u32;
        whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numbers_and_strings() {
        assert_eq!(number(Some(&json!(12)), "steps"), 12.0);
        assert_eq!(number(Some(&json!(-2.5)), "steps"), -2.5);
        assert_eq!(number(Some(&json!(" 7 ")), "steps"), 7.0);
    }

    #[test]
    fn test_number_falls_back_to_zero() {
        assert_eq!(number(None, "steps"), 0.0);
        assert_eq!(number(Some(&json!("")), "steps"), 0.0);
        assert_eq!(number(Some(&json!("ten")), "steps"), 0.0);
        assert_eq!(number(Some(&json!({"a": 1})), "steps"), 0.0);
        assert_eq!(number(Some(&json!("NaN")), "steps"), 0.0);
    }

    #[test]
    fn test_text_renders_scalars() {
        assert_eq!(text(Some(&json!("hi"))), "hi");
        assert_eq!(text(Some(&json!(3))), "3");
        assert_eq!(text(None), "");
    }

    #[test]
    fn test_iterations() {
        assert_eq!(iterations(3.0), 3);
        assert_eq!(iterations(2.5), 3);
        assert_eq!(iterations(0.0), 0);
        assert_eq!(iterations(-4.0), 0);
        assert_eq!(iterations(f64::NAN), 0);
        assert_eq!(iterations(1e20), u32::MAX);
    }
}
