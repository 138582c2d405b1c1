use serde::Serialize;
use serde_json::Value;

/// Converts a bound value into the JSON representation carried by `Kwargs`.
///
/// Booleans are stored as integers since every supported backend keeps them
/// in an integer column.
pub fn to_value(value: impl Serialize) -> Value {
    match serde_json::to_value(value) {
        Ok(Value::Bool(flag)) => Value::from(i32::from(flag)),
        Ok(other) => other,
        Err(_) => Value::Null,
    }
}

/// Escape character for `like` patterns. Backslash is avoided since MySQL
/// treats it as a string escape.
pub const LIKE_ESCAPE: char = '!';

/// Escapes `!`, `%` and `_` so the text matches literally inside a `like`
/// pattern declared with `escape '!'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the `%text%` pattern used by `icontains`.
pub fn contains_pattern(value: &Value) -> Value {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Value::String(format!("%{}%", escape_like(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools_become_integers() {
        assert_eq!(to_value(true), Value::from(1));
        assert_eq!(to_value(false), Value::from(0));
        assert_eq!(to_value("x"), Value::from("x"));
        assert_eq!(to_value(Option::<i32>::None), Value::Null);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_!"), "100!%!_!!");
        assert_eq!(
            contains_pattern(&Value::from("a_b")),
            Value::from("%a!_b%")
        );
        assert_eq!(contains_pattern(&Value::from(1999)), Value::from("%1999%"));
    }
}
