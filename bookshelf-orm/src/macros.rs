/// A macro to create a vector of `Kwargs::Condition` for different comparison operators.
///
/// This macro supports generating conditions for field-value pairs using various comparison operators:
/// `=`, `==`, `!=`, `<`, `<=`, `>`, `>=`, plus `icontains` for a case-insensitive substring match.
///
/// # Example
///
/// ```ignore
/// let conditions = kwargs!(
///     field1 = value1,
///     field2 = value2,
/// );
/// let contains = kwargs!(author icontains "tolkien");
/// let before = kwargs!(published_year < 1950);
/// ```
#[macro_export]
macro_rules! kwargs {
    ($($field:ident = $value:expr),* $(,)?) => {
        {
            let mut args = Vec::new();
            $(
                args.push($crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::utils::to_value(&$value),
                    comparison_operator: "=".to_string(),
                });
            )*
            args
        }
    };

    ($field:ident icontains $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Contains {
                    field: stringify!($field).to_string(),
                    value: $crate::utils::to_value(&$value),
                }
            ]
        }
    };

    ($field:ident == $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::utils::to_value(&$value),
                    comparison_operator: "=".to_string(),
                }
            ]
        }
    };

    ($field:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::utils::to_value(&$value),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };
}

/// Binds every `Arg` onto an sqlx query, choosing the Rust type from the JSON variant.
///
/// Must be expanded inside a function returning `Result<_, crate::Error>`.
macro_rules! binds {
    ($args:expr, $stream:expr) => {{
        for arg in $args {
            match arg.value {
                serde_json::Value::Null => {
                    $stream = $stream.bind(Option::<String>::None);
                }
                serde_json::Value::Bool(flag) => {
                    $stream = $stream.bind(i32::from(flag));
                }
                serde_json::Value::Number(ref number) => {
                    if let Some(int) = number.as_i64() {
                        $stream = $stream.bind(int);
                    } else {
                        let float = number
                            .as_f64()
                            .ok_or_else(|| format!("unsupported number {number}"))?;
                        $stream = $stream.bind(float);
                    }
                }
                serde_json::Value::String(text) => {
                    $stream = $stream.bind(text);
                }
                other => {
                    return Err(format!("cannot bind {other} as a query argument").into());
                }
            }
        }
    }};
}
