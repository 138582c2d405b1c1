use serde_json::Value;

use crate::db::TEXT_CAST;

#[derive(Debug, Clone, PartialEq)]
pub enum Kwargs {
    Condition {
        field: String,
        value: Value,
        comparison_operator: String,
    },
    /// Case-insensitive substring match, `lower(field) like lower('%value%')`.
    Contains {
        field: String,
        value: Value,
    },
    LogicalOperator {
        operator: String,
    },
    /// Conditions rendered inside parentheses.
    Group(Vec<Kwargs>),
}

impl Kwargs {
    /// Wraps `kwargs` in parentheses so it can be joined with `and`/`or`
    /// without changing its precedence. Single conditions stay unwrapped.
    pub fn group(kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        if kwargs.len() > 1 {
            vec![Kwargs::Group(kwargs)]
        } else {
            kwargs
        }
    }

    /// Equality on a column name only known at runtime.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Vec<Kwargs> {
        vec![Kwargs::Condition {
            field: field.into(),
            value: value.into(),
            comparison_operator: "=".to_string(),
        }]
    }

    /// Compares the column rendered as text, so `"1999"` matches an integer
    /// column holding 1999.
    pub fn label_eq(field: &str, label: impl Into<String>) -> Vec<Kwargs> {
        vec![Kwargs::Condition {
            field: format!("cast({field} as {TEXT_CAST})"),
            value: Value::String(label.into()),
            comparison_operator: "=".to_string(),
        }]
    }

    /// `icontains` on a column name only known at runtime.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Vec<Kwargs> {
        vec![Kwargs::Contains {
            field: field.into(),
            value: value.into(),
        }]
    }
}

pub trait Or {
    fn or(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

pub trait And {
    fn and(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

impl Or for Vec<Kwargs> {
    fn or(mut self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        if self.is_empty() {
            return kwargs;
        }
        if kwargs.is_empty() {
            return self;
        }
        self.push(Kwargs::LogicalOperator {
            operator: "or".to_string(),
        });
        self.extend(kwargs);
        self
    }
}

impl And for Vec<Kwargs> {
    fn and(mut self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        if self.is_empty() {
            return kwargs;
        }
        if kwargs.is_empty() {
            return self;
        }
        self.push(Kwargs::LogicalOperator {
            operator: "and".to_string(),
        });
        self.extend(kwargs);
        self
    }
}
