use super::condition::Kwargs;
use super::{Arg, Query};
use crate::db::PLACEHOLDER;
use crate::utils::{self, LIKE_ESCAPE};

pub fn to_update_query(kw: Vec<Kwargs>) -> Query {
    let mut args = Vec::new();
    let mut placeholders = Vec::new();
    let mut index = 0;
    for condition in kw {
        if let Kwargs::Condition { field, value, .. } = condition {
            index += 1;
            args.push(Arg { value });
            placeholders.push(format!("{field}={PLACEHOLDER}{index}",));
        }
    }

    Query {
        placeholders: placeholders.join(", "),
        args,
        ..Default::default()
    }
}

/// Renders a `where` clause. Placeholders are numbered after `offset`
/// so the caller can append further arguments.
pub fn to_select_query(kw: Vec<Kwargs>, offset: usize) -> Query {
    let mut args = Vec::new();
    let mut index = offset;
    let placeholders = render_conditions(kw, &mut index, &mut args);

    Query {
        placeholders,
        args,
        ..Default::default()
    }
}

fn render_conditions(kw: Vec<Kwargs>, index: &mut usize, args: &mut Vec<Arg>) -> String {
    let mut placeholders = Vec::new();
    for condition in kw {
        match condition {
            Kwargs::Condition {
                field,
                value,
                comparison_operator,
            } => {
                *index += 1;
                args.push(Arg { value });
                placeholders.push(format!("{field}{comparison_operator}{PLACEHOLDER}{index}"));
            }
            Kwargs::Contains { field, value } => {
                *index += 1;
                args.push(Arg {
                    value: utils::contains_pattern(&value),
                });
                placeholders.push(format!(
                    "lower({field}) like lower({PLACEHOLDER}{index}) escape '{LIKE_ESCAPE}'"
                ));
            }
            Kwargs::LogicalOperator { operator } => {
                placeholders.push(operator);
            }
            Kwargs::Group(inner) => {
                placeholders.push(format!("({})", render_conditions(inner, index, args)));
            }
        }
    }
    placeholders.join(" ")
}

pub fn to_insert_query(kw: Vec<Kwargs>) -> Query {
    let mut args = Vec::new();
    let mut fields = Vec::new();
    let mut placeholders = Vec::new();
    let mut index = 0;
    for condition in kw {
        if let Kwargs::Condition { field, value, .. } = condition {
            index += 1;
            args.push(Arg { value });
            fields.push(field);
            placeholders.push(format!("{PLACEHOLDER}{index}"));
        }
    }

    Query {
        placeholders: placeholders.join(", "),
        fields: fields.join(", "),
        args,
    }
}
