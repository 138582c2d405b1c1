pub mod builder;
pub mod condition;
pub mod queryset;

pub struct Arg {
    pub value: serde_json::Value,
}

#[derive(Default)]
pub struct Query {
    pub placeholders: String,
    pub fields: String,
    pub args: Vec<Arg>,
}
