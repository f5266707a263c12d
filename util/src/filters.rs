//! Column filters used by the list queries of the repository layer.
//!
//! A `FilterParam` names a column by its snake_case name and carries the
//! value to compare against.

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Like,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParam {
    pub column: String,
    pub operator: CompareOp,
    pub value: FilterValue,
}

pub trait IntoFilterValue {
    fn into_filter_value(self) -> FilterValue;
}

impl IntoFilterValue for String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self)
    }
}

impl IntoFilterValue for &str {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self.to_string())
    }
}

impl IntoFilterValue for i64 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self)
    }
}

impl FilterParam {
    fn new(column: &str, operator: CompareOp, value: FilterValue) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value,
        }
    }

    pub fn eq(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Eq, value.into_filter_value())
    }

    /// Substring match.
    pub fn like(column: &str, value: &str) -> Self {
        Self::new(column, CompareOp::Like, value.into_filter_value())
    }
}
