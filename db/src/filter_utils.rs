use sea_orm::sea_query::IntoCondition;
use sea_orm::{ColumnTrait, Condition, DbErr, EntityTrait, QueryOrder, Select, Value};
use util::filters::{CompareOp, FilterParam, FilterValue};

pub struct FilterUtils;

impl FilterUtils {
    /// Adds one filter parameter to `condition`.
    pub fn apply_filter<C>(
        condition: Condition,
        column: C,
        filter_param: &FilterParam,
    ) -> Result<Condition, DbErr>
    where
        C: ColumnTrait,
    {
        let expr = match (&filter_param.operator, &filter_param.value) {
            (CompareOp::Eq, FilterValue::String(v)) => column.eq(Value::from(v.clone())),
            (CompareOp::Eq, FilterValue::Int(v)) => column.eq(Value::from(*v)),
            (CompareOp::Like, FilterValue::String(v)) => column.contains(v),
            (CompareOp::Like, FilterValue::Int(_)) => {
                return Err(DbErr::Custom(format!(
                    "LIKE on '{}' requires a string value",
                    filter_param.column
                )));
            }
        };

        Ok(condition.add(expr.into_condition()))
    }

    /// Resolves every column by name and combines all filters with AND.
    pub fn apply_all_filters<C>(
        filter_params: &[FilterParam],
        column_resolver: impl Fn(&str) -> Result<C, DbErr>,
    ) -> Result<Condition, DbErr>
    where
        C: ColumnTrait,
    {
        let mut condition = Condition::all();

        for filter_param in filter_params {
            let column = column_resolver(&filter_param.column)?;
            condition = Self::apply_filter(condition, column, filter_param)?;
        }

        Ok(condition)
    }
}

pub struct SortUtils;

impl SortUtils {
    /// Orders by `sort_by`; a leading `-` sorts descending.
    pub fn apply_sorting<E, C>(
        mut query: Select<E>,
        sort_by: Option<&str>,
        column_resolver: impl Fn(&str) -> Result<C, DbErr>,
    ) -> Result<Select<E>, DbErr>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        if let Some(sort) = sort_by {
            let (column_name, asc) = match sort.strip_prefix('-') {
                Some(rest) => (rest, false),
                None => (sort, true),
            };

            let column = column_resolver(column_name)?;
            query = if asc {
                query.order_by_asc(column)
            } else {
                query.order_by_desc(column)
            };
        }
        Ok(query)
    }
}
