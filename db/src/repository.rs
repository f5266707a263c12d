use crate::filter_utils::{FilterUtils, SortUtils};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, Select,
};
use std::marker::PhantomData;
use std::str::FromStr;
use util::filters::FilterParam;

/// Generic repository over any SeaORM entity `E` whose columns `C` can be
/// resolved from their snake_case names.
pub struct Repository<E, C>
where
    E: EntityTrait,
    C: ColumnTrait + FromStr + 'static,
    C::Err: std::fmt::Display,
{
    _phantom: PhantomData<(E, C)>,
}

impl<E, C> Repository<E, C>
where
    E: EntityTrait,
    E::Model: Sync + Send + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ColumnTrait + FromStr + 'static,
    C::Err: std::fmt::Display,
{
    fn resolve_column(column_name: &str) -> Result<C, DbErr> {
        C::from_str(column_name)
            .map_err(|e| DbErr::Custom(format!("Invalid column name '{}': {}", column_name, e)))
    }

    pub fn apply_filter(
        query: Select<E>,
        filter_params: &[FilterParam],
    ) -> Result<Select<E>, DbErr> {
        let condition = FilterUtils::apply_all_filters(filter_params, Self::resolve_column)?;
        Ok(query.filter(condition))
    }

    pub fn apply_sorting(query: Select<E>, sort_by: Option<&str>) -> Result<Select<E>, DbErr> {
        SortUtils::apply_sorting(query, sort_by, Self::resolve_column)
    }

    pub async fn create(db: &DbConn, active_model: E::ActiveModel) -> Result<E::Model, DbErr> {
        active_model.insert(db).await
    }

    pub async fn update(db: &DbConn, active_model: E::ActiveModel) -> Result<E::Model, DbErr> {
        active_model.update(db).await
    }

    /// Deletes by primary key and returns the number of removed rows.
    pub async fn delete_by_id(
        db: &DbConn,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<u64, DbErr> {
        let res = E::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn find_by_id(
        db: &DbConn,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(db).await
    }

    pub async fn find_all(
        db: &DbConn,
        filter_params: &[FilterParam],
        sort_by: Option<&str>,
    ) -> Result<Vec<E::Model>, DbErr> {
        let query = Self::apply_filter(E::find(), filter_params)?;
        let query = Self::apply_sorting(query, sort_by)?;
        query.all(db).await
    }

    /// One page of matches plus the total count. Pages are 1-based.
    pub async fn filter(
        db: &DbConn,
        filter_params: &[FilterParam],
        page: u64,
        per_page: u64,
        sort_by: Option<&str>,
    ) -> Result<(Vec<E::Model>, u64), DbErr> {
        let query = Self::apply_filter(E::find(), filter_params)?;
        let query = Self::apply_sorting(query, sort_by)?;

        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    pub async fn count(db: &DbConn, filter_params: &[FilterParam]) -> Result<u64, DbErr> {
        let query = Self::apply_filter(E::find(), filter_params)?;
        <Select<E> as PaginatorTrait<'_, _>>::count(query, db).await
    }
}
