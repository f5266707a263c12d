use common::format_validation_errors;
use db::repository::Repository;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait,
};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use thiserror::Error;
use util::filters::FilterParam;
use validator::ValidationErrors;

/// Errors surfaced by every service.
///
/// `Validation`, `NotFound` and `Conflict` carry a message meant for the end
/// user and are always raised before anything is written.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => AppError::NotFound(message),
            other => AppError::Database(other),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(format_validation_errors(&errors))
    }
}

/// Converts a create/update DTO into an active model, performing any lookups
/// and validation it needs on the way.
pub trait ToActiveModel<E>
where
    E: EntityTrait,
{
    fn into_active_model(
        self,
        db: &DbConn,
    ) -> impl Future<Output = Result<<E as EntityTrait>::ActiveModel, AppError>> + Send;
}

pub trait Service<'a, E, C, CreateDTO, UpdateDTO>: Send + Sync
where
    E: EntityTrait,
    E::Model: Send + Sync + IntoActiveModel<E::ActiveModel> + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    C: ColumnTrait + FromStr + Send + Sync + 'static,
    C::Err: Display,
    CreateDTO: ToActiveModel<E> + Send + 'static,
    UpdateDTO: ToActiveModel<E> + Send + 'static,
{
    fn create(
        db: &'a DbConn,
        params: CreateDTO,
    ) -> Pin<Box<dyn Future<Output = Result<E::Model, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let active = params.into_active_model(db).await?;
            Repository::<E, C>::create(db, active)
                .await
                .map_err(AppError::from)
        })
    }

    fn update(
        db: &'a DbConn,
        params: UpdateDTO,
    ) -> Pin<Box<dyn Future<Output = Result<E::Model, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let active = params.into_active_model(db).await?;
            Repository::<E, C>::update(db, active)
                .await
                .map_err(AppError::from)
        })
    }

    /// Hard delete. `NotFound` when no row matched.
    fn delete(
        db: &'a DbConn,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            let label = format!("{} {:?}", E::default().table_name(), id);
            match Repository::<E, C>::delete_by_id(db, id).await? {
                0 => Err(AppError::NotFound(format!("{} not found", label))),
                _ => Ok(()),
            }
        })
    }

    fn find_by_id(
        db: &'a DbConn,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Pin<Box<dyn Future<Output = Result<Option<E::Model>, AppError>> + Send + 'a>> {
        Box::pin(async move {
            Repository::<E, C>::find_by_id(db, id)
                .await
                .map_err(AppError::from)
        })
    }

    fn find_all(
        db: &'a DbConn,
        filter_params: &'a [FilterParam],
        sort_by: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<E::Model>, AppError>> + Send + 'a>> {
        Box::pin(async move {
            Repository::<E, C>::find_all(db, filter_params, sort_by)
                .await
                .map_err(AppError::from)
        })
    }

    fn count(
        db: &'a DbConn,
        filter_params: &'a [FilterParam],
    ) -> Pin<Box<dyn Future<Output = Result<u64, AppError>> + Send + 'a>> {
        Box::pin(async move {
            Repository::<E, C>::count(db, filter_params)
                .await
                .map_err(AppError::from)
        })
    }
}
