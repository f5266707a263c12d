use crate::patch::Patch;
use crate::service::{AppError, Service, ToActiveModel};
use chrono::Utc;
use db::models::user::{ActiveModel, Column, Entity};
use db::repository::Repository;
use sea_orm::{DbConn, Set};
use validator::Validate;

pub use db::models::user::Model as User;

#[derive(Debug, Clone, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub office_location: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateUser {
    pub id: i64,

    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub office_location: Patch<String>,
}

fn clean_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

impl ToActiveModel<Entity> for CreateUser {
    async fn into_active_model(self, _db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let now = Utc::now();
        Ok(ActiveModel {
            name: Set(self.name.trim().to_string()),
            email: Set(self.email.trim().to_lowercase()),
            office_location: Set(clean_location(self.office_location)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

impl ToActiveModel<Entity> for UpdateUser {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let user = Repository::<Entity, Column>::find_by_id(db, self.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User ID {} not found", self.id)))?;
        let current_location = user.office_location.clone();
        let mut active: ActiveModel = user.into();

        if let Some(name) = self.name {
            active.name.set_if_not_equals(name.trim().to_string());
        }

        if let Some(email) = self.email {
            active.email.set_if_not_equals(email.trim().to_lowercase());
        }

        active
            .office_location
            .set_if_not_equals(clean_location(self.office_location.apply(current_location)));

        active.updated_at = Set(Utc::now());

        Ok(active)
    }
}

pub struct UserService;

impl<'a> Service<'a, Entity, Column, CreateUser, UpdateUser> for UserService {
    // ↓↓↓ OVERRIDE DEFAULT BEHAVIOR IF NEEDED HERE ↓↓↓
}

impl UserService {
    // ↓↓↓ CUSTOM METHODS CAN BE DEFINED HERE ↓↓↓

    /// Fetches a user or fails with `NotFound`.
    pub async fn get(db: &DbConn, id: i64) -> Result<User, AppError> {
        Repository::<Entity, Column>::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User ID {} not found", id)))
    }
}
