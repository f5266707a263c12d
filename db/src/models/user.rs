use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents a staff member in the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Office the user works from. Copied into ip records as `company`.
    pub office_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asset_assignment::Entity")]
    AssetAssignments,

    #[sea_orm(has_many = "super::ip_address::Entity")]
    IpAddresses,
}

impl Related<super::asset_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetAssignments.def()
    }
}

impl Related<super::ip_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IpAddresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        name: &str,
        email: &str,
        office_location: Option<&str>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            office_location: Set(office_location.map(str::to_owned)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_sets_timestamps() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "Rina", "rina@example.com", Some("Jakarta HQ"))
            .await
            .expect("create user");
        assert_eq!(user.office_location.as_deref(), Some("Jakarta HQ"));

        assert_eq!(user.created_at, user.updated_at);

        let found = Entity::find_by_id(user.id).one(&db).await.unwrap();
        assert_eq!(found.map(|u| u.email).as_deref(), Some("rina@example.com"));
    }

    #[tokio::test]
    async fn email_is_unique() {
        let db = setup_test_db().await;

        Model::create(&db, "A", "dup@example.com", None).await.unwrap();
        let err = Model::create(&db, "B", "dup@example.com", None).await;
        assert!(err.is_err());
    }
}
