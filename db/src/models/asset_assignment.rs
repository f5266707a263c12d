use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::asset::{self, AssetHardware};

/// Links an asset to the user currently holding it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub asset_id: i64,
    pub user_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::Id",
        on_delete = "Cascade"
    )]
    Asset,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::ip_address::Entity")]
    IpAddresses,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ip_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IpAddresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An assignment with its asset and hardware specs resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentWithHardware {
    pub assignment: Model,
    pub hardware: AssetHardware,
}

impl Model {
    pub async fn create(db: &DbConn, asset_id: i64, user_id: i64) -> Result<Model, DbErr> {
        let now = Utc::now();

        ActiveModel {
            asset_id: Set(asset_id),
            user_id: Set(user_id),
            assigned_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Loads the assignment and the hardware behind it.
    ///
    /// Returns `None` when the assignment does not exist. A dangling asset id
    /// is reported as `RecordNotFound`.
    pub async fn find_with_hardware(
        db: &DbConn,
        id: i64,
    ) -> Result<Option<AssignmentWithHardware>, DbErr> {
        let Some(assignment) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let hardware = asset::Model::find_with_hardware(db, assignment.asset_id)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "Asset {} of assignment {} not found",
                    assignment.asset_id, assignment.id
                ))
            })?;

        Ok(Some(AssignmentWithHardware {
            assignment,
            hardware,
        }))
    }

    pub async fn find_by_user(db: &DbConn, user_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .all(db)
            .await
    }

    pub fn belongs_to(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{intel_nuc_spec, laptop_spec, user};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn find_with_hardware_loads_both_spec_tables() {
        let db = setup_test_db().await;
        let owner = user::Model::create(&db, "Budi", "budi@example.com", None).await.unwrap();
        let asset = asset::Model::create(&db, "LPT-001", "ThinkPad T14").await.unwrap();
        let laptop_mac = Some("AA:AA:AA:AA:AA:AA".to_string());
        laptop_spec::Model::upsert_for_asset(&db, asset.id, None, None, laptop_mac)
            .await
            .unwrap();
        let nuc_mac = Some("BB:BB:BB:BB:BB:BB".to_string());
        intel_nuc_spec::Model::upsert_for_asset(&db, asset.id, None, None, nuc_mac)
            .await
            .unwrap();
        let assignment = Model::create(&db, asset.id, owner.id).await.unwrap();

        let loaded = Model::find_with_hardware(&db, assignment.id)
            .await
            .unwrap()
            .expect("assignment exists");

        assert!(loaded.assignment.belongs_to(owner.id));
        assert_eq!(loaded.hardware.asset.asset_code, "LPT-001");
        assert_eq!(
            loaded.hardware.laptop.and_then(|l| l.mac_wlan).as_deref(),
            Some("AA:AA:AA:AA:AA:AA")
        );
        assert_eq!(
            loaded.hardware.intel_nuc.and_then(|n| n.mac_wlan).as_deref(),
            Some("BB:BB:BB:BB:BB:BB")
        );
    }

    #[tokio::test]
    async fn find_with_hardware_missing_assignment_is_none() {
        let db = setup_test_db().await;
        assert!(Model::find_with_hardware(&db, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_spec() {
        let db = setup_test_db().await;
        let asset = asset::Model::create(&db, "NUC-001", "NUC 11").await.unwrap();

        let first =
            intel_nuc_spec::Model::upsert_for_asset(&db, asset.id, Some("i5".into()), None, None)
                .await
                .unwrap();
        let second = intel_nuc_spec::Model::upsert_for_asset(
            &db,
            asset.id,
            Some("i7".into()),
            Some("16GB".into()),
            Some("CC:CC:CC:CC:CC:CC".into()),
        )
        .await
        .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.processor.as_deref(), Some("i7"));
        assert_eq!(second.mac_wlan.as_deref(), Some("CC:CC:CC:CC:CC:CC"));
    }
}
