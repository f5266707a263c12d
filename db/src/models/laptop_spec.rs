use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Laptop hardware details. At most one row per asset.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "laptop_specs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub asset_id: i64,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub mac_wlan: Option<String>,
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
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts or replaces the spec row of `asset_id`.
    pub async fn upsert_for_asset(
        db: &DbConn,
        asset_id: i64,
        processor: Option<String>,
        ram: Option<String>,
        mac_wlan: Option<String>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        match Entity::find()
            .filter(Column::AssetId.eq(asset_id))
            .one(db)
            .await?
        {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.processor = Set(processor);
                active.ram = Set(ram);
                active.mac_wlan = Set(mac_wlan);
                active.updated_at = Set(now);
                active.update(db).await
            }
            None => {
                ActiveModel {
                    asset_id: Set(asset_id),
                    processor: Set(processor),
                    ram: Set(ram),
                    mac_wlan: Set(mac_wlan),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        }
    }
}
