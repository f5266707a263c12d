use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical piece of hardware tracked by asset code.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub asset_code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::laptop_spec::Entity")]
    LaptopSpec,

    #[sea_orm(has_one = "super::intel_nuc_spec::Entity")]
    IntelNucSpec,

    #[sea_orm(has_many = "super::asset_assignment::Entity")]
    AssetAssignments,
}

impl Related<super::laptop_spec::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LaptopSpec.def()
    }
}

impl Related<super::intel_nuc_spec::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntelNucSpec.def()
    }
}

impl Related<super::asset_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An asset together with whichever hardware specs are attached to it.
///
/// An asset is expected to have at most one spec type, but nothing in the
/// schema enforces that, so both are loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetHardware {
    pub asset: Model,
    pub laptop: Option<super::laptop_spec::Model>,
    pub intel_nuc: Option<super::intel_nuc_spec::Model>,
}

impl Model {
    pub async fn create(db: &DbConn, asset_code: &str, name: &str) -> Result<Model, DbErr> {
        let now = Utc::now();

        ActiveModel {
            asset_code: Set(asset_code.to_owned()),
            name: Set(name.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Loads the asset and both spec tables in one go.
    pub async fn find_with_hardware(db: &DbConn, id: i64) -> Result<Option<AssetHardware>, DbErr> {
        let Some(asset) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let laptop = asset.find_related(super::laptop_spec::Entity).one(db).await?;
        let intel_nuc = asset.find_related(super::intel_nuc_spec::Entity).one(db).await?;

        Ok(Some(AssetHardware {
            asset,
            laptop,
            intel_nuc,
        }))
    }
}

impl AssetHardware {
    /// A label suitable for select boxes, e.g. `LPT-001 · ThinkPad T14`.
    pub fn label(&self) -> String {
        format!("{} · {}", self.asset.asset_code, self.asset.name)
    }
}
