use crate::ip_address::IpAddressService;
use crate::service::{AppError, Service, ToActiveModel};
use chrono::Utc;
use db::models::asset::{ActiveModel, AssetHardware, Column, Entity};
use db::models::{asset, asset_assignment, intel_nuc_spec, ip_address, laptop_spec};
use log::info;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, Set, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use util::network::{MAC_FORMAT_MESSAGE, is_valid_mac, normalize_mac};
use validator::Validate;

pub use db::models::asset::Model as Asset;

#[derive(Debug, Clone, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, message = "Asset code cannot be empty"))]
    pub asset_code: String,

    #[validate(length(min = 1, message = "Asset name cannot be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateAsset {
    pub id: i64,

    #[validate(length(min = 1, message = "Asset code cannot be empty"))]
    pub asset_code: Option<String>,

    #[validate(length(min = 1, message = "Asset name cannot be empty"))]
    pub name: Option<String>,
}

/// Laptop or Intel NUC attributes attached to an asset.
#[derive(Debug, Clone, Default)]
pub struct HardwareSpecInput {
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub mac_wlan: Option<String>,
}

impl HardwareSpecInput {
    /// Normalizes the MAC; blank means the hardware has no WLAN MAC on record.
    fn normalized_mac(&self) -> Result<Option<String>, AppError> {
        let Some(raw) = self.mac_wlan.as_deref().filter(|m| !m.trim().is_empty()) else {
            return Ok(None);
        };

        let mac = normalize_mac(raw);
        if !is_valid_mac(&mac) {
            return Err(AppError::Validation(MAC_FORMAT_MESSAGE.to_string()));
        }
        Ok(Some(mac))
    }
}

impl ToActiveModel<Entity> for CreateAsset {
    async fn into_active_model(self, _db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let now = Utc::now();
        Ok(ActiveModel {
            asset_code: Set(self.asset_code.trim().to_uppercase()),
            name: Set(self.name.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

impl ToActiveModel<Entity> for UpdateAsset {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let asset = AssetService::get(db, self.id).await?;
        let mut active: ActiveModel = asset.into();

        if let Some(code) = self.asset_code {
            active.asset_code.set_if_not_equals(code.trim().to_uppercase());
        }

        if let Some(name) = self.name {
            active.name.set_if_not_equals(name.trim().to_string());
        }

        active.updated_at = Set(Utc::now());

        Ok(active)
    }
}

pub struct AssetService;

impl<'a> Service<'a, Entity, Column, CreateAsset, UpdateAsset> for AssetService {
    // ↓↓↓ OVERRIDE DEFAULT BEHAVIOR IF NEEDED HERE ↓↓↓

    /// Hard delete. Specs and assignments cascade; employee ip records linked
    /// to those assignments lose the link and the MAC first.
    fn delete(
        db: &'a DbConn,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            let txn = db.begin().await?;

            let assignment_ids: Vec<i64> = asset_assignment::Entity::find()
                .filter(asset_assignment::Column::AssetId.eq(id))
                .all(&txn)
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect();
            let detached =
                ip_address::Model::detach_assignments(&txn, assignment_ids, None).await?;

            if Entity::delete_by_id(id).exec(&txn).await?.rows_affected == 0 {
                return Err(AppError::NotFound(format!("Asset ID {} not found", id)));
            }
            txn.commit().await?;

            info!("Asset {} deleted; cleared {} ip record(s)", id, detached);
            Ok(())
        })
    }
}

impl AssetService {
    // ↓↓↓ CUSTOM METHODS CAN BE DEFINED HERE ↓↓↓

    pub async fn get(db: &DbConn, id: i64) -> Result<Asset, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset ID {} not found", id)))
    }

    pub async fn get_with_hardware(db: &DbConn, id: i64) -> Result<AssetHardware, AppError> {
        asset::Model::find_with_hardware(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset ID {} not found", id)))
    }

    /// Creates an asset together with its specs.
    ///
    /// Every input is validated before the first insert.
    pub async fn create_with_hardware(
        db: &DbConn,
        params: CreateAsset,
        laptop: Option<HardwareSpecInput>,
        intel_nuc: Option<HardwareSpecInput>,
    ) -> Result<AssetHardware, AppError> {
        if let Some(spec) = &laptop {
            spec.normalized_mac()?;
        }
        if let Some(spec) = &intel_nuc {
            spec.normalized_mac()?;
        }

        let asset = Self::create(db, params).await?;
        if let Some(spec) = laptop {
            Self::set_laptop_spec(db, asset.id, spec).await?;
        }
        if let Some(spec) = intel_nuc {
            Self::set_intel_nuc_spec(db, asset.id, spec).await?;
        }

        Self::get_with_hardware(db, asset.id).await
    }

    pub async fn set_laptop_spec(
        db: &DbConn,
        asset_id: i64,
        spec: HardwareSpecInput,
    ) -> Result<laptop_spec::Model, AppError> {
        let mac = spec.normalized_mac()?;
        Self::get(db, asset_id).await?;

        let saved =
            laptop_spec::Model::upsert_for_asset(db, asset_id, spec.processor, spec.ram, mac)
                .await?;
        info!("Laptop spec saved for asset {}", asset_id);

        IpAddressService::refresh_derived_macs(db, asset_id).await?;
        Ok(saved)
    }

    pub async fn set_intel_nuc_spec(
        db: &DbConn,
        asset_id: i64,
        spec: HardwareSpecInput,
    ) -> Result<intel_nuc_spec::Model, AppError> {
        let mac = spec.normalized_mac()?;
        Self::get(db, asset_id).await?;

        let saved =
            intel_nuc_spec::Model::upsert_for_asset(db, asset_id, spec.processor, spec.ram, mac)
                .await?;
        info!("Intel NUC spec saved for asset {}", asset_id);

        IpAddressService::refresh_derived_macs(db, asset_id).await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_assignment::{AssetAssignmentService, CreateAssetAssignment};
    use crate::ip_address::{Connection, CreateIpAddress, IpRole, IpStatus};
    use db::models::user;
    use db::test_utils::setup_test_db;

    fn laptop(mac: &str) -> HardwareSpecInput {
        HardwareSpecInput {
            processor: Some("i7-1165G7".into()),
            ram: Some("16GB".into()),
            mac_wlan: Some(mac.into()),
        }
    }

    #[tokio::test]
    async fn create_with_hardware_normalizes_spec_mac() {
        let db = setup_test_db().await;

        let hw = AssetService::create_with_hardware(
            &db,
            CreateAsset {
                asset_code: "lpt-010".into(),
                name: "Latitude 5420".into(),
            },
            Some(laptop("a1-b2-c3-d4-e5-f6")),
            None,
        )
        .await
        .unwrap();

        assert_eq!(hw.asset.asset_code, "LPT-010");
        assert_eq!(
            hw.laptop.unwrap().mac_wlan.as_deref(),
            Some("A1:B2:C3:D4:E5:F6")
        );
        assert!(hw.intel_nuc.is_none());
    }

    #[tokio::test]
    async fn invalid_spec_mac_aborts_before_insert() {
        let db = setup_test_db().await;

        let err = AssetService::create_with_hardware(
            &db,
            CreateAsset {
                asset_code: "LPT-011".into(),
                name: "Latitude".into(),
            },
            Some(laptop("a1:b2:c3")),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == MAC_FORMAT_MESSAGE));
        assert_eq!(AssetService::count(&db, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn spec_for_missing_asset_is_not_found() {
        let db = setup_test_db().await;
        let err = AssetService::set_intel_nuc_spec(&db, 5, HardwareSpecInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    /// An asset with a laptop spec, assigned to a new user, plus one
    /// employee record linked to that assignment.
    async fn linked_asset(db: &DbConn) -> (i64, i64) {
        let owner = user::Model::create(db, "Sari", "sari@example.com", Some("Bandung"))
            .await
            .unwrap();
        let hw = AssetService::create_with_hardware(
            db,
            CreateAsset {
                asset_code: "LPT-020".into(),
                name: "ThinkPad X1".into(),
            },
            Some(laptop("a1:b2:c3:d4:e5:f6")),
            None,
        )
        .await
        .unwrap();
        let assignment = AssetAssignmentService::create(
            db,
            CreateAssetAssignment {
                asset_id: hw.asset.id,
                user_id: owner.id,
            },
        )
        .await
        .unwrap();

        let record = IpAddressService::create(
            db,
            CreateIpAddress {
                user_id: Some(owner.id),
                ip: "10.0.5.1".into(),
                connection: Some(Connection::Ethernet),
                status: Some(IpStatus::Employee),
                role: Some(IpRole::FullAccess),
                asset_assignment_id: Some(assignment.id),
                mac_wlan: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(record.mac_wlan.as_deref(), Some("A1:B2:C3:D4:E5:F6"));

        (hw.asset.id, record.id)
    }

    #[tokio::test]
    async fn spec_change_refreshes_linked_record_mac() {
        let db = setup_test_db().await;
        let (asset_id, record_id) = linked_asset(&db).await;

        AssetService::set_laptop_spec(&db, asset_id, laptop("0a0b0c0d0e0f"))
            .await
            .unwrap();
        let record = IpAddressService::get(&db, record_id).await.unwrap();
        assert_eq!(record.mac_wlan.as_deref(), Some("0A:0B:0C:0D:0E:0F"));

        AssetService::set_laptop_spec(&db, asset_id, HardwareSpecInput::default())
            .await
            .unwrap();
        let record = IpAddressService::get(&db, record_id).await.unwrap();
        assert_eq!(record.mac_wlan, None);
        assert!(record.asset_assignment_id.is_some());
    }

    #[tokio::test]
    async fn delete_detaches_records_of_its_assignments() {
        let db = setup_test_db().await;
        let (asset_id, record_id) = linked_asset(&db).await;

        AssetService::delete(&db, asset_id).await.unwrap();

        let record = IpAddressService::get(&db, record_id).await.unwrap();
        assert_eq!(record.asset_assignment_id, None);
        assert_eq!(record.mac_wlan, None);
        assert_eq!(AssetAssignmentService::count(&db, &[]).await.unwrap(), 0);

        let err = AssetService::delete(&db, asset_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
