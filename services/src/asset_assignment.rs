use crate::asset::AssetService;
use crate::service::{AppError, Service, ToActiveModel};
use crate::user::UserService;
use chrono::Utc;
use db::models::asset_assignment::{ActiveModel, Column, Entity};
use db::models::ip_address;
use db::repository::Repository;
use log::{info, warn};
use sea_orm::{ActiveModelTrait, DbConn, EntityTrait, Set, TransactionTrait, TryIntoModel};
use std::future::Future;
use std::pin::Pin;
use util::filters::FilterParam;

pub use db::models::asset_assignment::Model as AssetAssignment;

#[derive(Debug, Clone)]
pub struct CreateAssetAssignment {
    pub asset_id: i64,
    pub user_id: i64,
}

/// Hands an existing assignment over to another user.
#[derive(Debug, Clone)]
pub struct UpdateAssetAssignment {
    pub id: i64,
    pub user_id: i64,
}

impl ToActiveModel<Entity> for CreateAssetAssignment {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        AssetService::get(db, self.asset_id).await?;
        UserService::get(db, self.user_id).await?;

        let now = Utc::now();
        Ok(ActiveModel {
            asset_id: Set(self.asset_id),
            user_id: Set(self.user_id),
            assigned_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

impl ToActiveModel<Entity> for UpdateAssetAssignment {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        let assignment = AssetAssignmentService::get(db, self.id).await?;
        UserService::get(db, self.user_id).await?;

        let reassigned = assignment.user_id != self.user_id;
        let mut active: ActiveModel = assignment.into();
        if reassigned {
            let now = Utc::now();
            active.user_id = Set(self.user_id);
            active.assigned_at = Set(now);
            active.updated_at = Set(now);
        }

        Ok(active)
    }
}

pub struct AssetAssignmentService;

impl<'a> Service<'a, Entity, Column, CreateAssetAssignment, UpdateAssetAssignment>
    for AssetAssignmentService
{
    // ↓↓↓ OVERRIDE DEFAULT BEHAVIOR IF NEEDED HERE ↓↓↓

    /// Reassigns the asset. Employee ip records of other users lose their
    /// link to it and the MAC derived from it.
    fn update(
        db: &'a DbConn,
        params: UpdateAssetAssignment,
    ) -> Pin<Box<dyn Future<Output = Result<AssetAssignment, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let (id, user_id) = (params.id, params.user_id);
            let active = params.into_active_model(db).await?;
            if !active.is_changed() {
                return active.try_into_model().map_err(AppError::from);
            }

            let txn = db.begin().await?;
            let assignment = active.update(&txn).await?;
            let detached =
                ip_address::Model::detach_assignments(&txn, vec![id], Some(user_id)).await?;
            txn.commit().await?;

            if detached > 0 {
                warn!(
                    "Asset assignment {} moved to user {}; cleared link and MAC on {} ip record(s)",
                    id, user_id, detached
                );
            }
            info!("Asset assignment {} reassigned to user {}", id, user_id);
            Ok(assignment)
        })
    }

    /// Hard delete. Employee ip records linked to the assignment keep their
    /// status but lose the link and the MAC.
    fn delete(
        db: &'a DbConn,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            let txn = db.begin().await?;
            let detached = ip_address::Model::detach_assignments(&txn, vec![id], None).await?;

            if Entity::delete_by_id(id).exec(&txn).await?.rows_affected == 0 {
                return Err(AppError::NotFound(format!(
                    "Asset assignment ID {} not found",
                    id
                )));
            }
            txn.commit().await?;

            info!(
                "Asset assignment {} deleted; cleared {} ip record(s)",
                id, detached
            );
            Ok(())
        })
    }
}

impl AssetAssignmentService {
    // ↓↓↓ CUSTOM METHODS CAN BE DEFINED HERE ↓↓↓

    pub async fn get(db: &DbConn, id: i64) -> Result<AssetAssignment, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset assignment ID {} not found", id)))
    }

    pub async fn for_user(db: &DbConn, user_id: i64) -> Result<Vec<AssetAssignment>, AppError> {
        Repository::<Entity, Column>::find_all(
            db,
            &[FilterParam::eq("user_id", user_id)],
            Some("assigned_at"),
        )
        .await
        .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{CreateAsset, HardwareSpecInput};
    use crate::ip_address::{
        Connection, CreateIpAddress, IpAddress, IpAddressService, IpRole, IpStatus,
    };
    use crate::user::CreateUser;
    use db::test_utils::setup_test_db;

    const LAPTOP_MAC: &str = "11:22:33:44:55:66";

    async fn user(db: &DbConn, email: &str) -> i64 {
        UserService::create(
            db,
            CreateUser {
                name: email.into(),
                email: email.into(),
                office_location: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn asset(db: &DbConn, code: &str) -> i64 {
        AssetService::create(
            db,
            CreateAsset {
                asset_code: code.into(),
                name: code.into(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_requires_existing_user_and_asset() {
        let db = setup_test_db().await;
        let asset_id = asset(&db, "LPT-1").await;

        let err = AssetAssignmentService::create(
            &db,
            CreateAssetAssignment {
                asset_id,
                user_id: 99,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User ID 99 not found"));
    }

    #[tokio::test]
    async fn reassign_moves_assignment_between_users() {
        let db = setup_test_db().await;
        let first = user(&db, "first@example.com").await;
        let second = user(&db, "second@example.com").await;
        let asset_id = asset(&db, "LPT-2").await;

        let assignment = AssetAssignmentService::create(
            &db,
            CreateAssetAssignment {
                asset_id,
                user_id: first,
            },
        )
        .await
        .unwrap();

        AssetAssignmentService::update(
            &db,
            UpdateAssetAssignment {
                id: assignment.id,
                user_id: second,
            },
        )
        .await
        .unwrap();

        assert!(AssetAssignmentService::for_user(&db, first).await.unwrap().is_empty());
        let moved = AssetAssignmentService::for_user(&db, second).await.unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, assignment.id);
    }

    /// An employee record of `user_id` linked to a fresh laptop assignment.
    async fn linked_record(db: &DbConn, user_id: i64) -> (AssetAssignment, IpAddress) {
        let asset_id = asset(db, "LPT-3").await;
        AssetService::set_laptop_spec(
            db,
            asset_id,
            HardwareSpecInput {
                mac_wlan: Some(LAPTOP_MAC.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let assignment =
            AssetAssignmentService::create(db, CreateAssetAssignment { asset_id, user_id })
                .await
                .unwrap();

        let record = IpAddressService::create(
            db,
            CreateIpAddress {
                user_id: Some(user_id),
                ip: "10.0.9.1".into(),
                connection: Some(Connection::Wifi),
                status: Some(IpStatus::Employee),
                role: Some(IpRole::List),
                asset_assignment_id: Some(assignment.id),
                mac_wlan: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(record.mac_wlan.as_deref(), Some(LAPTOP_MAC));

        (assignment, record)
    }

    #[tokio::test]
    async fn delete_clears_link_and_mac_of_employee_records() {
        let db = setup_test_db().await;
        let owner = user(&db, "owner@example.com").await;
        let (assignment, record) = linked_record(&db, owner).await;

        AssetAssignmentService::delete(&db, assignment.id).await.unwrap();

        let stored = IpAddressService::get(&db, record.id).await.unwrap();
        assert_eq!(stored.status, IpStatus::Employee);
        assert_eq!(stored.asset_assignment_id, None);
        assert_eq!(stored.mac_wlan, None);
        assert!(UserService::get(&db, owner).await.is_ok());

        let err = AssetAssignmentService::delete(&db, assignment.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn reassign_detaches_previous_owners_records() {
        let db = setup_test_db().await;
        let previous = user(&db, "previous@example.com").await;
        let next = user(&db, "next@example.com").await;
        let (assignment, record) = linked_record(&db, previous).await;

        let moved = AssetAssignmentService::update(
            &db,
            UpdateAssetAssignment {
                id: assignment.id,
                user_id: next,
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.user_id, next);

        let stored = IpAddressService::get(&db, record.id).await.unwrap();
        assert_eq!(stored.user_id, previous);
        assert_eq!(stored.asset_assignment_id, None);
        assert_eq!(stored.mac_wlan, None);
    }

    #[tokio::test]
    async fn reassign_to_same_user_keeps_records() {
        let db = setup_test_db().await;
        let owner = user(&db, "same@example.com").await;
        let (assignment, record) = linked_record(&db, owner).await;

        let unchanged = AssetAssignmentService::update(
            &db,
            UpdateAssetAssignment {
                id: assignment.id,
                user_id: owner,
            },
        )
        .await
        .unwrap();
        assert_eq!(unchanged, assignment);
        assert_eq!(IpAddressService::get(&db, record.id).await.unwrap(), record);
    }
}
