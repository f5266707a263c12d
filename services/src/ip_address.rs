use crate::mac_source::{MacSource, derive_mac};
use crate::patch::Patch;
use crate::service::{AppError, Service, ToActiveModel};
use crate::user::UserService;
use chrono::Utc;
use db::models::asset_assignment;
use db::models::ip_address::{ActiveModel, Column, Entity};
use db::models::{asset, intel_nuc_spec, laptop_spec, user};
use db::repository::Repository;
use log::{info, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TryIntoModel,
};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use util::filters::FilterParam;
use util::network::{MAC_FORMAT_MESSAGE, is_valid_ipv4, is_valid_mac, normalize_mac};
use validator::{Validate, ValidationError};

pub use db::models::ip_address::Model as IpAddress;
pub use db::models::ip_address::{Connection, IpRole, IpStatus};

pub const USER_REQUIRED: &str = "User is required";
pub const INVALID_IPV4: &str = "Invalid IPv4 address";
pub const GUEST_MAC_REQUIRED: &str = "MAC WLAN is required for guest devices";
pub const IP_EXISTS: &str = "IP already exists.";

fn validate_ipv4(ip: &str) -> Result<(), ValidationError> {
    if is_valid_ipv4(ip.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("ipv4").with_message(Cow::Borrowed(INVALID_IPV4)))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateIpAddress {
    #[validate(required(message = "User is required"))]
    pub user_id: Option<i64>,

    #[validate(custom(function = "validate_ipv4"))]
    pub ip: String,

    #[validate(required(message = "Connection is required"))]
    pub connection: Option<Connection>,

    #[validate(required(message = "Status is required"))]
    pub status: Option<IpStatus>,

    #[validate(required(message = "Role is required"))]
    pub role: Option<IpRole>,

    /// Only read for `EMPLOYEE` records.
    pub asset_assignment_id: Option<i64>,

    /// Only read for guest records.
    pub mac_wlan: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateIpAddress {
    pub id: i64,
    pub user_id: Option<i64>,

    #[validate(custom(function = "validate_ipv4"))]
    pub ip: Option<String>,

    pub connection: Option<Connection>,
    pub status: Option<IpStatus>,
    pub role: Option<IpRole>,
    pub asset_assignment_id: Patch<i64>,
    pub mac_wlan: Patch<String>,
}

/// The assignment link and MAC a record ends up with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MacBinding {
    asset_assignment_id: Option<i64>,
    mac_wlan: Option<String>,
}

impl MacBinding {
    fn guest(mac: String) -> Self {
        MacBinding {
            asset_assignment_id: None,
            mac_wlan: Some(mac),
        }
    }
}

fn required<T>(value: Option<T>, message: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Normalizes and validates a MAC typed in for a guest device.
fn guest_mac(raw: Option<&str>) -> Result<String, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation(GUEST_MAC_REQUIRED.to_string()))?;

    let mac = normalize_mac(raw);
    if !is_valid_mac(&mac) {
        return Err(AppError::Validation(MAC_FORMAT_MESSAGE.to_string()));
    }
    Ok(mac)
}

/// Links an explicitly chosen assignment. It must belong to `user_id`.
async fn employee_binding(
    db: &DbConn,
    user_id: i64,
    assignment_id: i64,
) -> Result<MacBinding, AppError> {
    let loaded = asset_assignment::Model::find_with_hardware(db, assignment_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Asset assignment ID {} not found", assignment_id))
        })?;

    if !loaded.assignment.belongs_to(user_id) {
        return Err(AppError::Conflict(format!(
            "Asset assignment ID {} does not belong to user ID {}",
            assignment_id, user_id
        )));
    }

    Ok(MacBinding {
        asset_assignment_id: Some(assignment_id),
        mac_wlan: derive_mac(&loaded.hardware).map(|(_, mac)| mac),
    })
}

/// Re-derives the link a record already had.
///
/// A link the effective user no longer owns is dropped together with its MAC.
async fn carried_binding(
    db: &DbConn,
    record_id: i64,
    user_id: i64,
    assignment_id: i64,
) -> Result<MacBinding, AppError> {
    let Some(loaded) = asset_assignment::Model::find_with_hardware(db, assignment_id).await? else {
        return Ok(MacBinding::default());
    };

    if !loaded.assignment.belongs_to(user_id) {
        warn!(
            "IP address {}: asset assignment {} belongs to user {}, not {}; clearing link and MAC",
            record_id, assignment_id, loaded.assignment.user_id, user_id
        );
        return Ok(MacBinding::default());
    }

    Ok(MacBinding {
        asset_assignment_id: Some(assignment_id),
        mac_wlan: derive_mac(&loaded.hardware).map(|(_, mac)| mac),
    })
}

fn map_ip_conflict(err: DbErr) -> AppError {
    let unique = matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed");

    if unique {
        AppError::Conflict(IP_EXISTS.to_string())
    } else {
        AppError::from(err)
    }
}

impl ToActiveModel<Entity> for CreateIpAddress {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let user_id = required(self.user_id, USER_REQUIRED)?;
        let connection = required(self.connection, "Connection is required")?;
        let status = required(self.status, "Status is required")?;
        let role = required(self.role, "Role is required")?;

        let user = UserService::get(db, user_id).await?;

        let binding = if status.is_employee() {
            match self.asset_assignment_id {
                Some(assignment_id) => employee_binding(db, user_id, assignment_id).await?,
                None => MacBinding::default(),
            }
        } else {
            MacBinding::guest(guest_mac(self.mac_wlan.as_deref())?)
        };

        let now = Utc::now();
        Ok(ActiveModel {
            ip: Set(self.ip.trim().to_string()),
            mac_wlan: Set(binding.mac_wlan),
            connection: Set(connection),
            status: Set(status),
            role: Set(role),
            company: Set(user.office_location),
            user_id: Set(user_id),
            asset_assignment_id: Set(binding.asset_assignment_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

impl ToActiveModel<Entity> for UpdateIpAddress {
    async fn into_active_model(self, db: &DbConn) -> Result<ActiveModel, AppError> {
        self.validate()?;

        let current = IpAddressService::get(db, self.id).await?;
        let user_id = self.user_id.unwrap_or(current.user_id);
        let status = self.status.unwrap_or(current.status);

        let company = match self.user_id {
            Some(id) => UserService::get(db, id).await?.office_location,
            None => current.company.clone(),
        };

        let binding = if status.is_employee() {
            match self.asset_assignment_id {
                Patch::Set(assignment_id) => employee_binding(db, user_id, assignment_id).await?,
                Patch::Clear => MacBinding::default(),
                Patch::Unchanged => match current.asset_assignment_id {
                    Some(assignment_id) => {
                        carried_binding(db, current.id, user_id, assignment_id).await?
                    }
                    None => MacBinding::default(),
                },
            }
        } else {
            let mac = match self.mac_wlan {
                Patch::Set(raw) => guest_mac(Some(&raw))?,
                Patch::Clear => return Err(AppError::Validation(GUEST_MAC_REQUIRED.to_string())),
                // the derived MAC of an employee record is not a guest MAC
                Patch::Unchanged if current.status.is_employee() => {
                    return Err(AppError::Validation(GUEST_MAC_REQUIRED.to_string()));
                }
                Patch::Unchanged => guest_mac(current.mac_wlan.as_deref())?,
            };
            MacBinding::guest(mac)
        };

        let mut active: ActiveModel = current.into();

        if let Some(ip) = self.ip {
            active.ip.set_if_not_equals(ip.trim().to_string());
        }
        if let Some(connection) = self.connection {
            active.connection.set_if_not_equals(connection);
        }
        if let Some(role) = self.role {
            active.role.set_if_not_equals(role);
        }

        active.user_id.set_if_not_equals(user_id);
        active.status.set_if_not_equals(status);
        active.company.set_if_not_equals(company);
        active
            .asset_assignment_id
            .set_if_not_equals(binding.asset_assignment_id);
        active.mac_wlan.set_if_not_equals(binding.mac_wlan);

        if active.is_changed() {
            active.updated_at = Set(Utc::now());
        }

        Ok(active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub office_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSummary {
    pub id: i64,
    pub asset_id: i64,
    pub asset_code: String,
    pub asset_name: String,
    pub laptop_mac_wlan: Option<String>,
    pub intel_nuc_mac_wlan: Option<String>,
}

/// An ip record with its user and linked hardware resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpAddressDetail {
    #[serde(flatten)]
    pub record: IpAddress,
    pub user: Option<UserSummary>,
    pub asset_assignment: Option<AssignmentSummary>,
}

/// One entry of the assignment picker for a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentOption {
    pub assignment_id: i64,
    pub asset_id: i64,
    pub label: String,
    /// What an `EMPLOYEE` record linked to this assignment would store.
    pub mac_wlan: Option<String>,
    pub mac_source: Option<MacSource>,
}

pub struct IpAddressService;

impl<'a> Service<'a, Entity, Column, CreateIpAddress, UpdateIpAddress> for IpAddressService {
    // ↓↓↓ OVERRIDE DEFAULT BEHAVIOR IF NEEDED HERE ↓↓↓

    fn create(
        db: &'a DbConn,
        params: CreateIpAddress,
    ) -> Pin<Box<dyn Future<Output = Result<IpAddress, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let active = params.into_active_model(db).await?;
            let record = Repository::<Entity, Column>::create(db, active)
                .await
                .map_err(map_ip_conflict)?;

            info!(
                "IP address {} created for user {} ({})",
                record.ip, record.user_id, record.status
            );
            Ok(record)
        })
    }

    fn update(
        db: &'a DbConn,
        params: UpdateIpAddress,
    ) -> Pin<Box<dyn Future<Output = Result<IpAddress, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let active = params.into_active_model(db).await?;
            if !active.is_changed() {
                return active.try_into_model().map_err(AppError::from);
            }

            let record = Repository::<Entity, Column>::update(db, active)
                .await
                .map_err(map_ip_conflict)?;

            info!("IP address {} (ID {}) updated", record.ip, record.id);
            Ok(record)
        })
    }

    fn delete(
        db: &'a DbConn,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            match Repository::<Entity, Column>::delete_by_id(db, id).await? {
                0 => Err(AppError::NotFound(format!("IP address ID {} not found", id))),
                _ => {
                    info!("IP address ID {} deleted", id);
                    Ok(())
                }
            }
        })
    }
}

impl IpAddressService {
    // ↓↓↓ CUSTOM METHODS CAN BE DEFINED HERE ↓↓↓

    pub async fn get(db: &DbConn, id: i64) -> Result<IpAddress, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("IP address ID {} not found", id)))
    }

    /// Lists records with their user and hardware. Newest first unless
    /// `sort_by` says otherwise.
    pub async fn list(
        db: &DbConn,
        filter_params: &[FilterParam],
        sort_by: Option<&str>,
    ) -> Result<Vec<IpAddressDetail>, AppError> {
        let records = Self::find_all(db, filter_params, sort_by.or(Some("-id"))).await?;
        Self::with_details(db, records).await
    }

    /// One page of [`IpAddressService::list`] plus the total number of
    /// matches. Pages are 1-based.
    pub async fn list_page(
        db: &DbConn,
        filter_params: &[FilterParam],
        page: u64,
        per_page: u64,
        sort_by: Option<&str>,
    ) -> Result<(Vec<IpAddressDetail>, u64), AppError> {
        let (records, total) = Repository::<Entity, Column>::filter(
            db,
            filter_params,
            page,
            per_page,
            sort_by.or(Some("-id")),
        )
        .await?;
        Ok((Self::with_details(db, records).await?, total))
    }

    async fn with_details(
        db: &DbConn,
        records: Vec<IpAddress>,
    ) -> Result<Vec<IpAddressDetail>, AppError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = records.iter().map(|r| r.user_id).collect();
        let users: HashMap<i64, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let assignment_ids: Vec<i64> = records
            .iter()
            .filter_map(|r| r.asset_assignment_id)
            .collect();
        let assignments = Self::assignment_summaries(db, assignment_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| IpAddressDetail {
                user: users.get(&record.user_id).map(|u| UserSummary {
                    id: u.id,
                    name: u.name.clone(),
                    office_location: u.office_location.clone(),
                }),
                asset_assignment: record
                    .asset_assignment_id
                    .and_then(|id| assignments.get(&id).cloned()),
                record,
            })
            .collect())
    }

    async fn assignment_summaries(
        db: &DbConn,
        assignment_ids: Vec<i64>,
    ) -> Result<HashMap<i64, AssignmentSummary>, DbErr> {
        if assignment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let assignments = asset_assignment::Entity::find()
            .filter(asset_assignment::Column::Id.is_in(assignment_ids))
            .all(db)
            .await?;
        let asset_ids: Vec<i64> = assignments.iter().map(|a| a.asset_id).collect();

        let assets: HashMap<i64, asset::Model> = asset::Entity::find()
            .filter(asset::Column::Id.is_in(asset_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let laptop_macs: HashMap<i64, Option<String>> = laptop_spec::Entity::find()
            .filter(laptop_spec::Column::AssetId.is_in(asset_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.asset_id, s.mac_wlan))
            .collect();

        let nuc_macs: HashMap<i64, Option<String>> = intel_nuc_spec::Entity::find()
            .filter(intel_nuc_spec::Column::AssetId.is_in(asset_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.asset_id, s.mac_wlan))
            .collect();

        Ok(assignments
            .into_iter()
            .filter_map(|a| {
                let asset = assets.get(&a.asset_id)?;
                Some((
                    a.id,
                    AssignmentSummary {
                        id: a.id,
                        asset_id: a.asset_id,
                        asset_code: asset.asset_code.clone(),
                        asset_name: asset.name.clone(),
                        laptop_mac_wlan: laptop_macs.get(&a.asset_id).cloned().flatten(),
                        intel_nuc_mac_wlan: nuc_macs.get(&a.asset_id).cloned().flatten(),
                    },
                ))
            })
            .collect())
    }

    /// Re-derives the MAC of every employee record linked to an assignment of
    /// `asset_id`. Called after the asset's hardware specs change.
    pub async fn refresh_derived_macs(db: &DbConn, asset_id: i64) -> Result<u64, AppError> {
        let Some(hardware) = asset::Model::find_with_hardware(db, asset_id).await? else {
            return Ok(0);
        };
        let assignment_ids: Vec<i64> = asset_assignment::Entity::find()
            .filter(asset_assignment::Column::AssetId.eq(asset_id))
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        if assignment_ids.is_empty() {
            return Ok(0);
        }

        let mac = derive_mac(&hardware).map(|(_, mac)| mac);
        let res = Entity::update_many()
            .col_expr(Column::MacWlan, Expr::value(mac))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::AssetAssignmentId.is_in(assignment_ids))
            .filter(Column::Status.eq(IpStatus::Employee))
            .exec(db)
            .await?;

        if res.rows_affected > 0 {
            info!(
                "Refreshed MAC of {} ip record(s) for asset {}",
                res.rows_affected, asset_id
            );
        }
        Ok(res.rows_affected)
    }

    /// The assignments `user_id` can link an `EMPLOYEE` record to, with the
    /// MAC each one would produce.
    pub async fn assignment_options(
        db: &DbConn,
        user_id: i64,
    ) -> Result<Vec<AssignmentOption>, AppError> {
        UserService::get(db, user_id).await?;

        let mut options = Vec::new();
        for assignment in asset_assignment::Model::find_by_user(db, user_id).await? {
            let Some(hardware) = asset::Model::find_with_hardware(db, assignment.asset_id).await?
            else {
                continue;
            };

            let derived = derive_mac(&hardware);
            options.push(AssignmentOption {
                assignment_id: assignment.id,
                asset_id: assignment.asset_id,
                label: hardware.label(),
                mac_source: derived.as_ref().map(|(source, _)| *source),
                mac_wlan: derived.map(|(_, mac)| mac),
            });
        }

        Ok(options)
    }
}
