use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An IP address handed out on the office network.
///
/// Guest records carry their own `mac_wlan`; employee records copy it from the
/// hardware behind `asset_assignment_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ip_addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Dotted quad, unique across the table.
    #[sea_orm(unique)]
    pub ip: String,
    /// `XX:XX:XX:XX:XX:XX`, uppercase.
    pub mac_wlan: Option<String>,
    pub connection: Connection,
    pub status: IpStatus,
    pub role: IpRole,
    /// Office location of the owning user at the time of the last write.
    pub company: Option<String>,
    pub user_id: i64,
    pub asset_assignment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ip_connection")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Connection {
    #[sea_orm(string_value = "WIFI")]
    Wifi,
    #[sea_orm(string_value = "ETHERNET")]
    Ethernet,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ip_status")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum IpStatus {
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
    #[sea_orm(string_value = "GUEST_LAPTOP")]
    GuestLaptop,
    #[sea_orm(string_value = "GUEST_PHONE")]
    GuestPhone,
}

impl IpStatus {
    /// Employee records derive their MAC from assigned hardware.
    pub fn is_employee(self) -> bool {
        self == IpStatus::Employee
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ip_role")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum IpRole {
    #[sea_orm(string_value = "LIST")]
    List,
    #[sea_orm(string_value = "FULL_ACCESS")]
    FullAccess,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::asset_assignment::Entity",
        from = "Column::AssetAssignmentId",
        to = "super::asset_assignment::Column::Id",
        on_delete = "SetNull"
    )]
    AssetAssignment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::asset_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Drops the assignment link and the derived MAC of every employee record
    /// pointing at one of `assignment_ids`. Records of `keep_user` are left alone.
    ///
    /// Returns the number of records touched.
    pub async fn detach_assignments<C: ConnectionTrait>(
        db: &C,
        assignment_ids: Vec<i64>,
        keep_user: Option<i64>,
    ) -> Result<u64, DbErr> {
        if assignment_ids.is_empty() {
            return Ok(0);
        }

        let mut query = Entity::update_many()
            .col_expr(Column::AssetAssignmentId, Expr::value(Option::<i64>::None))
            .col_expr(Column::MacWlan, Expr::value(Option::<String>::None))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::AssetAssignmentId.is_in(assignment_ids))
            .filter(Column::Status.eq(IpStatus::Employee));

        if let Some(user_id) = keep_user {
            query = query.filter(Column::UserId.ne(user_id));
        }

        Ok(query.exec(db).await?.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::Set;
    use std::str::FromStr;

    #[test]
    fn enums_parse_case_insensitively_and_display_uppercase() {
        assert_eq!(IpStatus::from_str("guest_laptop").unwrap(), IpStatus::GuestLaptop);
        assert_eq!(Connection::from_str("Wifi").unwrap(), Connection::Wifi);
        assert_eq!(IpRole::FullAccess.to_string(), "FULL_ACCESS");
        assert!(IpStatus::from_str("contractor").is_err());
    }

    #[test]
    fn enums_serialize_as_screaming_snake_case() {
        let json = serde_json::to_string(&IpStatus::GuestPhone).unwrap();
        assert_eq!(json, "\"GUEST_PHONE\"");
        assert!(IpStatus::Employee.is_employee());
        assert!(!IpStatus::GuestPhone.is_employee());
    }

    async fn insert_record(
        db: &DbConn,
        ip: &str,
        status: IpStatus,
        user_id: i64,
        assignment_id: Option<i64>,
        mac: &str,
    ) -> Model {
        let now = Utc::now();
        ActiveModel {
            ip: Set(ip.into()),
            mac_wlan: Set(Some(mac.into())),
            connection: Set(Connection::Wifi),
            status: Set(status),
            role: Set(IpRole::List),
            company: Set(None),
            user_id: Set(user_id),
            asset_assignment_id: Set(assignment_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn detach_assignments_clears_link_and_mac_except_kept_user() {
        use crate::models::{asset, asset_assignment, user};
        use crate::test_utils::setup_test_db;

        let db = setup_test_db().await;
        let old_owner = user::Model::create(&db, "Old", "old@example.com", None).await.unwrap();
        let new_owner = user::Model::create(&db, "New", "new@example.com", None).await.unwrap();
        let laptop = asset::Model::create(&db, "LPT-009", "ThinkPad X1").await.unwrap();
        let assignment = asset_assignment::Model::create(&db, laptop.id, new_owner.id)
            .await
            .unwrap();

        let stale = insert_record(
            &db,
            "10.9.0.1",
            IpStatus::Employee,
            old_owner.id,
            Some(assignment.id),
            "11:11:11:11:11:11",
        )
        .await;
        let current = insert_record(
            &db,
            "10.9.0.2",
            IpStatus::Employee,
            new_owner.id,
            Some(assignment.id),
            "11:11:11:11:11:11",
        )
        .await;
        let guest = insert_record(
            &db,
            "10.9.0.3",
            IpStatus::GuestPhone,
            old_owner.id,
            None,
            "22:22:22:22:22:22",
        )
        .await;

        let touched = Model::detach_assignments(&db, vec![assignment.id], Some(new_owner.id))
            .await
            .unwrap();
        assert_eq!(touched, 1);

        let stale = Entity::find_by_id(stale.id).one(&db).await.unwrap().unwrap();
        assert_eq!(stale.asset_assignment_id, None);
        assert_eq!(stale.mac_wlan, None);
        assert_eq!(stale.status, IpStatus::Employee);

        let current_after = Entity::find_by_id(current.id).one(&db).await.unwrap().unwrap();
        assert_eq!(current_after.asset_assignment_id, Some(assignment.id));
        assert_eq!(current_after.mac_wlan, current.mac_wlan);

        let guest_after = Entity::find_by_id(guest.id).one(&db).await.unwrap().unwrap();
        assert_eq!(guest_after, guest);

        assert_eq!(Model::detach_assignments(&db, vec![], None).await.unwrap(), 0);
    }
}
