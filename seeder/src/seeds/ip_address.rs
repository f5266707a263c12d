use crate::seed::{Seeder, host_ip, random_mac};
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use sea_orm::DatabaseConnection;
use services::asset_assignment::AssetAssignmentService;
use services::ip_address::{Connection, CreateIpAddress, IpAddressService, IpRole, IpStatus};
use services::service::{AppError, Service};
use services::user::UserService;
use std::pin::Pin;

pub struct IpAddressSeeder;

impl Seeder for IpAddressSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            let mut rng = StdRng::from_entropy();

            let users = UserService::find_all(db, &[], None).await?;
            let assignments = AssetAssignmentService::find_all(db, &[], Some("id")).await?;

            for (i, assignment) in assignments.iter().enumerate() {
                let Some(ip) = host_ip("10.10", i) else {
                    log::warn!("Out of employee addresses after {} records", i);
                    break;
                };
                let connection = if fastrand::bool() {
                    Connection::Wifi
                } else {
                    Connection::Ethernet
                };
                let role = if fastrand::u8(..4) == 0 {
                    IpRole::FullAccess
                } else {
                    IpRole::List
                };

                IpAddressService::create(
                    db,
                    CreateIpAddress {
                        user_id: Some(assignment.user_id),
                        ip,
                        connection: Some(connection),
                        status: Some(IpStatus::Employee),
                        role: Some(role),
                        asset_assignment_id: Some(assignment.id),
                        mac_wlan: None,
                    },
                )
                .await?;
            }

            for i in 0..8 {
                let (Some(host), Some(ip)) = (users.choose(&mut rng), host_ip("10.20", i)) else {
                    break;
                };
                let status = if fastrand::bool() {
                    IpStatus::GuestLaptop
                } else {
                    IpStatus::GuestPhone
                };

                IpAddressService::create(
                    db,
                    CreateIpAddress {
                        user_id: Some(host.id),
                        ip,
                        connection: Some(Connection::Wifi),
                        status: Some(status),
                        role: Some(IpRole::List),
                        asset_assignment_id: None,
                        mac_wlan: Some(random_mac()),
                    },
                )
                .await?;
            }

            Ok(())
        })
    }
}
