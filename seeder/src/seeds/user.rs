use crate::seed::Seeder;
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use sea_orm::DatabaseConnection;
use services::service::{AppError, Service};
use services::user::{CreateUser, UserService};
use std::pin::Pin;

pub const OFFICES: [&str; 4] = ["Jakarta HQ", "Bandung", "Surabaya", "Medan"];

pub struct UserSeeder;

impl Seeder for UserSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            // Fixed IT admin
            let _ = UserService::create(
                db,
                CreateUser {
                    name: "IT Support".into(),
                    email: "it@example.com".into(),
                    office_location: Some(OFFICES[0].into()),
                },
            )
            .await;

            for _ in 0..12 {
                let name: String = Name().fake();
                let email: String = SafeEmail().fake();
                let office = OFFICES[fastrand::usize(..OFFICES.len())];

                // random emails may repeat
                let _ = UserService::create(
                    db,
                    CreateUser {
                        name,
                        email,
                        office_location: Some(office.into()),
                    },
                )
                .await;
            }

            Ok(())
        })
    }
}
