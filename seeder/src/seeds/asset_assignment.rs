use crate::seed::Seeder;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use sea_orm::DatabaseConnection;
use services::asset::AssetService;
use services::asset_assignment::{AssetAssignmentService, CreateAssetAssignment};
use services::service::{AppError, Service};
use services::user::UserService;
use std::pin::Pin;

pub struct AssetAssignmentSeeder;

impl Seeder for AssetAssignmentSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            let mut rng = StdRng::from_entropy();

            let users = UserService::find_all(db, &[], None).await?;
            let assets = AssetService::find_all(db, &[], None).await?;

            if users.is_empty() {
                return Err(AppError::NotFound("No users to assign assets to".into()));
            }

            for asset in assets {
                // leave a few assets in storage
                if fastrand::u8(..10) == 0 {
                    continue;
                }

                let Some(user) = users.choose(&mut rng) else {
                    continue;
                };
                AssetAssignmentService::create(
                    db,
                    CreateAssetAssignment {
                        asset_id: asset.id,
                        user_id: user.id,
                    },
                )
                .await?;
            }

            Ok(())
        })
    }
}
