use crate::seed::{Seeder, random_mac};
use sea_orm::DatabaseConnection;
use services::asset::{AssetService, CreateAsset, HardwareSpecInput};
use services::service::AppError;
use std::pin::Pin;

const LAPTOPS: [&str; 4] = ["ThinkPad T14", "Latitude 5420", "EliteBook 840", "MacBook Air"];
const NUCS: [&str; 2] = ["NUC 11 Pro", "NUC 12 Pro"];
const PROCESSORS: [&str; 4] = ["i5-1135G7", "i7-1165G7", "i5-1240P", "Ryzen 5 5600U"];
const RAM: [&str; 3] = ["8GB", "16GB", "32GB"];

fn spec() -> HardwareSpecInput {
    HardwareSpecInput {
        processor: Some(PROCESSORS[fastrand::usize(..PROCESSORS.len())].into()),
        ram: Some(RAM[fastrand::usize(..RAM.len())].into()),
        // some hardware has no WLAN MAC on record
        mac_wlan: (fastrand::u8(..4) != 0).then(random_mac),
    }
}

pub struct AssetSeeder;

impl Seeder for AssetSeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            for i in 1..=10 {
                let params = CreateAsset {
                    asset_code: format!("LPT-{:03}", i),
                    name: LAPTOPS[fastrand::usize(..LAPTOPS.len())].into(),
                };
                AssetService::create_with_hardware(db, params, Some(spec()), None).await?;
            }

            for i in 1..=4 {
                let params = CreateAsset {
                    asset_code: format!("NUC-{:03}", i),
                    name: NUCS[fastrand::usize(..NUCS.len())].into(),
                };
                AssetService::create_with_hardware(db, params, None, Some(spec())).await?;
            }

            Ok(())
        })
    }
}
