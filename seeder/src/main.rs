use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    asset::AssetSeeder, asset_assignment::AssetAssignmentSeeder, ip_address::IpAddressSeeder,
    user::UserSeeder,
};
use migration::runner::run_pending_migrations;
use std::env;
use util::config::{self, AppConfig};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    // optional database path overrides DATABASE_PATH
    if let Some(path) = env::args().nth(1) {
        AppConfig::set_database_path(path);
    }

    common::logger::init_logger(
        &config::log_level(),
        &config::log_file(),
        config::log_to_stdout(),
    );

    if config::is_production() {
        eprintln!("Refusing to seed a production database");
        std::process::exit(1);
    }

    log::info!(
        "Seeding {} ({}) at {}",
        config::project_name(),
        config::app_env(),
        config::database_path()
    );

    let db = match db::connect().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("DB connection failed: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_pending_migrations(&db).await {
        eprintln!("Migration failed: {}", err);
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(AssetSeeder), "Asset"),
        (Box::new(AssetAssignmentSeeder), "AssetAssignment"),
        (Box::new(IpAddressSeeder), "IpAddress"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
