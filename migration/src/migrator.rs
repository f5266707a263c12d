use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510010001_create_users::Migration),
            Box::new(migrations::m202510010002_create_assets::Migration),
            Box::new(migrations::m202510010003_create_laptop_specs::Migration),
            Box::new(migrations::m202510010004_create_intel_nuc_specs::Migration),
            Box::new(migrations::m202510010005_create_asset_assignments::Migration),
            Box::new(migrations::m202510010006_create_ip_addresses::Migration),
        ]
    }
}
