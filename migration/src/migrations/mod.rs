pub mod m202510010001_create_users;
pub mod m202510010002_create_assets;
pub mod m202510010003_create_laptop_specs;
pub mod m202510010004_create_intel_nuc_specs;
pub mod m202510010005_create_asset_assignments;
pub mod m202510010006_create_ip_addresses;
