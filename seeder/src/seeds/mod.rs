pub mod asset;
pub mod asset_assignment;
pub mod ip_address;
pub mod user;
