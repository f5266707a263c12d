pub mod asset;
pub mod asset_assignment;
pub mod ip_address;
pub mod mac_source;
pub mod patch;
pub mod service;
pub mod user;
