pub mod asset;
pub mod asset_assignment;
pub mod intel_nuc_spec;
pub mod ip_address;
pub mod laptop_spec;
pub mod user;

pub use asset::Entity as Asset;
pub use asset_assignment::Entity as AssetAssignment;
pub use intel_nuc_spec::Entity as IntelNucSpec;
pub use ip_address::Entity as IpAddress;
pub use laptop_spec::Entity as LaptopSpec;
pub use user::Entity as User;
