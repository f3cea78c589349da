pub mod catalog;
pub mod product;
pub mod property;
pub mod tenancy;
pub mod tenant_data;
