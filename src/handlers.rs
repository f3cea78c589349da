pub mod catalog;
pub mod products;
pub mod properties;
pub mod tenancy;
