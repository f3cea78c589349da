pub mod catalog_service;
pub mod constraint;
pub mod product_service;
pub mod property_service;
pub mod tenancy_service;
pub mod tenant_data_service;
