pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod tenant_data_repo;
pub use tenant_data_repo::TenantDataRepository;
