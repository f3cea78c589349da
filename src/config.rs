// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, ProductRepository, PropertyRepository, TenantDataRepository,
        TenantRepository,
    },
    services::{
        catalog_service::CatalogService, product_service::ProductService,
        property_service::PropertyService, tenancy_service::TenancyService,
        tenant_data_service::TenantDataService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    /// Com tenancy desativada, todo o catálogo vive no escopo único NULL.
    pub tenancy_enabled: bool,
    pub tenancy_service: TenancyService,
    pub catalog_service: CatalogService,
    pub product_service: ProductService,
    pub property_service: PropertyService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let tenancy_enabled = env::var("MULTI_TENANT")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let tenant_data_repo = TenantDataRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());

        let tenant_data = TenantDataService::new(tenant_data_repo);
        let tenancy_service = TenancyService::new(tenant_repo.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(
            catalog_repo,
            tenant_repo,
            tenant_data.clone(),
            db_pool.clone(),
            tenancy_enabled,
        );
        let product_service = ProductService::new(
            product_repo,
            tenant_data,
            catalog_service.clone(),
            db_pool.clone(),
        );
        let property_service = PropertyService::new(property_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            tenancy_enabled,
            tenancy_service,
            catalog_service,
            product_service,
            property_service,
        })
    }
}
