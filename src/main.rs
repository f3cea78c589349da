//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let tenancy_routes = Router::new().route(
        "/",
        post(handlers::tenancy::create_tenant).get(handlers::tenancy::list_tenants),
    );

    let catalog_routes = Router::new()
        .route(
            "/categories",
            post(handlers::catalog::create_category).get(handlers::catalog::list_categories),
        )
        .route(
            "/product-types",
            post(handlers::catalog::create_product_type)
                .get(handlers::catalog::list_product_types),
        )
        .route(
            "/product-types/{id}",
            get(handlers::catalog::get_product_type)
                .patch(handlers::catalog::update_product_type)
                .delete(handlers::catalog::delete_product_type),
        )
        .route(
            "/tax-classes",
            post(handlers::catalog::create_tax_class).get(handlers::catalog::list_tax_classes),
        )
        .route(
            "/tax-classes/{id}",
            get(handlers::catalog::get_tax_class)
                .patch(handlers::catalog::update_tax_class)
                .delete(handlers::catalog::delete_tax_class),
        )
        .route(
            "/measure-units",
            post(handlers::catalog::create_measure_unit)
                .get(handlers::catalog::list_measure_units),
        )
        .route(
            "/measure-units/{id}",
            get(handlers::catalog::get_measure_unit)
                .patch(handlers::catalog::update_measure_unit)
                .delete(handlers::catalog::delete_measure_unit),
        )
        .route(
            "/price-lists",
            post(handlers::catalog::create_price_list).get(handlers::catalog::list_price_lists),
        )
        .route(
            "/price-lists/{id}",
            get(handlers::catalog::get_price_list)
                .patch(handlers::catalog::update_price_list)
                .delete(handlers::catalog::delete_price_list),
        );

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .patch(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/{id}/tenant-data",
            get(handlers::products::get_product_tenant_data),
        )
        .route(
            "/{id}/property-values",
            put(handlers::products::set_property_values),
        );

    let property_routes = Router::new()
        .route(
            "/",
            post(handlers::properties::create_property).get(handlers::properties::list_properties),
        )
        .route(
            "/{id}/values",
            post(handlers::properties::create_value).get(handlers::properties::list_values),
        )
        .route("/{id}/values/import", post(handlers::properties::import_values));

    let property_value_routes = Router::new()
        .route(
            "/{id}/group",
            post(handlers::properties::group_value).delete(handlers::properties::ungroup_value),
        )
        .route("/{id}/merge", post(handlers::properties::merge_value));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/tenants", tenancy_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/products", product_routes)
        .nest("/api/properties", property_routes)
        .nest("/api/property-values", property_value_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
