// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::models::catalog::{Category, MeasureUnit, PriceList, ProductType, TaxClass};
use crate::models::product::Product;
use crate::models::tenant_data::WithFlags;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Tenancy ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_tenants,

        // --- CATALOG ---
        handlers::catalog::create_category,
        handlers::catalog::list_categories,
        handlers::catalog::create_product_type,
        handlers::catalog::list_product_types,
        handlers::catalog::get_product_type,
        handlers::catalog::update_product_type,
        handlers::catalog::delete_product_type,
        handlers::catalog::create_tax_class,
        handlers::catalog::list_tax_classes,
        handlers::catalog::get_tax_class,
        handlers::catalog::update_tax_class,
        handlers::catalog::delete_tax_class,
        handlers::catalog::create_measure_unit,
        handlers::catalog::list_measure_units,
        handlers::catalog::get_measure_unit,
        handlers::catalog::update_measure_unit,
        handlers::catalog::delete_measure_unit,
        handlers::catalog::create_price_list,
        handlers::catalog::list_price_lists,
        handlers::catalog::get_price_list,
        handlers::catalog::update_price_list,
        handlers::catalog::delete_price_list,

        // --- PRODUCTS ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::get_product_tenant_data,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::set_property_values,

        // --- PROPERTIES ---
        handlers::properties::create_property,
        handlers::properties::list_properties,
        handlers::properties::create_value,
        handlers::properties::list_values,
        handlers::properties::group_value,
        handlers::properties::ungroup_value,
        handlers::properties::merge_value,
        handlers::properties::import_values,
    ),
    components(
        schemas(
            // --- Tenancy ---
            models::tenancy::Tenant,
            handlers::tenancy::CreateTenantPayload,

            // --- Catalog ---
            Category,
            ProductType,
            TaxClass,
            MeasureUnit,
            PriceList,
            WithFlags<ProductType>,
            WithFlags<TaxClass>,
            WithFlags<MeasureUnit>,
            WithFlags<PriceList>,
            WithFlags<Product>,
            models::tenant_data::TenantDataInput,
            models::tenant_data::TenantFlagsView,
            handlers::catalog::CreateCategoryPayload,
            handlers::catalog::CreateProductTypePayload,
            handlers::catalog::UpdateProductTypePayload,
            handlers::catalog::CreateTaxClassPayload,
            handlers::catalog::UpdateTaxClassPayload,
            handlers::catalog::CreateMeasureUnitPayload,
            handlers::catalog::UpdateMeasureUnitPayload,
            handlers::catalog::CreatePriceListPayload,
            handlers::catalog::UpdatePriceListPayload,

            // --- Products ---
            Product,
            models::product::ProductTenantData,
            handlers::products::ProductTenantPayload,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,
            handlers::products::SetPropertyValuesPayload,
            handlers::products::ProductTenantDataResponse,

            // --- Properties ---
            models::property::Property,
            models::property::PropertyValue,
            models::property::ColorDescriptor,
            models::property::MergeSummary,
            models::property::ImportSummary,
            handlers::properties::CreatePropertyPayload,
            handlers::properties::CreateValuePayload,
            handlers::properties::TargetValuePayload,
            handlers::properties::ImportValuesPayload,
        )
    ),
    tags(
        (name = "Tenancy", description = "Gestão de Tenants (sites/lojas)"),
        (name = "Catalog", description = "Entidades do catálogo com dados por tenant"),
        (name = "Products", description = "Gestão de Produtos"),
        (name = "Properties", description = "Propriedades, valores, agrupamento e merge")
    )
)]
pub struct ApiDoc;
