//! # Server Configuration
//!
//! Router assembly, shared state and the OpenAPI document for the ZYCLE API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{operator_middleware, tenant_middleware};
use crate::config::AppConfig;
use crate::handlers::{
    self, assistant, associates, collaborators, collections, loans, materials, modules, pqs,
    profile, purchase_invoices, sale_invoices, tenants, vehicles,
};
use crate::llm::{GeminiClient, GenerativeModel, ModelError, UnconfiguredModel};
use crate::telemetry::trace_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub model: Arc<dyn GenerativeModel>,
}

impl AppState {
    /// State backed by the configured Gemini client. Without an API key the
    /// assistant endpoints answer 503 instead of failing startup.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Result<Self, ModelError> {
        let model: Arc<dyn GenerativeModel> = match GeminiClient::new(&config.gemini) {
            Ok(client) => {
                tracing::info!(model = %client.model(), "Gemini client configured");
                Arc::new(client)
            }
            Err(ModelError::NotConfigured) => {
                tracing::warn!("ZYCLE_GEMINI_API_KEY not set; assistant endpoints are disabled");
                Arc::new(UnconfiguredModel)
            }
            Err(other) => return Err(other),
        };

        Ok(Self {
            config: Arc::new(config),
            db,
            model,
        })
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let company_scoped = Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::put_profile),
        )
        .route("/modules", get(modules::list_modules))
        .route(
            "/materials",
            post(materials::create_material).get(materials::list_materials),
        )
        .route(
            "/materials/{id}",
            get(materials::get_material).patch(materials::update_material),
        )
        .route(
            "/purchase-invoices",
            post(purchase_invoices::create_purchase_invoice)
                .get(purchase_invoices::list_purchase_invoices),
        )
        .route(
            "/purchase-invoices/{id}",
            get(purchase_invoices::get_purchase_invoice),
        )
        .route(
            "/purchase-invoices/{id}/status",
            patch(purchase_invoices::update_purchase_invoice_status),
        )
        .route(
            "/sale-invoices",
            post(sale_invoices::create_sale_invoice).get(sale_invoices::list_sale_invoices),
        )
        .route("/sale-invoices/{id}", get(sale_invoices::get_sale_invoice))
        .route(
            "/sale-invoices/{id}/status",
            patch(sale_invoices::update_sale_invoice_status),
        )
        .route(
            "/collections",
            post(collections::create_collection).get(collections::list_collections),
        )
        .route("/collections/{id}", get(collections::get_collection))
        .route(
            "/collections/{id}/status",
            patch(collections::update_collection_status),
        )
        .route("/loans", post(loans::create_loan).get(loans::list_loans))
        .route("/loans/{id}", get(loans::get_loan))
        .route(
            "/loans/{id}/payments",
            post(loans::create_loan_payment).get(loans::list_loan_payments),
        )
        .route(
            "/collaborators",
            post(collaborators::create_collaborator).get(collaborators::list_collaborators),
        )
        .route(
            "/collaborators/{id}",
            get(collaborators::get_collaborator).patch(collaborators::update_collaborator),
        )
        .route(
            "/vehicles",
            post(vehicles::create_vehicle).get(vehicles::list_vehicles),
        )
        .route("/vehicles/{id}", get(vehicles::get_vehicle))
        .route(
            "/associates",
            post(associates::create_associate).get(associates::list_associates),
        )
        .route("/associates/{id}", get(associates::get_associate))
        .route("/assistant/zia", post(assistant::ask_zia))
        .route("/pqs", post(pqs::submit_pqs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_middleware,
        ));

    // Registry routes are operator-level: the company may not exist yet.
    let api = Router::new()
        .route("/tenants", post(tenants::create_tenant))
        .route("/tenants/{id}", get(tenants::get_tenant))
        .merge(company_scoped)
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            operator_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .nest("/api/v1", api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_middleware))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(config, db)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
    }
}

/// Registers the operator bearer scheme referenced by `security(("bearer_auth" = []))`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::tenants::create_tenant,
        crate::handlers::tenants::get_tenant,
        crate::handlers::profile::get_profile,
        crate::handlers::profile::put_profile,
        crate::handlers::modules::list_modules,
        crate::handlers::materials::create_material,
        crate::handlers::materials::list_materials,
        crate::handlers::materials::get_material,
        crate::handlers::materials::update_material,
        crate::handlers::purchase_invoices::create_purchase_invoice,
        crate::handlers::purchase_invoices::list_purchase_invoices,
        crate::handlers::purchase_invoices::get_purchase_invoice,
        crate::handlers::purchase_invoices::update_purchase_invoice_status,
        crate::handlers::sale_invoices::create_sale_invoice,
        crate::handlers::sale_invoices::list_sale_invoices,
        crate::handlers::sale_invoices::get_sale_invoice,
        crate::handlers::sale_invoices::update_sale_invoice_status,
        crate::handlers::collections::create_collection,
        crate::handlers::collections::list_collections,
        crate::handlers::collections::get_collection,
        crate::handlers::collections::update_collection_status,
        crate::handlers::loans::create_loan,
        crate::handlers::loans::list_loans,
        crate::handlers::loans::get_loan,
        crate::handlers::loans::create_loan_payment,
        crate::handlers::loans::list_loan_payments,
        crate::handlers::collaborators::create_collaborator,
        crate::handlers::collaborators::list_collaborators,
        crate::handlers::collaborators::get_collaborator,
        crate::handlers::collaborators::update_collaborator,
        crate::handlers::vehicles::create_vehicle,
        crate::handlers::vehicles::list_vehicles,
        crate::handlers::vehicles::get_vehicle,
        crate::handlers::associates::create_associate,
        crate::handlers::associates::list_associates,
        crate::handlers::associates::get_associate,
        crate::handlers::assistant::ask_zia,
        crate::handlers::pqs::submit_pqs,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::error::ProviderError,
            crate::models::invoice::InvoiceLine,
            crate::models::invoice::InvoiceStatus,
            crate::models::collection::CollectionStatus,
            crate::models::loan::LoanStatus,
            crate::handlers::HealthResponse,
            crate::handlers::types::CreateInvoiceRequest,
            crate::handlers::types::InvoiceLineRequest,
            crate::handlers::types::UpdateInvoiceStatusRequest,
            crate::handlers::types::InvoiceResponse,
            crate::handlers::types::InvoicesResponse,
            crate::assistant::ChatTurn,
            crate::assistant::ChatRole,
            crate::assistant::ZiaOutput,
            crate::pqs::PqsSubmission,
            crate::pqs::PqsOutput,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "tenants", description = "Company accounts"),
        (name = "modules", description = "Product module catalog"),
        (name = "collaborators", description = "Company staff"),
        (name = "vehicles", description = "Collection fleet"),
        (name = "associates", description = "Independent recyclers"),
        (name = "profile", description = "Company profile setup"),
        (name = "materials", description = "Material catalog and inventory"),
        (name = "purchase-invoices", description = "Purchases from suppliers"),
        (name = "sale-invoices", description = "Sales to customers"),
        (name = "collections", description = "Pickups at source points"),
        (name = "loans", description = "Collaborator loans and payments"),
        (name = "assistant", description = "ZIA conversational assistant"),
        (name = "pqs", description = "Petitions, complaints and suggestions"),
    ),
    info(
        title = "ZYCLE API",
        description = "Management API for recycling companies",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_bearer_scheme_and_tenant_routes() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(json["paths"]["/api/v1/assistant/zia"]["post"].is_object());
        assert!(json["paths"]["/api/v1/loans/{id}/payments"]["get"].is_object());
    }
}
