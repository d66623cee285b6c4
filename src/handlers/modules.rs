//! # Module Catalog
//!
//! Lists the product modules and whether each one is usable yet. Cash-box
//! reconciliation, attendance control and payroll slips ship as placeholders.

use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{OperatorAuth, TenantHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Available,
    ComingSoon,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModuleInfo {
    #[schema(example = "materials")]
    pub key: String,
    #[schema(example = "Inventario")]
    pub name: String,
    pub status: ModuleStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModulesResponse {
    pub modules: Vec<ModuleInfo>,
}

const MODULES: &[(&str, &str, ModuleStatus)] = &[
    ("profile", "Perfil de empresa", ModuleStatus::Available),
    ("materials", "Inventario", ModuleStatus::Available),
    ("purchases", "Compras", ModuleStatus::Available),
    ("sales", "Ventas", ModuleStatus::Available),
    ("collections", "Recolecciones", ModuleStatus::Available),
    ("associates", "Asociados", ModuleStatus::Available),
    ("collaborators", "Colaboradores", ModuleStatus::Available),
    ("loans", "Préstamos", ModuleStatus::Available),
    ("vehicles", "Vehículos", ModuleStatus::Available),
    ("assistant", "ZIA", ModuleStatus::Available),
    ("pqs", "PQS", ModuleStatus::Available),
    ("cash_box", "Cuadre de caja", ModuleStatus::ComingSoon),
    ("attendance", "Control de asistencia", ModuleStatus::ComingSoon),
    ("payslips", "Desprendibles de nómina", ModuleStatus::ComingSoon),
];

/// List product modules and their availability
#[utoipa::path(
    get,
    path = "/api/v1/modules",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Module catalog", body = ModulesResponse)
    ),
    tag = "modules"
)]
pub async fn list_modules(_operator_auth: OperatorAuth) -> Json<ModulesResponse> {
    let modules = MODULES
        .iter()
        .map(|(key, name, status)| ModuleInfo {
            key: key.to_string(),
            name: name.to_string(),
            status: *status,
        })
        .collect();

    Json(ModulesResponse { modules })
}
