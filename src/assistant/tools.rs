//! Tool declarations for the ZIA flow and their tenant-bound execution.
//!
//! None of the tools accept arguments. The tenant comes from the
//! authenticated request, never from the model, so whatever `args` the model
//! sends are ignored.

use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::data;
use crate::error::RepositoryError;
use crate::llm::{FunctionCall, FunctionDeclaration};

pub const GET_INVENTORY: &str = "getInventory";
pub const GET_RECENT_PURCHASES: &str = "getRecentPurchases";
pub const GET_RECENT_SALES: &str = "getRecentSales";

/// Declarations sent to the model. `recent_limit` is reflected in the
/// descriptions so the model knows how far back the invoice tools reach.
pub fn declarations(recent_limit: u64) -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: GET_INVENTORY.to_string(),
            description: "Lista los niveles actuales de inventario de la empresa: cada material \
                          con su categoría, unidad, existencias y precios de compra y venta, \
                          ordenados de mayor a menor existencia."
                .to_string(),
            parameters: None,
        },
        FunctionDeclaration {
            name: GET_RECENT_PURCHASES.to_string(),
            description: format!(
                "Lista las {recent_limit} facturas de compra más recientes de la empresa, \
                 con proveedor, fecha, total, estado y materiales."
            ),
            parameters: None,
        },
        FunctionDeclaration {
            name: GET_RECENT_SALES.to_string(),
            description: format!(
                "Lista las {recent_limit} facturas de venta más recientes de la empresa, \
                 con cliente, fecha, total, estado y materiales."
            ),
            parameters: None,
        },
    ]
}

/// The assistant's tools, bound to one tenant
pub struct TenantTools<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    recent_limit: u64,
}

impl<'a> TenantTools<'a> {
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid, recent_limit: u64) -> Self {
        Self {
            db,
            tenant_id,
            recent_limit,
        }
    }

    /// Run one model-requested call and produce the `functionResponse`
    /// payload. Unknown names yield an `error` payload instead of failing the
    /// conversation.
    pub async fn execute(&self, call: &FunctionCall) -> Result<Value, RepositoryError> {
        tracing::debug!(tool = %call.name, tenant_id = %self.tenant_id, "Executing assistant tool");

        let payload = match call.name.as_str() {
            GET_INVENTORY => wrap(data::list_inventory(self.db, self.tenant_id).await?),
            GET_RECENT_PURCHASES => wrap(
                data::recent_purchases(self.db, self.tenant_id, self.recent_limit).await?,
            ),
            GET_RECENT_SALES => {
                wrap(data::recent_sales(self.db, self.tenant_id, self.recent_limit).await?)
            }
            unknown => {
                tracing::warn!(tool = %unknown, "Model requested an unknown tool");
                counter!("zycle_assistant_unknown_tool_total").increment(1);
                return Ok(json!({ "error": format!("Unknown tool '{unknown}'") }));
            }
        };

        counter!("zycle_assistant_tool_calls_total", "tool" => call.name.clone()).increment(1);
        Ok(payload)
    }
}

/// Gemini expects an object as the function response, so lists go under
/// `result`.
fn wrap<T: Serialize>(items: Vec<T>) -> Value {
    json!({ "count": items.len(), "result": items })
}
