//! # ZIA Assistant
//!
//! ZIA answers questions about a company's inventory and invoices. Each
//! request runs a short loop with the generative model: the model either
//! answers in text or asks for one or more tools, whose results are sent
//! back in a single turn before asking again.
//!
//! The tenant is checked before anything leaves the process, and the tools
//! are bound to it, so a conversation can only ever see its own company's
//! data.

pub mod data;
pub mod tools;

use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AssistantConfig;
use crate::error::RepositoryError;
use crate::llm::{Content, GenerateRequest, GenerativeModel, ModelError, Part, Role};
use tools::TenantTools;

/// Returned verbatim whenever the model produces no usable text.
pub const FALLBACK_RESPONSE: &str =
    "Lo siento, no pude procesar tu solicitud en este momento. Por favor, intenta de nuevo.";

const SYSTEM_INSTRUCTION: &str = "\
Eres ZIA, el asistente virtual de ZYCLE, una plataforma de gestión para empresas de reciclaje. \
Responde siempre en español, de forma clara, breve y cordial. \
Cuando la pregunta requiera datos de la empresa, usa las herramientas disponibles: \
getInventory para el inventario actual, getRecentPurchases para las compras recientes \
y getRecentSales para las ventas recientes. \
Resume los resultados en prosa, con cifras y unidades; nunca muestres JSON ni listados crudos. \
Si la información no está disponible, dilo con honestidad y no inventes datos.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl From<ChatRole> for Role {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => Role::User,
            ChatRole::Assistant => Role::Model,
        }
    }
}

/// One prior message of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ZiaInput {
    pub query: String,
    /// Prior turns, oldest first
    pub history: Vec<ChatTurn>,
    /// Tenant the conversation belongs to
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ZiaOutput {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("a tenant identifier is required")]
    MissingTenant,
    #[error("tenant identifier '{0}' is not a valid UUID")]
    InvalidTenant(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One ZIA conversation step
pub struct ZiaFlow<'a> {
    model: &'a dyn GenerativeModel,
    db: &'a DatabaseConnection,
    settings: &'a AssistantConfig,
}

impl<'a> ZiaFlow<'a> {
    pub fn new(
        model: &'a dyn GenerativeModel,
        db: &'a DatabaseConnection,
        settings: &'a AssistantConfig,
    ) -> Self {
        Self {
            model,
            db,
            settings,
        }
    }

    pub async fn run(&self, input: ZiaInput) -> Result<ZiaOutput, AssistantError> {
        let tenant_id = parse_tenant(&input.user_id)?;
        let toolbox = TenantTools::new(self.db, tenant_id, self.settings.recent_limit);
        let declarations = tools::declarations(self.settings.recent_limit);

        let mut contents = conversation(input.history, input.query);

        for round in 0..=self.settings.max_tool_rounds {
            let response = self
                .model
                .generate(GenerateRequest {
                    system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
                    contents: contents.clone(),
                    tools: declarations.clone(),
                })
                .await?;

            let calls: Vec<_> = response.function_calls().into_iter().cloned().collect();
            if calls.is_empty() {
                return Ok(finish(response.text()));
            }

            if round == self.settings.max_tool_rounds {
                // No further tool round; keep any prose the model sent alongside the calls.
                if let Some(text) = response.text().filter(|t| !t.trim().is_empty()) {
                    return Ok(finish(Some(text)));
                }
                break;
            }

            tracing::debug!(
                tenant_id = %tenant_id,
                round,
                calls = calls.len(),
                "Model requested tools"
            );

            let mut model_turn = response.content;
            model_turn.role = Role::Model;
            contents.push(model_turn);

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let payload = toolbox.execute(call).await?;
                results.push(Part::function_response(call.name.clone(), payload));
            }
            contents.push(Content {
                role: Role::User,
                parts: results,
            });
        }

        tracing::warn!(
            tenant_id = %tenant_id,
            max_tool_rounds = self.settings.max_tool_rounds,
            "Assistant tool loop exhausted"
        );
        counter!("zycle_assistant_responses_total", "outcome" => "exhausted").increment(1);
        Ok(ZiaOutput {
            response: FALLBACK_RESPONSE.to_string(),
        })
    }
}

fn parse_tenant(user_id: &str) -> Result<Uuid, AssistantError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AssistantError::MissingTenant);
    }
    trimmed
        .parse::<Uuid>()
        .map_err(|_| AssistantError::InvalidTenant(trimmed.to_string()))
}

fn conversation(history: Vec<ChatTurn>, query: String) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .into_iter()
        .map(|turn| Content {
            role: turn.role.into(),
            parts: vec![Part::text(turn.content)],
        })
        .collect();
    contents.push(Content::user_text(query));
    contents
}

fn finish(text: Option<String>) -> ZiaOutput {
    match text.filter(|t| !t.trim().is_empty()) {
        Some(response) => {
            counter!("zycle_assistant_responses_total", "outcome" => "answered").increment(1);
            ZiaOutput { response }
        }
        None => {
            counter!("zycle_assistant_responses_total", "outcome" => "fallback").increment(1);
            ZiaOutput {
                response: FALLBACK_RESPONSE.to_string(),
            }
        }
    }
}
