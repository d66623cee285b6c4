//! PQS (petition, complaint or suggestion) submissions.
//!
//! A submission is rendered into a fixed prompt and the model drafts the
//! email body addressed to the company. Nothing is sent: the draft is logged
//! and the caller gets `{ "success": true }`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::llm::{Content, GenerateRequest, GenerativeModel, ModelError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PqsSubmission {
    /// Sender's name
    pub name: String,
    /// Sender's email address
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Address of the company the submission is for
    pub company_email: String,
}

impl PqsSubmission {
    /// Field-level problems, keyed by field name. Empty when the submission
    /// is acceptable.
    pub fn problems(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut problems = serde_json::Map::new();
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
            ("company_email", &self.company_email),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                problems.insert(field.to_string(), "Field is required".into());
            }
        }
        for (field, value) in [("email", &self.email), ("company_email", &self.company_email)] {
            if !value.trim().is_empty() && !value.contains('@') {
                problems.insert(field.to_string(), "Must be a valid email address".into());
            }
        }

        problems
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PqsOutput {
    pub success: bool,
}

/// Builds the prompt the model turns into an email body.
pub fn render_prompt(submission: &PqsSubmission) -> String {
    format!(
        "Redacta un correo electrónico formal en español dirigido a {company_email} \
         para presentar la siguiente PQS (petición, queja o sugerencia).\n\n\
         Remitente: {name} <{email}>\n\
         Asunto: {subject}\n\
         Mensaje:\n{message}\n\n\
         Devuelve solo el cuerpo del correo, sin comentarios adicionales.",
        company_email = submission.company_email.trim(),
        name = submission.name.trim(),
        email = submission.email.trim(),
        subject = submission.subject.trim(),
        message = submission.message.trim(),
    )
}

pub struct PqsFlow<'a> {
    model: &'a dyn GenerativeModel,
}

impl<'a> PqsFlow<'a> {
    pub fn new(model: &'a dyn GenerativeModel) -> Self {
        Self { model }
    }

    pub async fn run(&self, submission: PqsSubmission) -> Result<PqsOutput, ModelError> {
        let response = self
            .model
            .generate(GenerateRequest {
                system_instruction: None,
                contents: vec![Content::user_text(render_prompt(&submission))],
                tools: Vec::new(),
            })
            .await?;

        let body = response.text().unwrap_or_default();
        tracing::info!(
            company_email = %submission.company_email,
            subject = %submission.subject,
            body = %body,
            "PQS email drafted"
        );

        Ok(PqsOutput { success: true })
    }
}
