//! Contact form: the message is forwarded to the office's WhatsApp

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{blocking, AppState};
use crate::helpers::whatsapp_link;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// All required fields filled in
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.phone, &self.message]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    /// Message text in WhatsApp markup
    pub fn whatsapp_message(&self) -> String {
        let mut text = format!(
            "*Nova mensagem do site - Contato*\n\n*Nome:* {}\n*E-mail:* {}\n*Telefone:* {}\n",
            self.name.trim(),
            self.email.trim(),
            self.phone.trim()
        );
        if !self.subject.trim().is_empty() {
            text.push_str(&format!("*Assunto:* {}\n", self.subject.trim()));
        }
        text.push_str(&format!("*Mensagem:*\n{}", self.message.trim()));
        text
    }
}

/// `POST /contato`: redirect to WhatsApp with the message prefilled.
///
/// Incomplete submissions go back to the contact page.
pub async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<ContactForm>) -> Response {
    if !form.is_complete() {
        tracing::debug!("Incomplete contact form submission");
        return see_other("/contato");
    }

    blocking(&state, move |state| {
        let number = state.site.settings(Some("contato")).whatsapp_digits();
        if number.is_empty() {
            tracing::warn!("Contact form submitted but no WhatsApp number is configured");
            return see_other("/contato");
        }
        see_other(&whatsapp_link(&number, Some(&form.whatsapp_message())))
    })
    .await
}

fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}
