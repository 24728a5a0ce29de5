use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::errors::AppError;
use crate::services::replies::{self, NEUTRAL_ACK};
use crate::state::AppState;

pub const WEBHOOK_PATH: &str = "/webhook/twilio";

/// Checks `X-Twilio-Signature`: base64 HMAC-SHA1 over the full URL followed by
/// every POST parameter as `key` + `value`, sorted by key.
pub fn validate_twilio_signature(
    auth_token: &str,
    signature: &str,
    url: &str,
    params: &HashMap<String, String>,
) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature) else {
        return false;
    };

    let mut sorted: Vec<(&String, &String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut data = url.to_string();
    for (key, value) in sorted {
        data.push_str(key);
        data.push_str(value);
    }

    let mut mac = match Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(data.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

fn webhook_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.config.webhook_base_url {
        return format!("{}{WEBHOOK_PATH}", base.trim_end_matches('/'));
    }

    // Behind a proxy the original scheme and host arrive in X-Forwarded-*.
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}{WEBHOOK_PATH}")
}

pub async fn twilio_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let from = params.get("From").map(|v| v.trim()).unwrap_or_default();
    let body = params.get("Body").map(String::as_str).unwrap_or_default();

    tracing::info!(from = %from, body = %body, "incoming SMS");

    // Unsigned requests are accepted only when no auth token is configured (dry run).
    if !state.config.twilio_auth_token.is_empty() {
        let signature = headers
            .get("x-twilio-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if signature.is_empty() {
            tracing::warn!("missing X-Twilio-Signature header");
            return (StatusCode::FORBIDDEN, "Missing signature").into_response();
        }

        let url = webhook_url(&state, &headers);
        if !validate_twilio_signature(&state.config.twilio_auth_token, signature, &url, &params) {
            tracing::warn!(url = %url, "invalid Twilio signature");
            return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
        }
    }

    if from.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing From").into_response();
    }

    let reply = {
        let repo = state.users.lock().await;
        match replies::handle_reply(&**repo, from, body) {
            Ok(reply) => reply.text,
            Err(AppError::UnknownSender) => NEUTRAL_ACK.to_string(),
            Err(e) => {
                tracing::error!(error = %e, from = %from, "failed to process reply");
                NEUTRAL_ACK.to_string()
            }
        }
    };

    twiml_response(&reply)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn twiml_response(message: &str) -> Response {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>{}</Message></Response>"#,
        escape_xml(message)
    );
    ([(header::CONTENT_TYPE, "text/xml")], xml).into_response()
}
