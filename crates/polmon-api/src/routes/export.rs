//! # Export Delivery
//!
//! `POST /export` runs the whole pipeline for one submission:
//!
//! 1. Validate the contact fields. A failure becomes a notice and nothing
//!    leaves the process.
//! 2. Remember the contact in long-lived cookies for the next visit.
//! 3. Take the session's in-flight guard. A second submission while one is
//!    running gets a notice instead of a duplicate mail.
//! 4. Serialize the current filtered view on the blocking pool.
//! 5. Hand the file to the relay. Exactly one notice reports the outcome.

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Extension, Form, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use polmon_client::{ClientError, ExportPayload};
use polmon_core::i18n::label;
use polmon_core::{Contact, ContactError, ExportFormat};

use crate::error::AppError;
use crate::middleware::metrics::ApiMetrics;
use crate::session::{NoticeLevel, SessionHandle};
use crate::state::AppState;

pub const EMAIL_COOKIE: &str = "polmon_email";
pub const INSTITUTION_COOKIE: &str = "polmon_inst";

pub fn router() -> Router<AppState> {
    Router::new().route("/export", post(export))
}

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub institution: String,
    pub format: String,
}

/// Clears the session's in-flight flag however the export ends.
struct InFlight(SessionHandle);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.with(|s| s.finish_export());
    }
}

fn contact_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build()
}

async fn export(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
    session: SessionHandle,
    jar: CookieJar,
    Form(form): Form<ExportForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let tr = state.translator.clone();
    let done = Redirect::to("/");

    let format: ExportFormat = form.format.parse().map_err(AppError::BadRequest)?;

    let contact = match Contact::parse(&form.email, &form.institution) {
        Ok(contact) => contact,
        Err(e) => {
            let text = match e {
                ContactError::InvalidEmail(_) => tr.t(label::INVALID_EMAIL),
                ContactError::InstitutionTooShort { .. } => tr.t(label::INSTITUTION_TOO_SHORT),
                ContactError::Pattern(_) => return Err(AppError::Internal(e.to_string())),
            };
            tracing::debug!(error = %e, "export rejected by contact validation");
            session.notify(NoticeLevel::Warning, text);
            return Ok((jar, done));
        }
    };

    let jar = jar
        .add(contact_cookie(EMAIL_COOKIE, contact.email()))
        .add(contact_cookie(INSTITUTION_COOKIE, contact.institution()));

    if !session.with(|s| s.begin_export()) {
        session.notify(NoticeLevel::Warning, tr.t(label::SEND_IN_PROGRESS));
        return Ok((jar, done));
    }
    let _in_flight = InFlight(session.clone());

    let rows = session.with(|s| s.rows().to_vec());
    let row_count = rows.len();
    let dataset = state.dataset.clone();
    let serialized = tokio::task::spawn_blocking(move || format.serialize(&dataset, &rows)).await;

    let bytes = match serialized {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::error!(error = %e, %format, rows = row_count, "export serialization failed");
            return Ok((jar, fail(&session, &metrics, tr.t(label::EXPORT_FAILED), done)));
        }
        Err(e) => {
            tracing::error!(error = %e, %format, "export task failed");
            return Ok((jar, fail(&session, &metrics, tr.t(label::EXPORT_FAILED), done)));
        }
    };

    let Some(relay) = state.relay.as_ref() else {
        tracing::warn!(%format, rows = row_count, "export requested but no relay is configured");
        let text = format!("{}{}", tr.t(label::SEND_FAILED), tr.t(label::RELAY_MISSING));
        return Ok((jar, fail(&session, &metrics, &text, done)));
    };

    let payload = ExportPayload::new(
        contact.email(),
        contact.institution(),
        format.as_str(),
        &bytes,
    );
    match relay.send(&payload).await {
        Ok(()) => {
            tracing::info!(session = %session.id(), %format, rows = row_count, bytes = bytes.len(), "export delivered");
            metrics.record_export(true);
            session.notify(
                NoticeLevel::Info,
                format!("{}{}", tr.t(label::SENT), contact.email()),
            );
        }
        Err(e) => {
            tracing::warn!(session = %session.id(), error = %e, %format, rows = row_count, "export delivery failed");
            let text = format!("{}{}", tr.t(label::SEND_FAILED), failure_detail(&e));
            return Ok((jar, fail(&session, &metrics, &text, done)));
        }
    }

    Ok((jar, done))
}

fn fail(session: &SessionHandle, metrics: &ApiMetrics, text: &str, done: Redirect) -> Redirect {
    metrics.record_export(false);
    session.notify(NoticeLevel::Error, text);
    done
}

/// Short user-facing reason. Transport details stay in the logs.
fn failure_detail(err: &ClientError) -> String {
    match err.status() {
        Some(status) => format!("HTTP {status}"),
        None => "network error".to_string(),
    }
}
