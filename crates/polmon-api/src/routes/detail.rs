//! Detail view transitions.

use axum::extract::Path;
use axum::response::Redirect;
use axum::routing::post;
use axum::Router;

use polmon_core::RecordId;

use crate::error::AppError;
use crate::session::SessionHandle;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/records/{id}", post(select_record))
        .route("/back", post(back))
}

/// Open the detail view. Unknown ids still switch views and render the
/// not-found placeholder.
async fn select_record(session: SessionHandle, Path(id): Path<String>) -> Result<Redirect, AppError> {
    let id: RecordId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid record id {id:?}")))?;
    session.with(|s| s.select(id));
    Ok(Redirect::to("/"))
}

async fn back(session: SessionHandle) -> Redirect {
    session.with(|s| s.back_to_list());
    Redirect::to("/")
}
