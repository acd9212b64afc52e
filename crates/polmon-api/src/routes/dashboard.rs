//! The dashboard page and its list-view controls.

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use polmon_core::{Choice, FilterSelection};

use crate::error::AppError;
use crate::render::{self, download::Prefill};
use crate::routes::export::{EMAIL_COOKIE, INSTITUTION_COOKIE};
use crate::session::{Panel, SessionHandle, View};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/filters", post(set_filters))
        .route("/page", post(set_page))
        .route("/download", post(open_download))
        .route("/download/back", post(close_download))
}

/// Render the current view and drain the notice queue.
async fn index(State(state): State<AppState>, session: SessionHandle, jar: CookieJar) -> Html<String> {
    let tr = &state.translator;
    let (view, selection, rows, page, notices) = session.with(|s| {
        (
            s.view(),
            s.selection().clone(),
            s.rows().to_vec(),
            s.page(),
            s.drain_notices(),
        )
    });

    let content = match view {
        View::Detail(id) => render::detail::detail(tr, state.dataset.get(id)),
        View::List(panel) => {
            let bar = render::table::filter_bar(tr, &state.dataset, &selection)
                .unwrap_or_else(|e| render::error_block(tr, &e));
            let body = match panel {
                Panel::Table => render::table::records_table(
                    tr,
                    &state.dataset,
                    &rows,
                    page,
                    state.config.page_size,
                )
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "table render failed");
                    render::error_block(tr, &e)
                }),
                Panel::Download => {
                    let prefill = Prefill {
                        email: cookie_value(&jar, EMAIL_COOKIE),
                        institution: cookie_value(&jar, INSTITUTION_COOKIE),
                    };
                    render::download::download_panel(tr, rows.len(), &prefill)
                }
            };
            format!("{bar}\n{body}")
        }
    };

    Html(render::page(tr, &notices, &content))
}

fn cookie_value(jar: &CookieJar, name: &str) -> String {
    jar.get(name)
        .map(|c| c.value().to_string())
        .unwrap_or_default()
}

/// Form fields of the filter bar. Missing fields mean "all" / no keyword.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub keyword: String,
}

impl From<FilterForm> for FilterSelection {
    fn from(form: FilterForm) -> Self {
        Self {
            region: Choice::from_form(&form.region),
            category: Choice::from_form(&form.category),
            year: Choice::from_form(&form.year),
            keyword: form.keyword,
        }
    }
}

async fn set_filters(
    State(state): State<AppState>,
    session: SessionHandle,
    Form(form): Form<FilterForm>,
) -> Redirect {
    let selection = FilterSelection::from(form);
    session.with(|s| s.set_filters(&state.dataset, selection));
    Redirect::to("/")
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub page: String,
}

async fn set_page(session: SessionHandle, Form(form): Form<PageForm>) -> Result<Redirect, AppError> {
    let page: usize = form
        .page
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid page {:?}", form.page)))?;
    session.with(|s| s.set_page(page));
    Ok(Redirect::to("/"))
}

async fn open_download(session: SessionHandle) -> Redirect {
    session.with(|s| s.open_download());
    Redirect::to("/")
}

async fn close_download(session: SessionHandle) -> Redirect {
    session.with(|s| s.back_to_list());
    Redirect::to("/")
}
