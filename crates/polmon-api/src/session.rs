//! # Sessions
//!
//! Every browser gets its own filter selection, page cursor, view and
//! notification queue. The dataset itself is shared and never copied.
//!
//! ## Lifecycle
//!
//! [`session_middleware`] reads the `polmon_session` cookie. A known id is
//! touched; an unknown or missing one gets a fresh [`SessionState`] and a
//! `Set-Cookie` on the response. Creating a session first evicts every
//! session idle for longer than the configured TTL.
//!
//! Handlers take a [`SessionHandle`] extractor. All access goes through
//! closures that run under the store's write lock, which is never held
//! across an `.await`.
//!
//! ## View State Machine
//!
//! | From                 | Event             | To                   |
//! |----------------------|-------------------|----------------------|
//! | any                  | select row `id`   | `Detail(id)`         |
//! | any                  | back              | `List(Table)`        |
//! | any                  | download          | `List(Download)`     |
//! | any                  | back-from-download| `List(Table)`        |
//!
//! Filters and the page cursor survive every transition.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{FromRequestParts, Request};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use parking_lot::RwLock;
use uuid::Uuid;

use polmon_core::{Dataset, FilterSelection, FilteredCalc, RecordId, SideEffect};

use crate::error::AppError;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "polmon_session";

/// Which panel the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Table,
    Download,
}

/// What the dashboard currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List(Panel),
    Detail(RecordId),
}

impl Default for View {
    fn default() -> Self {
        Self::List(Panel::Table)
    }
}

/// Severity of a notice, mapped to a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One flash message, shown once on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Per-session dashboard state.
#[derive(Debug, Clone)]
pub struct SessionState {
    calc: FilteredCalc,
    page: usize,
    view: View,
    notices: Vec<Notice>,
    export_in_flight: bool,
    last_seen: Instant,
}

impl SessionState {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            calc: FilteredCalc::new(dataset),
            page: 1,
            view: View::default(),
            notices: Vec::new(),
            export_in_flight: false,
            last_seen: Instant::now(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        self.calc.selection()
    }

    /// Ids of the records matching the current selection, in dataset order.
    pub fn rows(&self) -> &[RecordId] {
        self.calc.rows()
    }

    /// Page cursor as last requested; clamp before rendering.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    /// Replace the filter selection and apply whatever the recompute declares.
    pub fn set_filters(&mut self, dataset: &Dataset, selection: FilterSelection) {
        for effect in self.calc.update(dataset, selection) {
            match effect {
                SideEffect::ResetPage => self.page = 1,
            }
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn select(&mut self, id: RecordId) {
        self.view = View::Detail(id);
    }

    pub fn back_to_list(&mut self) {
        self.view = View::List(Panel::Table);
    }

    pub fn open_download(&mut self) {
        self.view = View::List(Panel::Download);
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
    }

    /// Take every pending notice, leaving the queue empty.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Mark an export as started. Returns `false` if one is already running.
    pub fn begin_export(&mut self) -> bool {
        if self.export_in_flight {
            return false;
        }
        self.export_in_flight = true;
        true
    }

    pub fn finish_export(&mut self) {
        self.export_in_flight = false;
    }
}

// -- Store --------------------------------------------------------------------

/// Thread-safe map of live sessions.
///
/// Holds at most `capacity` sessions. The `RwLock` is `parking_lot` and is
/// never held across `.await`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    dataset: Arc<Dataset>,
    ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    /// A zero `capacity` is treated as one.
    pub fn new(dataset: Arc<Dataset>, ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            dataset,
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Start a new session.
    ///
    /// Idle sessions are evicted first. If the store is still full, the
    /// least recently seen session makes room.
    pub fn create(&self) -> Uuid {
        let now = Instant::now();
        let id = Uuid::new_v4();
        let mut guard = self.sessions.write();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_seen) <= self.ttl);
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle sessions");
        }
        while guard.len() >= self.capacity {
            let oldest = guard
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    guard.remove(&oldest);
                    tracing::debug!(session = %oldest, "session store full, evicted oldest");
                }
                None => break,
            }
        }
        guard.insert(id, SessionState::new(&self.dataset));
        id
    }

    /// Refresh the idle timer. Returns `false` for unknown ids.
    pub fn touch(&self, id: &Uuid) -> bool {
        match self.sessions.write().get_mut(id) {
            Some(state) => {
                state.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Run `f` against the session, recreating it if it was evicted mid-request.
    pub fn with<R>(&self, id: &Uuid, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut guard = self.sessions.write();
        let state = guard
            .entry(*id)
            .or_insert_with(|| SessionState::new(&self.dataset));
        f(state)
    }

    #[cfg(test)]
    fn age(&self, id: &Uuid, by: Duration) {
        if let Some(state) = self.sessions.write().get_mut(id) {
            if let Some(earlier) = state.last_seen.checked_sub(by) {
                state.last_seen = earlier;
            }
        }
    }
}

// -- Extractor ----------------------------------------------------------------

/// The current request's session, injected by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    store: SessionStore,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run `f` with exclusive access to this session's state.
    pub fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        self.store.with(&self.id, f)
    }

    pub fn notify(&self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        self.with(|s| s.notify(level, text));
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionHandle {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| AppError::Internal("no session in request context".into()))
    }
}

/// Resolve or create the session for this request.
///
/// Expects a [`SessionStore`] in the request extensions.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let Some(store) = request.extensions().get::<SessionStore>().cloned() else {
        return next.run(request).await;
    };

    let jar = CookieJar::from_headers(request.headers());
    let known = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
        .filter(|id| store.touch(id));

    let (id, created) = match known {
        Some(id) => (id, false),
        None => (store.create(), true),
    };

    request.extensions_mut().insert(SessionHandle {
        id,
        store: store.clone(),
    });
    let mut response = next.run(request).await;

    if created {
        tracing::debug!(session = %id, sessions = store.len(), "session created");
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "session cookie is not a valid header value"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use polmon_core::{Choice, ColumnNames};

    const SOURCE: &str = "经济体,政策动态,政策类型,发布主体,时间\n\
China,A,Tariff,M,01/2024\n\
Japan,B,Subsidy,M,02/2024\n";

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_csv(SOURCE, &ColumnNames::default()).unwrap())
    }

    #[test]
    fn filter_change_resets_page() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        state.set_page(3);
        let selection = FilterSelection {
            region: Choice::Only("China".into()),
            ..Default::default()
        };
        state.set_filters(&data, selection);
        assert_eq!(state.page(), 1);
        assert_eq!(state.rows().len(), 1);
    }

    #[test]
    fn unchanged_filter_keeps_page() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        state.set_page(2);
        state.set_filters(&data, FilterSelection::default());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn set_page_floors_at_one() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        state.set_page(0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn view_transitions() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        assert_eq!(state.view(), View::List(Panel::Table));
        state.select(RecordId(1));
        assert_eq!(state.view(), View::Detail(RecordId(1)));
        state.back_to_list();
        assert_eq!(state.view(), View::List(Panel::Table));
        state.open_download();
        assert_eq!(state.view(), View::List(Panel::Download));
        state.back_to_list();
        assert_eq!(state.view(), View::List(Panel::Table));
    }

    #[test]
    fn notices_drain_once() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        state.notify(NoticeLevel::Info, "one");
        state.notify(NoticeLevel::Error, "two");
        let drained = state.drain_notices();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].level, NoticeLevel::Error);
        assert!(state.drain_notices().is_empty());
    }

    #[test]
    fn export_guard_rejects_second_start() {
        let data = dataset();
        let mut state = SessionState::new(&data);
        assert!(state.begin_export());
        assert!(!state.begin_export());
        state.finish_export();
        assert!(state.begin_export());
    }

    #[test]
    fn create_evicts_idle_sessions() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 64);
        let stale = store.create();
        let fresh = store.create();
        store.age(&stale, Duration::from_secs(120));
        let newest = store.create();
        assert!(!store.contains(&stale));
        assert!(store.contains(&fresh));
        assert!(store.contains(&newest));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn create_replaces_least_recently_seen_when_full() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 2);
        let first = store.create();
        let second = store.create();
        store.age(&second, Duration::from_secs(10));
        store.age(&first, Duration::from_secs(5));
        let third = store.create();
        assert_eq!(store.len(), 2);
        assert!(!store.contains(&second));
        assert!(store.contains(&first));
        assert!(store.contains(&third));
    }

    #[test]
    fn create_never_exceeds_capacity() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 16);
        for _ in 0..500 {
            store.create();
        }
        assert_eq!(store.len(), 16);
    }

    #[test]
    fn handle_addresses_its_own_session() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 64);
        let id = store.create();
        let other = store.create();
        let handle = SessionHandle {
            id,
            store: store.clone(),
        };
        assert_eq!(handle.id(), id);
        handle.with(|s| s.set_page(2));
        assert_eq!(store.with(&id, |s| s.page()), 2);
        assert_eq!(store.with(&other, |s| s.page()), 1);
    }

    #[test]
    fn with_recreates_missing_session() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 64);
        let id = Uuid::new_v4();
        let page = store.with(&id, |s| s.page());
        assert_eq!(page, 1);
        assert!(store.contains(&id));
    }

    #[test]
    fn touch_unknown_is_false() {
        let store = SessionStore::new(dataset(), Duration::from_secs(60), 64);
        assert!(!store.touch(&Uuid::new_v4()));
        assert!(store.is_empty());
    }
}
