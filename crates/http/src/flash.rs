//! One-shot notices shown on the next rendered page.
//!
//! A browser is identified by the `bookshelf_session` cookie (a random UUID).
//! Notices live server side and are drained by the first page render that
//! follows them.

use std::collections::HashMap;
use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "bookshelf_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

impl FlashLevel {
    /// Bootstrap alert class.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Warning => "alert-warning",
            Self::Danger => "alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Warning, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Danger, message: message.into() }
    }
}

/// How long queued notices wait for the browser to come back.
pub const FLASH_TTL: Duration = Duration::from_secs(600);

/// Sessions with pending notices kept at once; the oldest is dropped beyond this.
pub const FLASH_MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct Pending {
    queued_at: Instant,
    flashes: Vec<Flash>,
}

/// Pending notices per browser session.
///
/// Clients that never send the cookie back leave entries behind, so entries
/// expire after a TTL and the number of sessions is capped.
#[derive(Debug)]
pub struct FlashStore {
    inner: Mutex<HashMap<Uuid, Pending>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(FLASH_TTL, FLASH_MAX_SESSIONS)
    }
}

impl FlashStore {
    #[must_use]
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self { inner: Mutex::new(HashMap::new()), ttl, max_sessions: max_sessions.max(1) }
    }

    pub async fn push(&self, session: &Session, flash: Flash) {
        self.extend(session, std::iter::once(flash)).await;
    }

    pub async fn extend(&self, session: &Session, flashes: impl IntoIterator<Item = Flash>) {
        let mut inner = self.inner.lock().await;
        let ttl = self.ttl;
        inner.retain(|_, pending| pending.queued_at.elapsed() < ttl);
        if !inner.contains_key(&session.id) && inner.len() >= self.max_sessions {
            let oldest = inner.iter().min_by_key(|(_, p)| p.queued_at).map(|(id, _)| *id);
            if let Some(id) = oldest {
                inner.remove(&id);
                tracing::debug!(session = %id, "Dropped oldest pending notices");
            }
        }
        let pending = inner
            .entry(session.id)
            .or_insert_with(|| Pending { queued_at: Instant::now(), flashes: Vec::new() });
        pending.queued_at = Instant::now();
        pending.flashes.extend(flashes);
    }

    /// Remove and return everything queued for `session` that has not expired.
    pub async fn take(&self, session: &Session) -> Vec<Flash> {
        match self.inner.lock().await.remove(&session.id) {
            Some(pending) if pending.queued_at.elapsed() < self.ttl => pending.flashes,
            _ => Vec::new(),
        }
    }

    /// Number of sessions with notices waiting.
    pub async fn pending_sessions(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Browser session taken from the cookie, or a fresh one when absent/invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    id: Uuid,
    fresh: bool,
}

impl Session {
    fn from_cookie_header<'a>(values: impl Iterator<Item = &'a HeaderValue>) -> Self {
        let existing = values
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok());
        match existing {
            Some(id) => Self { id, fresh: false },
            None => Self { id: Uuid::new_v4(), fresh: true },
        }
    }

    /// Add `Set-Cookie` to `response` when the browser does not have the cookie yet.
    pub fn attach(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.fresh {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }

    /// `303 See Other` to `path`, keeping the session cookie.
    pub fn redirect(&self, path: &str) -> Response {
        self.attach(Redirect::to(path))
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_cookie_header(parts.headers.get_all(header::COOKIE).iter()))
    }
}
