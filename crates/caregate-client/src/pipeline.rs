//! The request pipeline: one gate every outbound call passes through.
//!
//! The pipeline has exactly two cross-cutting obligations, and every
//! screen in the portal inherits them for free by calling through here:
//!
//! - **Attach**: if a credential is stored, the request carries it as
//!   `Authorization: Bearer <token>`. Anonymous requests carry nothing.
//! - **Reject-on-401**: a 401 on a bearer-authenticated request is
//!   terminal for the session. Within the same response-handling step the
//!   store is cleared and [`SessionEvent::CredentialRejected`] is
//!   broadcast. No retry. The caller gets
//!   [`ClientError::CredentialRejected`] back; the session controller —
//!   not this pipeline — owns the redirect to the login screen.
//!
//! Everything else (network failure, 5xx, business 4xx) passes through to
//! the caller as a typed error value and leaves the session alone.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use caregate_protocol::ApiError;
use caregate_store::CredentialStore;

use crate::{ClientError, SessionEvent};

/// Capacity of the session-event channel. Events are tiny and rare; a
/// small buffer only matters if a subscriber stalls badly.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// What a 401 response means for the current call.
///
/// Almost everything escalates: a rejected bearer token ends the session
/// globally. The exception is `verify()`, whose whole purpose is to *ask*
/// whether the token is still good — there, "no" is an answer for the
/// bootstrapper to act on, not a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnReject {
    /// Clear the store, broadcast `CredentialRejected`, fail the call.
    Escalate,
    /// Just report the 401 to the caller; mutate nothing.
    Report,
}

/// The shared HTTP client wrapper.
///
/// Cheap to clone: the inner `reqwest::Client` is reference-counted, the
/// store is behind an `Arc`, and broadcast senders clone freely. Every
/// clone feeds the same event stream and the same store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Creates a pipeline rooted at `base_url` (e.g.
    /// `http://localhost:5001/api`) over the given credential store.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            events,
        }
    }

    /// The credential store this pipeline reads and (on rejection) clears.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Subscribes to session events. Every subscriber sees every event
    /// emitted after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Broadcasts a session event. A send error only means there are no
    /// subscribers right now, which is fine — the store is the source of
    /// truth, events are a wake-up call.
    pub(crate) fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -- Core send path ----------------------------------------------------

    /// Sends a request with the credential attached (when present) and
    /// applies the 401 policy to the response. Returns the successful
    /// response body as text.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        on_reject: OnReject,
    ) -> Result<String, ClientError> {
        let mut request = self.http.request(method.clone(), self.url(path));

        // Attach: read the store on every call so a mid-session save or
        // clear is picked up immediately, not at client construction time.
        let credential = self.store.read()?;
        let authenticated = credential.is_some();
        if let Some(credential) = credential {
            request = request.header(
                AUTHORIZATION,
                format!("Bearer {}", credential.token),
            );
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(%method, path, %status, "portal request completed");

        if status == StatusCode::UNAUTHORIZED && authenticated {
            return match on_reject {
                OnReject::Escalate => {
                    // Terminal for the session: clear first, then announce.
                    // Subscribers observing the event always find the store
                    // already empty. clear() is idempotent, so concurrent
                    // 401s race harmlessly — first one wins, the rest
                    // repeat a no-op.
                    self.store.clear()?;
                    self.emit(SessionEvent::CredentialRejected);
                    tracing::warn!(
                        path,
                        "credential rejected; session terminated"
                    );
                    Err(ClientError::CredentialRejected)
                }
                OnReject::Report => Err(ClientError::Api {
                    status: status.as_u16(),
                    reason: Self::failure_reason(response).await,
                }),
            };
        }

        if !status.is_success() {
            // Business 4xx, anonymous 401, or 5xx: the caller's problem,
            // not the session's.
            return Err(ClientError::Api {
                status: status.as_u16(),
                reason: Self::failure_reason(response).await,
            });
        }

        Ok(response.text().await?)
    }

    /// Extracts the server's `{"error": "..."}` message from a failure
    /// body, falling back to the status line when the body is something
    /// else (HTML error page, empty, truncated).
    async fn failure_reason(response: reqwest::Response) -> String {
        let status = response.status();
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        };
        match response.text().await {
            Ok(body) => serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| fallback()),
            Err(_) => fallback(),
        }
    }

    /// Sends and decodes a successful body into `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        on_reject: OnReject,
    ) -> Result<T, ClientError> {
        let text = self.send(method, path, body, on_reject).await?;
        Ok(serde_json::from_str(&text)?)
    }

    // -- Gated-resource verbs ---------------------------------------------
    //
    // The generic surface every screen outside the session core calls
    // through: dashboards, appointment booking, screening upload results.
    // All of them inherit attach + reject-on-401.

    /// `GET` a gated resource.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        self.send_json(Method::GET, path, None, OnReject::Escalate)
            .await
    }

    /// `POST` a JSON body to a gated resource.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::POST, path, Some(&body), OnReject::Escalate)
            .await
    }

    /// `PUT` a JSON body to a gated resource.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::PUT, path, Some(&body), OnReject::Escalate)
            .await
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the pieces that don't need a live endpoint. The
    //! attach/reject behavior is exercised end to end against an
    //! in-process stub server in `tests/auth_flow.rs`.

    use caregate_store::MemoryStore;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = client("http://localhost:5001/api");
        assert_eq!(
            api.url("/auth/login"),
            "http://localhost:5001/api/auth/login"
        );
    }

    #[test]
    fn test_url_tolerates_trailing_slash_in_base() {
        let api = client("http://localhost:5001/api/");
        assert_eq!(
            api.url("/auth/login"),
            "http://localhost:5001/api/auth/login"
        );
    }

    #[test]
    fn test_subscribe_receives_emitted_event() {
        let api = client("http://localhost:0");
        let mut rx = api.subscribe();

        api.emit(SessionEvent::LoggedOut);

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let api = client("http://localhost:0");
        api.emit(SessionEvent::CredentialRejected);
    }

    #[test]
    fn test_clones_share_one_event_stream() {
        let api = client("http://localhost:0");
        let clone = api.clone();
        let mut rx = api.subscribe();

        clone.emit(SessionEvent::CredentialRejected);

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::CredentialRejected
        );
    }
}
