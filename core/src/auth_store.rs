//! Session and profile state.
//!
//! # Design
//! An explicit state container replacing the original app's implicit
//! observability: mutations happen inside the action methods, and every
//! mutation batch is followed by a `notify()` to registered listeners, who
//! re-read the snapshot accessors. Actions take the `ApiClient` as an
//! explicit context parameter — there is no global client instance.
//!
//! The error field is cleared at the start of an action rather than
//! atomically with its result, matching the original clear-then-apply
//! ordering. Actions take `&mut self`, so two actions on one store can
//! never overlap.

use crate::client::ApiClient;
use crate::error::ApiProblem;
use crate::types::{LoginCredentials, Profile};

type Listener = Box<dyn Fn()>;

const GENERIC_ERROR: &str = "Something went wrong!";

/// Holds the session token, the fetched profile, and the last auth error.
///
/// The session moves through three implicit states: anonymous (no token),
/// authenticated (token present), and authenticated with a profile.
/// `logout` returns it to anonymous.
#[derive(Default)]
pub struct AuthenticationStore {
    auth_token: Option<String>,
    profile: Option<Profile>,
    error: Option<String>,
    listeners: Vec<Listener>,
}

impl AuthenticationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener, invoked after every mutation batch.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }

    /// True iff a non-empty session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Exchange credentials for a session.
    ///
    /// On success the access token is pushed into the client and stored
    /// here; on a problem the token is left unchanged and the problem's
    /// message becomes the visible error.
    pub fn login(&mut self, api: &mut ApiClient, email: &str, password: &str) {
        self.error = None;
        self.notify();

        let credentials = LoginCredentials {
            username: email.to_string(),
            password: password.to_string(),
        };
        match api.login(&credentials) {
            Ok(token) => {
                api.set_bearer_token(&token.access_token);
                self.auth_token = Some(token.access_token);
            }
            Err(problem) => {
                tracing::error!(%problem, "login failed");
                self.error = Some(problem_message(&problem));
            }
        }
        self.notify();
    }

    /// Fetch the profile for the current session, replacing any previous
    /// one wholesale. On a problem the old profile stays visible.
    pub fn fetch_profile(&mut self, api: &ApiClient) {
        self.error = None;
        self.notify();

        match api.fetch_profile() {
            Ok(profile) => {
                self.profile = Some(profile);
            }
            Err(problem) => {
                tracing::error!(%problem, "profile fetch failed");
                self.error = Some(problem_message(&problem));
            }
        }
        self.notify();
    }

    /// Push the stored session token back into the client. Used after the
    /// store is rehydrated, since the client itself persists nothing.
    pub fn sync_credential(&self, api: &mut ApiClient) {
        api.set_bearer_token(self.auth_token.as_deref().unwrap_or(""));
    }

    /// Drop the session and profile and clear the client credential.
    /// Idempotent.
    pub fn logout(&mut self, api: &mut ApiClient) {
        self.auth_token = None;
        self.profile = None;
        api.set_bearer_token("");
        self.notify();
    }
}

/// Display text of the problem, falling back to a generic message for the
/// empty case.
fn problem_message(problem: &ApiProblem) -> String {
    let message = problem.to_string();
    if message.is_empty() {
        GENERIC_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::config::ApiConfig;
    use crate::http::mock::MockTransport;

    const TOKEN_BODY: &str = r#"{
        "access_token": "T",
        "refresh_token": "R",
        "scope": "openid",
        "id_token": "I",
        "token_type": "Bearer",
        "expires_in": 3600
    }"#;

    fn client_with_mock() -> (ApiClient, MockTransport) {
        let transport = MockTransport::new();
        let config = ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(config, Box::new(transport.clone()));
        (client, transport)
    }

    #[test]
    fn login_success_stores_token_and_attaches_credential() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "hunter2");

        assert!(store.is_authenticated());
        assert_eq!(store.auth_token(), Some("T"));
        assert_eq!(api.bearer_token(), Some("T"));
        assert!(store.error().is_none());
    }

    #[test]
    fn login_problem_sets_error_and_leaves_session_unchanged() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(401, "");

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "wrong");

        assert!(!store.is_authenticated());
        assert_eq!(store.error(), Some("unauthorized"));
        assert_eq!(api.bearer_token(), None);
    }

    #[test]
    fn login_problem_does_not_clobber_an_existing_session() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);
        transport.push_response(500, "");

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "hunter2");
        store.login(&mut api, "jan@example.com", "hunter2");

        // Second attempt failed but the first session token survives.
        assert_eq!(store.auth_token(), Some("T"));
        assert!(store.error().is_some());
    }

    #[test]
    fn fetch_profile_replaces_wholesale_and_keeps_old_on_problem() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);
        transport.push_response(200, r#"{"data": {"userId": "usr-1", "firstName": "Ada"}}"#);
        transport.push_response(200, r#"{"data": {"userId": "usr-1"}}"#);
        transport.push_response(500, "");

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "hunter2");

        store.fetch_profile(&api);
        assert_eq!(
            store.profile().unwrap().first_name.as_deref(),
            Some("Ada")
        );

        // Replacement drops fields absent from the new payload.
        store.fetch_profile(&api);
        assert!(store.profile().unwrap().first_name.is_none());

        // A problem leaves the previous profile in place and sets the error.
        store.fetch_profile(&api);
        assert!(store.profile().is_some());
        assert_eq!(store.error(), Some("server error (status 500)"));
    }

    #[test]
    fn error_is_cleared_at_the_start_of_the_next_action() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(401, "");
        transport.push_response(200, TOKEN_BODY);

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "wrong");
        assert!(store.error().is_some());

        store.login(&mut api, "jan@example.com", "hunter2");
        assert!(store.error().is_none());
    }

    #[test]
    fn logout_clears_session_profile_and_client_credential() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);
        transport.push_response(200, r#"{"data": {"userId": "usr-1"}}"#);

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "hunter2");
        store.fetch_profile(&api);

        store.logout(&mut api);
        assert!(!store.is_authenticated());
        assert!(store.profile().is_none());
        assert_eq!(api.bearer_token(), None);

        // Idempotent.
        store.logout(&mut api);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn sync_credential_pushes_stored_token_into_the_client() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);

        let mut store = AuthenticationStore::new();
        store.login(&mut api, "jan@example.com", "hunter2");

        // A fresh client (e.g. after process restart) knows nothing.
        let (mut rehydrated_api, _) = client_with_mock();
        assert_eq!(rehydrated_api.bearer_token(), None);

        store.sync_credential(&mut rehydrated_api);
        assert_eq!(rehydrated_api.bearer_token(), Some("T"));
    }

    #[test]
    fn sync_credential_without_a_session_clears_the_client() {
        let (mut api, _) = client_with_mock();
        api.set_bearer_token("stale");

        let store = AuthenticationStore::new();
        store.sync_credential(&mut api);
        assert_eq!(api.bearer_token(), None);
    }

    #[test]
    fn listeners_are_notified_on_mutation() {
        let (mut api, transport) = client_with_mock();
        transport.push_response(200, TOKEN_BODY);

        let mut store = AuthenticationStore::new();
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);
        store.subscribe(move || seen.set(seen.get() + 1));

        store.login(&mut api, "jan@example.com", "hunter2");
        // Once for the error clear, once for the applied result.
        assert_eq!(calls.get(), 2);

        store.logout(&mut api);
        assert_eq!(calls.get(), 3);
    }
}
