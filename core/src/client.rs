//! Typed client for the invoicing backend.
//!
//! # Design
//! `ApiClient` owns the configuration, the bearer credential, and an
//! injected `Transport`. Each method builds one `HttpRequest`, executes it,
//! and normalizes the outcome through the same three steps: transport
//! failures become `Timeout`/`CannotConnect`, non-2xx statuses are
//! classified by code, and only then is the payload extracted (failures
//! there are `BadData`). The client never retries, never logs, and never
//! leaks a raw status or transport error to callers.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::form_urlencoded;

use crate::config::ApiConfig;
use crate::error::{ApiProblem, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Invoice, InvoiceListParams, InvoiceSubmission, LoginCredentials, Profile, TokenResponse};

/// Most responses wrap their payload in `{"data": ...}`; the token
/// exchange is the exception.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Client for the invoicing API.
///
/// Construct one per process and pass it explicitly to the stores; the
/// bearer credential set after login is the only mutable state it holds.
pub struct ApiClient {
    config: ApiConfig,
    bearer_token: Option<String>,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, transport: Box<dyn Transport>) -> Self {
        let config = ApiConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };
        Self {
            config,
            bearer_token: None,
            transport,
        }
    }

    /// Construct with the bundled ureq transport, using the configured
    /// timeout.
    pub fn with_default_transport(config: ApiConfig) -> Self {
        let transport = UreqTransport::new(config.timeout_ms);
        Self::new(config, Box::new(transport))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Set the credential attached to subsequent requests. An empty string
    /// removes it. No network effect.
    pub fn set_bearer_token(&mut self, token: &str) {
        self.bearer_token = if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        };
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Exchange a username/password for tokens via `POST /token`.
    ///
    /// Grant type and scope are fixed; client id/secret come from the
    /// configuration. The body is form-encoded and the response is not
    /// enveloped.
    pub fn login(&self, credentials: &LoginCredentials) -> ApiResult<TokenResponse> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &credentials.username)
            .append_pair("password", &credentials.password)
            .append_pair("grant_type", "password")
            .append_pair("scope", "openid")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .finish();

        let mut headers = self.base_headers();
        headers.push((
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        ));

        let response = self.perform(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/token", self.config.base_url),
            headers,
            body: Some(body),
        })?;

        serde_json::from_str(&response.body).map_err(|_| ApiProblem::BadData)
    }

    /// Fetch the authenticated user's profile.
    ///
    /// The bearer token is attached when present but never pre-validated;
    /// with no token set the backend decides the outcome (normally 401).
    pub fn fetch_profile(&self) -> ApiResult<Profile> {
        let response = self.perform(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/membership-service/1.2.0/users/me", self.config.base_url),
            headers: self.base_headers(),
            body: None,
        })?;

        unwrap_envelope(&response)
    }

    /// List invoices for the organisation identified by `org_token`,
    /// preserving server order.
    pub fn list_invoices(
        &self,
        params: &InvoiceListParams,
        org_token: &str,
    ) -> ApiResult<Vec<Invoice>> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("pageNum", &params.page_num.to_string())
            .append_pair("pageSize", &params.page_size.to_string())
            .append_pair("dateType", &params.date_type)
            .append_pair("sortBy", &params.sort_by)
            .append_pair("ordering", &params.ordering)
            .finish();

        let mut headers = self.base_headers();
        headers.push(("org-token".to_string(), org_token.to_string()));

        let response = self.perform(HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/invoice-service/1.0.0/invoices?{query}",
                self.config.base_url
            ),
            headers,
            body: None,
        })?;

        unwrap_envelope(&response)
    }

    /// Submit invoices synchronously. Callers only care about success, but
    /// the response must still carry a well-formed envelope.
    pub fn create_invoice(
        &self,
        submission: &InvoiceSubmission,
        org_token: &str,
    ) -> ApiResult<()> {
        let body = serde_json::to_string(submission).map_err(|_| ApiProblem::BadData)?;

        let mut headers = self.base_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        headers.push(("org-token".to_string(), org_token.to_string()));
        headers.push(("operation".to_string(), "SYNC".to_string()));

        let response = self.perform(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/invoice-service/2.0.0/invoices", self.config.base_url),
            headers,
            body: Some(body),
        })?;

        unwrap_envelope::<serde_json::Value>(&response).map(|_| ())
    }

    /// Execute a request and classify everything short of a success
    /// payload: transport failures first, then non-2xx statuses.
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse, ApiProblem> {
        let response = self.transport.execute(&request)?;
        if !(200..300).contains(&response.status) {
            return Err(ApiProblem::from_status(response.status));
        }
        Ok(response)
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if let Some(token) = &self.bearer_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

fn unwrap_envelope<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<T> {
    serde_json::from_str::<Envelope<T>>(&response.body)
        .map(|envelope| envelope.data)
        .map_err(|_| ApiProblem::BadData)
}
