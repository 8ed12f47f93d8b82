//! Domain DTOs for the invoicing API.
//!
//! # Design
//! These types mirror the backend's wire schema (camelCase field names,
//! `{data: ...}` envelopes unwrapped by the client) but are defined
//! independently from the mock-server crate; integration tests catch
//! schema drift. Collections the client never inspects stay as opaque
//! `serde_json::Value` records.

use serde::{Deserialize, Serialize};

/// Username/password pair for the token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Payload of a successful `POST /token` exchange. Not enveloped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub id_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// One organisation membership on a profile. `token` scopes invoice
/// requests to that organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub organisation_name: Option<String>,
}

/// The authenticated user's identity record.
///
/// Replaced wholesale on every successful fetch; the client never merges
/// partial profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub password_expired: bool,
    #[serde(default)]
    pub contacts: Vec<serde_json::Value>,
    #[serde(default)]
    pub addresses: Vec<serde_json::Value>,
    #[serde(default)]
    pub employment_details: Vec<serde_json::Value>,
    #[serde(default)]
    pub permissions: Vec<serde_json::Value>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

/// A single invoice as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Query parameters for the invoice list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceListParams {
    pub page_num: u32,
    pub page_size: u32,
    pub date_type: String,
    pub sort_by: String,
    pub ordering: String,
}

/// Body of an invoice creation request: `{listOfInvoices: [...]}`.
///
/// Entries are opaque records; the client forwards whatever the caller
/// assembled without validating it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSubmission {
    #[serde(rename = "listOfInvoices")]
    pub list_of_invoices: Vec<serde_json::Value>,
}
