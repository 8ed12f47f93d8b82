//! Client core for an invoicing backend: a typed API client plus the two
//! observable stores that screens bind to.
//!
//! # Overview
//! - `ApiClient` translates domain requests (login, profile, invoice list,
//!   invoice creation) into HTTP calls and normalizes every outcome into
//!   an `ApiResult`: the payload, or exactly one `ApiProblem` kind.
//! - `AuthenticationStore` owns the session token, profile, and visible
//!   auth error; `InvoiceStore` owns the invoice sequence. Store actions
//!   call the client and mutate their own state, notifying subscribed
//!   listeners.
//!
//! # Design
//! - The client is an explicitly constructed, explicitly passed dependency;
//!   there is no global instance.
//! - I/O happens behind the `Transport` trait (plain-data request/response
//!   values), so everything above it is testable without a network. A ureq
//!   transport is bundled.
//! - The client classifies and returns; the stores are the recovery
//!   boundary and the only layer that logs.

pub mod auth_store;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod invoice_store;
pub mod types;

pub use auth_store::AuthenticationStore;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiProblem, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use invoice_store::{FetchInvoicesParams, InvoiceStore};
pub use types::{
    Invoice, InvoiceListParams, InvoiceSubmission, LoginCredentials, Membership, Profile,
    TokenResponse,
};
