//! Invoice list state.
//!
//! # Design
//! Same explicit state-container shape as the authentication store, with a
//! deliberately different failure policy: a failed list fetch keeps the
//! previous invoices visible and only emits a diagnostic — there is no
//! user-facing error field here. Stale-but-available over
//! empty-but-correct.

use crate::client::ApiClient;
use crate::types::{Invoice, InvoiceListParams, InvoiceSubmission};

type Listener = Box<dyn Fn()>;

// Fixed list policy; only paging is caller-controlled.
const DATE_TYPE: &str = "INVOICE_DATE";
const SORT_BY: &str = "CREATED_DATE";
const ORDERING: &str = "ASCENDING";

/// Paging for a list fetch, scoped to one organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInvoicesParams {
    pub page_size: u32,
    pub page_num: u32,
    pub org_token: String,
}

impl FetchInvoicesParams {
    /// First page of ten, the default the screens ask for.
    pub fn new(org_token: impl Into<String>) -> Self {
        Self {
            page_size: 10,
            page_num: 1,
            org_token: org_token.into(),
        }
    }
}

/// Holds the fetched invoice sequence in server order.
#[derive(Default)]
pub struct InvoiceStore {
    invoices: Vec<Invoice>,
    listeners: Vec<Listener>,
}

impl InvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener, invoked after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener();
        }
    }

    /// Current invoice sequence, insertion order = server response order.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Fetch one page of invoices and replace the sequence wholesale.
    ///
    /// A problem result leaves the previous sequence untouched; it is
    /// logged but not surfaced.
    pub fn fetch_invoices(&mut self, api: &ApiClient, params: &FetchInvoicesParams) {
        let list_params = InvoiceListParams {
            page_num: params.page_num,
            page_size: params.page_size,
            date_type: DATE_TYPE.to_string(),
            sort_by: SORT_BY.to_string(),
            ordering: ORDERING.to_string(),
        };
        match api.list_invoices(&list_params, &params.org_token) {
            Ok(invoices) => {
                self.invoices = invoices;
                self.notify();
            }
            Err(problem) => {
                tracing::error!(%problem, "invoice list fetch failed");
            }
        }
    }

    /// Submit new invoices. Returns `None` on success and a fixed error
    /// string on any problem. The stored sequence is never touched;
    /// callers re-fetch to see the result.
    pub fn add_invoice(
        &self,
        api: &ApiClient,
        submission: &InvoiceSubmission,
        org_token: &str,
    ) -> Option<&'static str> {
        match api.create_invoice(submission, org_token) {
            Ok(()) => None,
            Err(problem) => {
                tracing::error!(%problem, "invoice creation failed");
                Some("Error while adding invoice")
            }
        }
    }
}
