//! In-memory implementation of the invoicing backend contract, used by the
//! core crate's integration tests and runnable standalone.
//!
//! One demo credential pair exists; a successful token exchange mints a
//! bearer token that the authenticated routes accept. Invoice routes
//! additionally require the `org-token` scoping header, and creation
//! requires `Operation: SYNC`. Successful payloads are wrapped in a
//! `{"data": ...}` envelope, except the token exchange.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEMO_USERNAME: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "demo-password";
pub const ORG_TOKEN: &str = "org-5f4d3c2b";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    pub grant_type: String,
}

#[derive(Deserialize)]
pub struct InvoiceSubmission {
    #[serde(rename = "listOfInvoices")]
    pub list_of_invoices: Vec<Value>,
}

fn default_page_num() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default = "default_page_num")]
    pub page_num: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Default)]
pub struct ServerState {
    pub tokens: HashSet<String>,
    pub invoices: Vec<Invoice>,
}

pub type Db = Arc<RwLock<ServerState>>;

pub fn app() -> Router {
    let db = Db::default();
    Router::new()
        .route("/token", post(issue_token))
        .route("/membership-service/1.2.0/users/me", get(get_profile))
        .route("/invoice-service/1.0.0/invoices", get(list_invoices))
        .route("/invoice-service/2.0.0/invoices", post(create_invoices))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn issue_token(
    State(db): State<Db>,
    Form(input): Form<TokenRequest>,
) -> Result<Json<Value>, StatusCode> {
    if input.grant_type != "password" {
        return Err(StatusCode::BAD_REQUEST);
    }
    if input.username != DEMO_USERNAME || input.password != DEMO_PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let access_token = Uuid::new_v4().to_string();
    db.write().await.tokens.insert(access_token.clone());

    Ok(Json(json!({
        "access_token": access_token,
        "refresh_token": Uuid::new_v4().to_string(),
        "scope": "openid",
        "id_token": Uuid::new_v4().to_string(),
        "token_type": "Bearer",
        "expires_in": 3600,
    })))
}

async fn get_profile(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers).await?;

    Ok(Json(json!({
        "data": {
            "userId": "usr-0001",
            "userName": DEMO_USERNAME,
            "firstName": "Demo",
            "lastName": "User",
            "email": DEMO_USERNAME,
            "status": "ACTIVE",
            "passwordExpired": false,
            "contacts": [],
            "addresses": [],
            "employmentDetails": [],
            "permissions": [],
            "memberships": [
                {"token": ORG_TOKEN, "organisationName": "Demo Organisation"}
            ],
        }
    })))
}

async fn list_invoices(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers).await?;
    org_token(&headers)?;

    let db = db.read().await;
    let start = params.page_num.saturating_sub(1) * params.page_size;
    let page: Vec<Invoice> = db
        .invoices
        .iter()
        .skip(start)
        .take(params.page_size)
        .cloned()
        .collect();

    Ok(Json(json!({ "data": page })))
}

async fn create_invoices(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<InvoiceSubmission>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    authorize(&db, &headers).await?;
    org_token(&headers)?;
    let operation = headers
        .get("operation")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    if operation != "SYNC" {
        return Err(StatusCode::BAD_REQUEST);
    }

    let created: Vec<Invoice> = input
        .list_of_invoices
        .iter()
        .map(|entry| Invoice {
            id: Some(Uuid::new_v4().to_string()),
            title: entry.get("title").and_then(Value::as_str).map(str::to_string),
        })
        .collect();

    db.write().await.invoices.extend(created.iter().cloned());

    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if db.read().await.tokens.contains(token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn org_token(headers: &HeaderMap) -> Result<&str, StatusCode> {
    headers
        .get("org-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_serializes_with_nullable_fields() {
        let invoice = Invoice {
            id: Some("1".to_string()),
            title: None,
        };
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["title"], Value::Null);
    }

    #[test]
    fn token_request_ignores_extra_form_fields() {
        // The client also sends scope/client_id/client_secret; serde must
        // accept and drop them.
        let input: TokenRequest = serde_json::from_str(
            r#"{
                "username": "demo@example.com",
                "password": "pw",
                "grant_type": "password",
                "scope": "openid",
                "client_id": "c",
                "client_secret": "s"
            }"#,
        )
        .unwrap();
        assert_eq!(input.username, "demo@example.com");
        assert_eq!(input.grant_type, "password");
    }

    #[test]
    fn list_params_default_to_first_page_of_ten() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page_num, 1);
        assert_eq!(params.page_size, 10);
    }

    #[test]
    fn submission_requires_list_of_invoices() {
        let ok: InvoiceSubmission =
            serde_json::from_str(r#"{"listOfInvoices": [{"title": "A"}]}"#).unwrap();
        assert_eq!(ok.list_of_invoices.len(), 1);

        let missing: Result<InvoiceSubmission, _> = serde_json::from_str("{}");
        assert!(missing.is_err());
    }
}
