//! Cloud Firestore REST adapter for to-do collections.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::{debug, warn};

use super::dto::{Document, ErrorResponse, ListDocumentsResponse};
use crate::domain::entities::{NewTodo, TodoId, TodoItem, UserId};
use crate::domain::errors::{AuthError, StoreError};
use crate::domain::ports::{AuthPort, TodoStorePort, collection_path};
use crate::infrastructure::config::FirebaseConfig;

const PAGE_SIZE: u32 = 300;

fn transport_error(e: &reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::network("request timed out")
    } else if e.is_connect() {
        StoreError::network("failed to connect to document store")
    } else {
        StoreError::network(e.to_string())
    }
}

fn auth_error(e: &AuthError) -> StoreError {
    if e.is_network_error() {
        StoreError::network(e.to_string())
    } else {
        StoreError::permission_denied(e.to_string())
    }
}

/// Appends one page of documents and returns the token of the next page.
fn absorb_page(
    items: &mut Vec<TodoItem>,
    page: ListDocumentsResponse,
) -> Result<Option<String>, StoreError> {
    for document in page.documents {
        items.push(document.into_todo_item()?);
    }
    Ok(page.next_page_token.filter(|token| !token.is_empty()))
}

fn classify_error(status: StatusCode, path: &str, message: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::permission_denied(message),
        StatusCode::NOT_FOUND => StoreError::not_found(path),
        StatusCode::TOO_MANY_REQUESTS => StoreError::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            StoreError::network("document store is temporarily unavailable")
        }
        _ => StoreError::unexpected(format!("unexpected response: {status} - {message}")),
    }
}

/// To-do store backed by `users/{uid}/todo_items` in Firestore.
pub struct FirestoreTodoStore {
    client: Client,
    documents_url: String,
    auth: Arc<dyn AuthPort>,
}

impl FirestoreTodoStore {
    /// Creates store for the configured project and database.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &FirebaseConfig, auth: Arc<dyn AuthPort>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!("oxitodo/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::unexpected(format!("failed to create HTTP client: {e}")))?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.firestore_endpoint.trim_end_matches('/'),
            config.project_id,
            config.database_id
        );

        Ok(Self {
            client,
            documents_url,
            auth,
        })
    }

    fn collection_url(&self, uid: &UserId) -> String {
        format!("{}/{}", self.documents_url, collection_path(uid))
    }

    fn document_url(&self, uid: &UserId, id: &TodoId) -> String {
        format!("{}/{id}", self.collection_url(uid))
    }

    async fn bearer(&self) -> Result<String, StoreError> {
        let token = self.auth.id_token().await.map_err(|e| {
            warn!(error = %e, "No usable id token for document store");
            auth_error(&e)
        })?;
        Ok(format!("Bearer {}", token.as_str()))
    }

    async fn check(response: reqwest::Response, path: &str) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.error.message,
            Err(_) => format!("HTTP {status}"),
        };
        warn!(status = %status, path, message = %message, "Document store returned an error");
        Err(classify_error(status, path, message))
    }
}

#[async_trait]
impl TodoStorePort for FirestoreTodoStore {
    async fn list(&self, uid: &UserId) -> Result<Vec<TodoItem>, StoreError> {
        let url = self.collection_url(uid);
        let path = collection_path(uid);
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(header::AUTHORIZATION, self.bearer().await?)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await.map_err(|e| transport_error(&e))?;
            let page: ListDocumentsResponse = Self::check(response, &path)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::unexpected(format!("failed to parse response: {e}")))?;

            page_token = absorb_page(&mut items, page)?;
            if page_token.is_none() {
                break;
            }
        }

        debug!(path = %path, count = items.len(), "Listed documents");
        Ok(items)
    }

    async fn insert(&self, uid: &UserId, todo: &NewTodo) -> Result<TodoId, StoreError> {
        let path = collection_path(uid);

        let response = self
            .client
            .post(self.collection_url(uid))
            .header(header::AUTHORIZATION, self.bearer().await?)
            .json(&Document::from_new_todo(todo))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let created: Document = Self::check(response, &path)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::unexpected(format!("failed to parse response: {e}")))?;

        let id = created
            .id()
            .map(TodoId::new)
            .ok_or_else(|| StoreError::malformed(&created.name, "missing document id"))?;

        debug!(path = %path, id = %id, "Inserted document");
        Ok(id)
    }

    async fn delete(&self, uid: &UserId, id: &TodoId) -> Result<(), StoreError> {
        let path = format!("{}/{id}", collection_path(uid));

        let response = self
            .client
            .delete(self.document_url(uid, id))
            .header(header::AUTHORIZATION, self.bearer().await?)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        Self::check(response, &path).await?;
        debug!(path = %path, "Deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockAuthPort;

    fn store() -> FirestoreTodoStore {
        let config = FirebaseConfig {
            api_key: "test-key".to_string(),
            project_id: "demo".to_string(),
            ..FirebaseConfig::default()
        };
        FirestoreTodoStore::new(&config, Arc::new(MockAuthPort::new(true))).unwrap()
    }

    #[test]
    fn test_collection_and_document_urls() {
        let store = store();
        let uid = UserId::new("u1");

        assert_eq!(
            store.collection_url(&uid),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/users/u1/todo_items"
        );
        assert_eq!(
            store.document_url(&uid, &TodoId::new("AbC")),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/users/u1/todo_items/AbC"
        );
    }

    fn page(body: &str) -> ListDocumentsResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_pages_accumulate_in_order() {
        let first = page(
            r#"{
                "documents": [{
                    "name": "projects/demo/databases/(default)/documents/users/u1/todo_items/a",
                    "fields": {
                        "text": { "stringValue": "Walk dog" },
                        "status": { "stringValue": "active" }
                    }
                }],
                "nextPageToken": "page-2"
            }"#,
        );
        let last = page(
            r#"{
                "documents": [{
                    "name": "projects/demo/databases/(default)/documents/users/u1/todo_items/b",
                    "fields": {
                        "text": { "stringValue": "Buy milk" },
                        "status": { "stringValue": "active" }
                    }
                }],
                "nextPageToken": ""
            }"#,
        );
        let mut items = Vec::new();

        let next = absorb_page(&mut items, first).unwrap();
        assert_eq!(next.as_deref(), Some("page-2"));

        let next = absorb_page(&mut items, last).unwrap();
        assert!(next.is_none());

        let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(items[1].text(), "Buy milk");
    }

    #[test]
    fn test_empty_page_ends_listing() {
        let mut items = Vec::new();
        assert!(absorb_page(&mut items, page("{}")).unwrap().is_none());
        assert!(items.is_empty());
    }

    #[test]
    fn test_malformed_document_fails_the_page() {
        let bad = page(
            r#"{
                "documents": [{
                    "name": "projects/demo/databases/(default)/documents/users/u1/todo_items/a",
                    "fields": { "text": { "integerValue": "7" } }
                }],
                "nextPageToken": "page-2"
            }"#,
        );
        let mut items = Vec::new();
        assert!(absorb_page(&mut items, bad).is_err());
    }

    #[test]
    fn test_classify_error_statuses() {
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, "p", "denied".to_string()),
            StoreError::PermissionDenied { .. }
        ));
        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, "p", String::new()),
            StoreError::NotFound { .. }
        ));
        assert!(classify_error(StatusCode::TOO_MANY_REQUESTS, "p", String::new()).is_network_error());
    }

    #[tokio::test]
    async fn test_signed_out_requests_fail_before_network() {
        let store = store();
        let result = store.list(&UserId::new("u1")).await;
        assert!(matches!(result, Err(StoreError::PermissionDenied { .. })));
    }
}
