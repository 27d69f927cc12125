//! Wire structures for the Identity Toolkit, Secure Token and Firestore REST APIs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{NewTodo, TodoItem, TodoStatus};
use crate::domain::errors::StoreError;

/// `accounts:signInWithPassword` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithPasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// `accounts:signInWithPassword` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithPasswordResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds, sent as a string.
    pub expires_in: String,
}

/// Secure Token `token` response body (snake case on the wire).
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

/// `accounts:lookup` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest<'a> {
    pub id_token: &'a str,
}

/// `accounts:lookup` response body.
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUser {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Google API error envelope shared by all three services.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Parses `expiresIn`, falling back to one hour.
#[must_use]
pub fn parse_expires_in(value: &str) -> i64 {
    const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
    value.trim().parse().unwrap_or(DEFAULT_EXPIRES_IN_SECS)
}

/// Typed Firestore value as encoded by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    BooleanValue(bool),
    /// 64-bit integer, sent as a string.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(serde_json::Value),
    MapValue(serde_json::Value),
}

impl FirestoreValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(value) => Some(value),
            _ => None,
        }
    }
}

/// A Firestore document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
    #[serde(default, skip_serializing)]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing)]
    pub update_time: Option<String>,
}

impl Document {
    const TEXT_FIELD: &'static str = "text";
    const STATUS_FIELD: &'static str = "status";

    /// Last path segment of the resource name.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|id| !id.is_empty())
    }

    /// Encodes an insert payload.
    #[must_use]
    pub fn from_new_todo(todo: &NewTodo) -> Self {
        let mut fields = HashMap::new();
        fields.insert(
            Self::TEXT_FIELD.to_string(),
            FirestoreValue::StringValue(todo.text.clone()),
        );
        fields.insert(
            Self::STATUS_FIELD.to_string(),
            FirestoreValue::StringValue(todo.status.as_str().to_string()),
        );
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Decodes a stored item. Missing `text` reads as empty, missing `status` as active.
    ///
    /// # Errors
    /// Returns `MalformedDocument` if the name has no id or a field has the wrong type.
    pub fn into_todo_item(self) -> Result<TodoItem, StoreError> {
        let id = self
            .id()
            .ok_or_else(|| StoreError::malformed(&self.name, "missing document id"))?
            .to_string();

        let text = match self.fields.get(Self::TEXT_FIELD) {
            None => String::new(),
            Some(value) => value
                .as_str()
                .ok_or_else(|| StoreError::malformed(&self.name, "`text` is not a string"))?
                .to_string(),
        };

        let status = match self.fields.get(Self::STATUS_FIELD) {
            None => TodoStatus::Active,
            Some(value) => value
                .as_str()
                .map(TodoStatus::from)
                .ok_or_else(|| StoreError::malformed(&self.name, "`status` is not a string"))?,
        };

        let item = TodoItem::new(id, text, status);
        let created_at = self
            .create_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc));

        Ok(match created_at {
            Some(at) => item.with_created_at(at),
            None => item,
        })
    }
}

/// `documents.list` response body. An empty collection comes back as `{}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const LIST_BODY: &str = r#"{
        "documents": [
            {
                "name": "projects/demo/databases/(default)/documents/users/u1/todo_items/AbC123",
                "fields": {
                    "text": { "stringValue": "Buy milk" },
                    "status": { "stringValue": "active" }
                },
                "createTime": "2024-03-01T10:15:30.123456Z",
                "updateTime": "2024-03-01T10:15:30.123456Z"
            },
            {
                "name": "projects/demo/databases/(default)/documents/users/u1/todo_items/XyZ",
                "fields": {
                    "text": { "stringValue": "Walk dog" },
                    "status": { "stringValue": "archived" },
                    "priority": { "integerValue": "2" },
                    "tags": { "arrayValue": { "values": [] } },
                    "note": { "nullValue": null }
                }
            }
        ],
        "nextPageToken": "page-2"
    }"#;

    #[test]
    fn test_parse_list_response() {
        let response: ListDocumentsResponse = serde_json::from_str(LIST_BODY).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("page-2"));

        let items: Vec<TodoItem> = response
            .documents
            .into_iter()
            .map(|doc| doc.into_todo_item().unwrap())
            .collect();

        assert_eq!(items[0].id().as_str(), "AbC123");
        assert_eq!(items[0].text(), "Buy milk");
        assert_eq!(items[0].status(), &TodoStatus::Active);
        assert_eq!(items[0].created_at().map(|at| at.year()), Some(2024));

        assert_eq!(items[1].id().as_str(), "XyZ");
        assert_eq!(items[1].status().as_str(), "archived");
        assert!(items[1].created_at().is_none());
    }

    #[test]
    fn test_empty_collection_body() {
        let response: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.documents.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_encode_new_todo() {
        let body = serde_json::to_value(Document::from_new_todo(&NewTodo::active("Buy milk")))
            .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "fields": {
                    "text": { "stringValue": "Buy milk" },
                    "status": { "stringValue": "active" }
                }
            })
        );
    }

    #[test]
    fn test_non_string_text_is_malformed() {
        let doc: Document = serde_json::from_str(
            r#"{"name": "projects/p/databases/(default)/documents/users/u/todo_items/a",
                "fields": {"text": {"integerValue": "5"}}}"#,
        )
        .unwrap();

        assert!(matches!(
            doc.into_todo_item(),
            Err(StoreError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let doc: Document = serde_json::from_str(
            r#"{"name": "projects/p/databases/(default)/documents/users/u/todo_items/a"}"#,
        )
        .unwrap();

        let item = doc.into_todo_item().unwrap();
        assert_eq!(item.text(), "");
        assert_eq!(item.status(), &TodoStatus::Active);
    }

    #[test]
    fn test_parse_auth_payloads() {
        let sign_in: SignInWithPasswordResponse = serde_json::from_str(
            r#"{"kind": "identitytoolkit#VerifyPasswordResponse", "localId": "u1",
                "email": "ada@example.com", "idToken": "id", "registered": true,
                "refreshToken": "refresh", "expiresIn": "3600"}"#,
        )
        .unwrap();
        assert_eq!(sign_in.local_id, "u1");
        assert_eq!(parse_expires_in(&sign_in.expires_in), 3600);

        let refresh: RefreshTokenResponse = serde_json::from_str(
            r#"{"expires_in": "1800", "token_type": "Bearer", "refresh_token": "r2",
                "id_token": "id2", "user_id": "u1", "project_id": "42"}"#,
        )
        .unwrap();
        assert_eq!(refresh.user_id, "u1");
        assert_eq!(parse_expires_in(&refresh.expires_in), 1800);
        assert_eq!(parse_expires_in("garbage"), 3600);
    }

    #[test]
    fn test_parse_error_envelope() {
        let error: ErrorResponse = serde_json::from_str(
            r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.",
                "status": "PERMISSION_DENIED"}}"#,
        )
        .unwrap();
        assert_eq!(error.error.code, 403);
        assert_eq!(error.error.status.as_deref(), Some("PERMISSION_DENIED"));
    }
}
