//! Document store port for per-user to-do collections.

use async_trait::async_trait;

use crate::domain::entities::{NewTodo, TodoId, TodoItem, UserId};
use crate::domain::errors::StoreError;

/// Collection path holding one user's items.
#[must_use]
pub fn collection_path(uid: &UserId) -> String {
    format!("users/{uid}/todo_items")
}

/// Port for the hosted document store.
#[async_trait]
pub trait TodoStorePort: Send + Sync {
    /// Lists every document in the user's collection, in backend order.
    async fn list(&self, uid: &UserId) -> Result<Vec<TodoItem>, StoreError>;

    /// Inserts a document and returns its provider-assigned id.
    async fn insert(&self, uid: &UserId, todo: &NewTodo) -> Result<TodoId, StoreError>;

    /// Deletes one document.
    async fn delete(&self, uid: &UserId, id: &TodoId) -> Result<(), StoreError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path() {
        assert_eq!(
            collection_path(&UserId::new("abc")),
            "users/abc/todo_items"
        );
    }
}
