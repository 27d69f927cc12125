//! View controller for the to-do list.
//!
//! Holds the local view state (signed-in user, last fetched snapshot, form
//! draft) and wires auth changes, form submission and deletion to the ports.
//! The item list is only ever replaced wholesale by a fetch. Every add or
//! delete is followed by a full re-fetch, never by a local edit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NewTodo, TodoId, TodoItem, User, UserId};
use crate::domain::errors::TodoError;
use crate::domain::ports::{AuthPort, LANDING_ROUTE, NavigatorPort, TodoStorePort};

/// Local view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListState {
    pub user: Option<User>,
    pub items: Vec<TodoItem>,
    pub draft: String,
}

pub struct TodoListController {
    store: Arc<dyn TodoStorePort>,
    navigator: Arc<dyn NavigatorPort>,
    state: watch::Sender<TodoListState>,
    torn_down: AtomicBool,
}

impl TodoListController {
    #[must_use]
    pub fn new(store: Arc<dyn TodoStorePort>, navigator: Arc<dyn NavigatorPort>) -> Self {
        let (state, _) = watch::channel(TodoListState::default());
        Self {
            store,
            navigator,
            state,
            torn_down: AtomicBool::new(false),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> TodoListState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<TodoItem> {
        self.state.borrow().items.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn draft(&self) -> String {
        self.state.borrow().draft.clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<TodoListState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.draft == text {
                false
            } else {
                state.draft = text;
                true
            }
        });
    }

    /// Subscribes to auth changes for the lifetime of the returned handle.
    #[must_use]
    pub fn mount(self: &Arc<Self>, auth: &dyn AuthPort) -> MountHandle {
        self.torn_down.store(false, Ordering::SeqCst);

        let mut subscription = auth.subscribe();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let controller = Arc::clone(self);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = &mut stop_rx => break,

                    next = subscription.next() => match next {
                        // A pending fetch must not hold up unmount.
                        Some(user) => tokio::select! {
                            biased;

                            _ = &mut stop_rx => break,
                            () = controller.handle_auth_change(user) => {}
                        },
                        None => {
                            debug!("Auth state stream closed");
                            break;
                        }
                    },
                }
            }
            subscription.unsubscribe();
        });

        debug!("Todo list mounted");

        MountHandle {
            controller: Arc::clone(self),
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Applies an auth-state change.
    pub async fn handle_auth_change(&self, user: Option<User>) {
        if self.is_torn_down() {
            return;
        }

        self.state.send_modify(|state| state.user.clone_from(&user));

        match user {
            Some(user) => {
                info!(uid = %user.uid(), "User signed in");
                let _ = self.fetch_all(user.uid()).await;
            }
            None => {
                info!("User signed out, clearing todo list");
                self.navigator.navigate(LANDING_ROUTE);
                self.state.send_modify(|state| state.items.clear());
            }
        }
    }

    /// Replaces the item list with the user's full remote collection.
    ///
    /// # Errors
    /// Returns the store error; the list is left untouched on failure.
    pub async fn fetch_all(&self, uid: &UserId) -> Result<usize, TodoError> {
        let items = self.store.list(uid).await.map_err(|e| {
            error!(uid = %uid, error = %e, "Error fetching todo items");
            TodoError::from(e)
        })?;

        let count = items.len();
        debug!(uid = %uid, count, "Fetched todo items");

        if self.is_torn_down() {
            debug!("Dropping snapshot received after unmount");
        } else {
            self.state.send_modify(|state| state.items = items);
        }

        Ok(count)
    }

    /// Inserts the current draft as a new active item.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a user, or the store error. The
    /// draft and list are left as they were on failure.
    pub async fn submit(&self) -> Result<TodoId, TodoError> {
        let (user, text) = {
            let state = self.state.borrow();
            (state.user.clone(), state.draft.clone())
        };

        let Some(user) = user else {
            error!("User not authenticated");
            return Err(TodoError::NotAuthenticated);
        };

        let id = self
            .store
            .insert(user.uid(), &NewTodo::active(text))
            .await
            .map_err(|e| {
                error!(error = %e, "Error adding document");
                TodoError::from(e)
            })?;

        // The follow-up fetch logs its own failure; the insert already landed.
        let _ = self.fetch_all(user.uid()).await;
        if !self.is_torn_down() {
            self.state.send_modify(|state| state.draft.clear());
        }

        info!(id = %id, "Document written");
        Ok(id)
    }

    /// Deletes one item and re-fetches the list.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` without a user, or the store error.
    pub async fn delete_item(&self, id: &TodoId) -> Result<(), TodoError> {
        let Some(user) = self.user() else {
            error!("User not authenticated");
            return Err(TodoError::NotAuthenticated);
        };

        self.store.delete(user.uid(), id).await.map_err(|e| {
            error!(id = %id, error = %e, "Error deleting document");
            TodoError::from(e)
        })?;

        let _ = self.fetch_all(user.uid()).await;
        info!(id = %id, "Document deleted");
        Ok(())
    }

    fn tear_down(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

/// Keeps the auth subscription of a mounted controller alive.
pub struct MountHandle {
    controller: Arc<TodoListController>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MountHandle {
    /// Cancels the auth subscription and waits for it to finish.
    ///
    /// A fetch still in flight is abandoned rather than awaited. No state
    /// change happens once this returns.
    pub async fn unmount(mut self) {
        self.controller.tear_down();
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Auth subscription task failed");
            }
        }
        debug!("Todo list unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.controller.tear_down();
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use crate::domain::entities::TodoStatus;
    use crate::domain::errors::StoreError;
    use crate::domain::ports::mocks::{MockAuthPort, MockNavigatorPort, MockTodoStore};

    /// Store whose requests never complete.
    struct HangingStore;

    #[async_trait]
    impl TodoStorePort for HangingStore {
        async fn list(&self, _uid: &UserId) -> Result<Vec<TodoItem>, StoreError> {
            std::future::pending().await
        }

        async fn insert(&self, _uid: &UserId, _todo: &NewTodo) -> Result<TodoId, StoreError> {
            std::future::pending().await
        }

        async fn delete(&self, _uid: &UserId, _id: &TodoId) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    fn user() -> User {
        User::new("uid-123", Some("tester@example.com".to_string()))
    }

    fn quiet_navigator() -> Arc<MockNavigatorPort> {
        let mut navigator = MockNavigatorPort::new();
        navigator.expect_navigate().never();
        Arc::new(navigator)
    }

    fn any_navigator() -> Arc<MockNavigatorPort> {
        let mut navigator = MockNavigatorPort::new();
        navigator.expect_navigate().return_const(());
        Arc::new(navigator)
    }

    fn controller_with(store: Arc<MockTodoStore>) -> TodoListController {
        TodoListController::new(store, quiet_navigator())
    }

    async fn signed_in(store: Arc<MockTodoStore>) -> TodoListController {
        let controller = controller_with(store);
        controller.handle_auth_change(Some(user())).await;
        controller
    }

    async fn wait_for<F>(rx: &mut watch::Receiver<TodoListState>, predicate: F)
    where
        F: Fn(&TodoListState) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|state| predicate(state)))
            .await
            .expect("state did not change in time")
            .expect("controller dropped");
    }

    #[tokio::test]
    async fn test_empty_collection_fetches_empty_list() {
        let store = Arc::new(MockTodoStore::new());
        let controller = signed_in(store.clone()).await;

        assert!(controller.items().is_empty());
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_add_buy_milk() {
        let store = Arc::new(MockTodoStore::new());
        let controller = signed_in(store.clone()).await;

        controller.set_draft("Buy milk");
        let id = assert_ok!(controller.submit().await);

        let items = controller.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), &id);
        assert_eq!(items[0].text(), "Buy milk");
        assert_eq!(items[0].status(), &TodoStatus::Active);
        assert_eq!(items, store.items(user().uid()));
        assert!(controller.draft().is_empty());
    }

    #[tokio::test]
    async fn test_add_appends_exactly_one_item() {
        let existing = vec![TodoItem::new("a", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), existing));
        let controller = signed_in(store.clone()).await;

        controller.set_draft("Buy milk");
        assert_ok!(controller.submit().await);

        let items = controller.items();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items.iter().filter(|item| item.text() == "Buy milk").count(),
            1
        );
        assert_eq!(items, store.items(user().uid()));
    }

    #[tokio::test]
    async fn test_delete_first_of_two() {
        let seeded = vec![
            TodoItem::new("first", "Walk dog", TodoStatus::Active),
            TodoItem::new("second", "Buy milk", TodoStatus::Active),
        ];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = signed_in(store).await;
        assert_eq!(controller.items().len(), 2);

        assert_ok!(controller.delete_item(&TodoId::new("first")).await);

        let items = controller.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id().as_str(), "second");
    }

    #[tokio::test]
    async fn test_unauthenticated_add_and_delete_are_noops() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = controller_with(store.clone());
        controller.set_draft("Buy milk");
        let before = controller.state();

        let err = assert_err!(controller.submit().await);
        assert!(err.is_not_authenticated());
        let err = assert_err!(controller.delete_item(&TodoId::new("first")).await);
        assert!(err.is_not_authenticated());

        assert_eq!(controller.state(), before);
        assert_eq!(store.items(user().uid()).len(), 1);
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_add_keeps_draft_and_list() {
        let store = Arc::new(MockTodoStore::new());
        let controller = signed_in(store.clone()).await;
        store.set_fail_insert(true);

        controller.set_draft("Buy milk");
        assert!(matches!(
            controller.submit().await,
            Err(TodoError::Store(_))
        ));

        assert_eq!(controller.draft(), "Buy milk");
        assert!(controller.items().is_empty());
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_insert_ok_fetch_fails_clears_draft() {
        let store = Arc::new(MockTodoStore::new());
        let controller = signed_in(store.clone()).await;
        store.set_fail_list(true);

        controller.set_draft("Buy milk");
        let id = assert_ok!(controller.submit().await);

        assert!(controller.draft().is_empty());
        assert!(controller.items().is_empty());
        let stored = store.items(user().uid());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), &id);
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_list() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = signed_in(store.clone()).await;
        store.set_fail_delete(true);

        assert_err!(controller.delete_item(&TodoId::new("first")).await);
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_error_and_keeps_list() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = signed_in(store.clone()).await;
        store.set_fail_list(true);

        assert_err!(controller.fetch_all(user().uid()).await);
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_clears_list_and_navigates_to_landing() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let mut navigator = MockNavigatorPort::new();
        navigator
            .expect_navigate()
            .withf(|path| path == "/")
            .times(1)
            .return_const(());
        let controller = TodoListController::new(store, Arc::new(navigator));

        controller.handle_auth_change(Some(user())).await;
        assert_eq!(controller.items().len(), 1);

        controller.handle_auth_change(None).await;
        assert!(controller.items().is_empty());
        assert!(controller.user().is_none());
    }

    #[tokio::test]
    async fn test_mount_follows_auth_changes() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = Arc::new(TodoListController::new(store, any_navigator()));
        let auth = MockAuthPort::new(true);
        let mut rx = controller.watch();

        let handle = controller.mount(&auth);
        assert_eq!(auth.subscriber_count(), 1);

        auth.set_user(Some(user()));
        wait_for(&mut rx, |state| state.items.len() == 1).await;

        auth.set_user(None);
        wait_for(&mut rx, |state| state.user.is_none() && state.items.is_empty()).await;

        handle.unmount().await;
        assert_eq!(auth.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_no_auth_updates_after_unmount() {
        let store = Arc::new(MockTodoStore::new());
        let controller = Arc::new(TodoListController::new(store.clone(), any_navigator()));
        let auth = MockAuthPort::new(true);

        let handle = controller.mount(&auth);
        handle.unmount().await;

        auth.set_user(Some(user()));
        tokio::task::yield_now().await;

        assert!(controller.user().is_none());
        assert_eq!(store.list_calls(), 0);

        controller.handle_auth_change(Some(user())).await;
        assert!(controller.user().is_none());
    }

    #[tokio::test]
    async fn test_unmount_does_not_wait_for_pending_fetch() {
        let controller = Arc::new(TodoListController::new(
            Arc::new(HangingStore),
            any_navigator(),
        ));
        let auth = MockAuthPort::new(true);
        let mut rx = controller.watch();

        let handle = controller.mount(&auth);
        auth.set_user(Some(user()));
        wait_for(&mut rx, |state| state.user.is_some()).await;

        tokio::time::timeout(Duration::from_secs(2), handle.unmount())
            .await
            .expect("unmount waited on the pending fetch");
        assert_eq!(auth.subscriber_count(), 0);
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_after_unmount_is_dropped() {
        let seeded = vec![TodoItem::new("first", "Walk dog", TodoStatus::Active)];
        let store = Arc::new(MockTodoStore::new().with_items(user().uid(), seeded));
        let controller = Arc::new(TodoListController::new(store, any_navigator()));
        let auth = MockAuthPort::new(true);

        let handle = controller.mount(&auth);
        handle.unmount().await;

        assert_ok!(controller.fetch_all(user().uid()).await);
        assert!(controller.items().is_empty());
    }
}
