//! The todo board
//!
//! `Board` owns the local mirror of the remote todo and category
//! collections and the selection of todos marked for sharing. Every
//! mutating operation performs exactly one round trip (or one concurrent
//! batch) against the remote store and reconciles the mirror from the
//! server's authoritative response; the locally guessed value is never
//! trusted beyond display.
//!
//! Overlapping operations are resolved last-response-wins: no version
//! tokens are kept, and membership is always re-derived by id rather
//! than by position, which is what keeps reconciliation correct when
//! completions interleave.

use futures_util::future::join_all;
use futures_util::try_join;
use tracing::{debug, warn};

use crate::api::RemoteStore;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, Todo};
use crate::selection::Selection;

/// Local mirror of the remote todo collection
pub struct Board<S> {
    store: S,
    todos: Vec<Todo>,
    categories: Vec<Category>,
    selection: Selection,
    /// Latest operation failure, one message at a time; cleared by the
    /// next successful operation
    last_error: Option<String>,
}

impl<S: RemoteStore> Board<S> {
    /// Create an empty board over the given remote store
    pub fn new(store: S) -> Self {
        Self {
            store,
            todos: Vec::new(),
            categories: Vec::new(),
            selection: Selection::default(),
            last_error: None,
        }
    }

    /// The current todo mirror, in server order
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// The current category mirror
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Todos currently marked for sharing
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The failure message from the most recent failed operation
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace both mirrors from the server
    ///
    /// Both collections are fetched concurrently and swapped in
    /// together; if either fetch fails the previous mirrors are left
    /// untouched.
    pub async fn load(&mut self) -> ClientResult<()> {
        let fetched = try_join!(self.store.fetch_todos(), self.store.fetch_categories());
        let (todos, categories) = match fetched {
            Ok(pair) => pair,
            Err(err) => return Err(self.fail(err)),
        };

        debug!(
            todos = todos.len(),
            categories = categories.len(),
            "mirror replaced"
        );
        self.todos = todos;
        self.categories = categories;
        self.settle();
        Ok(())
    }

    /// Refresh the category mirror on its own
    ///
    /// Used after edits that may have minted a new category server-side,
    /// so suggestions stay current without a full reload.
    pub async fn reload_categories(&mut self) -> ClientResult<()> {
        let categories = match self.store.fetch_categories().await {
            Ok(categories) => categories,
            Err(err) => return Err(self.fail(err)),
        };

        self.categories = categories;
        self.last_error = None;
        Ok(())
    }

    /// Create a todo from a title
    ///
    /// Validated locally first: an empty title never reaches the
    /// network. On success the server's returned entry is what enters
    /// the mirror; on failure nothing does, so a failed create leaves no
    /// phantom entry behind.
    pub async fn create(&mut self, title: &str) -> ClientResult<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(self.fail(ClientError::invalid("A todo needs a title")));
        }

        let created = match self.store.create_todo(title).await {
            Ok(todo) => todo,
            Err(err) => return Err(self.fail(err)),
        };

        debug!(id = created.id, "todo created");
        // Membership is by id: replace rather than duplicate if the id
        // somehow already exists locally
        match self.todos.iter_mut().find(|t| t.id == created.id) {
            Some(entry) => *entry = created.clone(),
            None => self.todos.push(created.clone()),
        }
        self.settle();
        Ok(created)
    }

    /// Send the full value of an existing todo and reconcile the reply
    ///
    /// The mirror entry with the matching id is replaced by the server's
    /// returned value. If the entry vanished locally in the meantime
    /// (it lost a race with a delete), the reply is dropped: reported,
    /// but deliberately not an operation failure.
    pub async fn update(&mut self, todo: Todo) -> ClientResult<()> {
        let fresh = match self.store.update_todo(&todo).await {
            Ok(todo) => todo,
            Err(err) => return Err(self.fail(err)),
        };

        match self.todos.iter_mut().find(|t| t.id == fresh.id) {
            Some(entry) => {
                *entry = fresh;
                self.settle();
            }
            None => {
                warn!(id = fresh.id, "reply for a todo that is gone locally");
                self.last_error = Some(ClientError::Missing { id: fresh.id }.to_string());
                self.selection.retain_present(&self.todos);
            }
        }
        Ok(())
    }

    /// Flip completion for the todo with this id
    pub async fn toggle(&mut self, id: i64) -> ClientResult<()> {
        let Some(mut todo) = self.todos.iter().find(|t| t.id == id).cloned() else {
            return Err(self.fail(ClientError::Missing { id }));
        };
        todo.completed = !todo.completed;
        self.update(todo).await
    }

    /// Retitle and/or recategorize the todo with this id
    ///
    /// The category is recorded by value, exactly as given. Afterwards
    /// the category mirror is refreshed, since the edit may have minted
    /// a new category.
    pub async fn edit(
        &mut self,
        id: i64,
        title: Option<&str>,
        category: Option<&str>,
    ) -> ClientResult<()> {
        let Some(mut todo) = self.todos.iter().find(|t| t.id == id).cloned() else {
            return Err(self.fail(ClientError::Missing { id }));
        };

        if let Some(title) = title {
            let title = title.trim();
            if title.is_empty() {
                return Err(self.fail(ClientError::invalid("A todo needs a title")));
            }
            todo.set_title(title);
        }
        if let Some(category) = category {
            todo.set_category(category.trim());
        }

        self.update(todo).await?;
        self.reload_categories().await
    }

    /// Delete every completed todo
    ///
    /// One delete per completed entry, all issued concurrently and
    /// joined. The completed entries leave the mirror only when every
    /// delete succeeded; a single failure keeps the mirror exactly as it
    /// was, so it never drops entries the server may still hold. Returns
    /// how many todos were deleted.
    pub async fn clear_completed(&mut self) -> ClientResult<usize> {
        let (done, remaining): (Vec<Todo>, Vec<Todo>) =
            self.todos.iter().cloned().partition(|t| t.completed);
        if done.is_empty() {
            self.last_error = None;
            return Ok(0);
        }

        let results = join_all(done.iter().map(|t| self.store.delete_todo(t.id))).await;
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(self.fail(err));
        }

        debug!(deleted = done.len(), "completed todos deleted");
        self.todos = remaining;
        self.settle();
        Ok(done.len())
    }

    /// Share todos with another user
    ///
    /// One request per id, all concurrent. The mirror is not touched:
    /// sharing does not change the sharer's own copy. Failures collapse
    /// into a single reported error (the first one); partial success is
    /// observable only through that aggregate.
    pub async fn share(&mut self, username: &str, ids: &[i64]) -> ClientResult<usize> {
        let username = username.trim();
        if username.is_empty() {
            return Err(self.fail(ClientError::invalid("A username is required")));
        }
        if ids.is_empty() {
            return Err(self.fail(ClientError::invalid("No todos selected")));
        }

        let results = join_all(ids.iter().map(|&id| self.store.share_todo(username, id))).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            warn!(failed, total = ids.len(), "share batch failed");
            return Err(self.fail(err));
        }

        debug!(username, shared = ids.len(), "todos shared");
        self.last_error = None;
        Ok(ids.len())
    }

    /// Share everything currently selected, leaving the selection as is
    pub async fn share_selected(&mut self, username: &str) -> ClientResult<usize> {
        let ids: Vec<i64> = self.selection.ids().collect();
        self.share(username, &ids).await
    }

    /// Mark or unmark a todo for the next batch share
    ///
    /// Returns whether the todo is selected afterwards. Only todos
    /// present in the mirror can be selected.
    pub fn toggle_selected(&mut self, id: i64) -> ClientResult<bool> {
        if !self.todos.iter().any(|t| t.id == id) {
            return Err(self.fail(ClientError::Missing { id }));
        }
        Ok(self.selection.toggle(id))
    }

    /// Restore invariants after a mirror change: selection members must
    /// still exist, and the previous failure message is stale
    fn settle(&mut self) {
        self.selection.retain_present(&self.todos);
        self.last_error = None;
    }

    /// Record a failure in the user-visible message slot, replacing any
    /// prior message
    fn fail(&mut self, err: ClientError) -> ClientError {
        warn!(%err, "operation failed");
        self.last_error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{todo, FakeStore};

    async fn loaded_board(store: FakeStore) -> Board<FakeStore> {
        let mut board = Board::new(store);
        board.load().await.unwrap();
        board
    }

    fn ids(board: &Board<FakeStore>) -> Vec<i64> {
        board.todos().iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_load_replaces_both_mirrors() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false), todo(2, "b", true)]);
        *store.categories.lock().unwrap() = vec![crate::models::Category::named("home")];

        let board = loaded_board(store).await;

        assert_eq!(ids(&board), vec![1, 2]);
        assert_eq!(board.categories().len(), 1);
        assert!(board.last_error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_leaves_previous_mirror() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        *board.store.fail_fetch.lock().unwrap() = true;
        let err = board.load().await.unwrap_err();

        assert!(!err.is_local());
        assert_eq!(ids(&board), vec![1]);
        assert!(board.last_error().is_some());
    }

    #[tokio::test]
    async fn test_create_appends_server_entry() {
        // One existing todo; the server assigns id 2 to the new one
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        let created = board.create("b").await.unwrap();

        assert_eq!(created.id, 2);
        assert!(!created.completed);
        assert_eq!(ids(&board), vec![1, 2]);
        assert_eq!(board.todos()[1].title, "b");
    }

    #[tokio::test]
    async fn test_create_empty_title_never_reaches_network() {
        let mut board = loaded_board(FakeStore::new()).await;

        let err = board.create("   ").await.unwrap_err();

        assert!(matches!(err, ClientError::Invalid(_)));
        assert_eq!(board.store.create_calls(), 0);
        assert!(board.todos().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_leaves_no_phantom() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        *board.store.fail_create.lock().unwrap() = true;
        board.create("b").await.unwrap_err();

        assert_eq!(ids(&board), vec![1]);
        assert!(board.last_error().is_some());
    }

    #[tokio::test]
    async fn test_create_with_colliding_id_replaces() {
        // A server handing out an id the mirror already holds must not
        // produce a duplicate entry
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;
        *board.store.next_id.lock().unwrap() = 1;

        board.create("b").await.unwrap();

        assert_eq!(ids(&board), vec![1]);
        assert_eq!(board.todos()[0].title, "b");
    }

    #[tokio::test]
    async fn test_toggle_reconciles_by_id() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        board.toggle(2).await.unwrap();

        assert_eq!(ids(&board), vec![1, 2]);
        assert!(!board.todos()[0].completed);
        assert!(board.todos()[1].completed);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_an_error() {
        let mut board = loaded_board(FakeStore::new()).await;

        let err = board.toggle(9).await.unwrap_err();

        assert!(matches!(err, ClientError::Missing { id: 9 }));
    }

    #[tokio::test]
    async fn test_update_missing_local_target_is_swallowed() {
        // The update's reply comes back after the entry vanished from
        // the mirror (it lost a race with a delete): reported, not thrown
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        board.update(todo(3, "ghost", true)).await.unwrap();

        assert_eq!(ids(&board), vec![1]);
        let message = board.last_error().unwrap();
        assert!(message.contains("3"));
    }

    #[tokio::test]
    async fn test_update_failure_keeps_local_value() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        *board.store.fail_update.lock().unwrap() = true;
        board.toggle(1).await.unwrap_err();

        assert!(!board.todos()[0].completed);
    }

    #[tokio::test]
    async fn test_clear_completed_deletes_only_completed() {
        // Id 1 completed, id 2 open; the delete succeeds
        let store = FakeStore::with_todos(vec![todo(1, "a", true), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        let deleted = board.clear_completed().await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(ids(&board), vec![2]);
        assert_eq!(
            board.store.server_todos().iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[tokio::test]
    async fn test_clear_completed_failure_keeps_mirror_intact() {
        // Same start, but the delete of id 1 fails server-side
        let store = FakeStore::with_todos(vec![todo(1, "a", true), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        board.store.failing_deletes.lock().unwrap().insert(1);
        board.clear_completed().await.unwrap_err();

        assert_eq!(ids(&board), vec![1, 2]);
        assert!(board.last_error().is_some());
    }

    #[tokio::test]
    async fn test_clear_completed_is_all_or_none() {
        // Three completed, one delete fails: even the ones the server
        // did delete stay in the mirror until a reload agrees
        let store = FakeStore::with_todos(vec![
            todo(1, "a", true),
            todo(2, "b", true),
            todo(3, "c", true),
        ]);
        let mut board = loaded_board(store).await;

        board.store.failing_deletes.lock().unwrap().insert(2);
        board.clear_completed().await.unwrap_err();

        assert_eq!(ids(&board), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_clear_completed_with_nothing_to_do() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        assert_eq!(board.clear_completed().await.unwrap(), 0);
        assert_eq!(ids(&board), vec![1]);
    }

    #[tokio::test]
    async fn test_mirror_ids_stay_unique() {
        let store = FakeStore::with_todos(vec![todo(1, "a", true), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        board.create("c").await.unwrap();
        board.toggle(2).await.unwrap();
        board.clear_completed().await.unwrap();
        board.load().await.unwrap();

        let mut seen = ids(&board);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), board.todos().len());
    }

    #[tokio::test]
    async fn test_share_leaves_mirror_untouched() {
        let store = FakeStore::with_todos(vec![todo(1, "a", true), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        let shared = board.share("grace", &[1, 2]).await.unwrap();

        assert_eq!(shared, 2);
        assert_eq!(ids(&board), vec![1, 2]);
        let recorded = board.store.shares.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![("grace".to_string(), 1), ("grace".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_share_surfaces_one_aggregated_error() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        board.store.failing_shares.lock().unwrap().insert(2);
        let err = board.share("grace", &[1, 2]).await.unwrap_err();

        // First failure wins for the message; the mirror is untouched
        assert_eq!(err.to_string(), board.last_error().unwrap());
        assert_eq!(ids(&board), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_share_with_empty_username_is_local() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        let err = board.share("  ", &[1]).await.unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_selection_toggle_and_share() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;

        assert!(board.toggle_selected(1).unwrap());
        assert!(board.toggle_selected(2).unwrap());
        assert!(!board.toggle_selected(2).unwrap());

        board.share_selected("grace").await.unwrap();

        let recorded = board.store.shares.lock().unwrap().clone();
        assert_eq!(recorded, vec![("grace".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_selecting_unknown_id_is_an_error() {
        let mut board = loaded_board(FakeStore::new()).await;
        assert!(board.toggle_selected(5).is_err());
    }

    #[tokio::test]
    async fn test_selection_dropped_when_reload_loses_the_todo() {
        // Id 3 is selected, then a reload comes back without it
        let store = FakeStore::with_todos(vec![todo(3, "c", false)]);
        let mut board = loaded_board(store).await;
        board.toggle_selected(3).unwrap();

        board.store.todos.lock().unwrap().clear();
        board.load().await.unwrap();

        assert!(board.selection().is_empty());
    }

    #[tokio::test]
    async fn test_selection_pruned_after_clear_completed() {
        let store = FakeStore::with_todos(vec![todo(1, "a", true), todo(2, "b", false)]);
        let mut board = loaded_board(store).await;
        board.toggle_selected(1).unwrap();
        board.toggle_selected(2).unwrap();

        board.clear_completed().await.unwrap();

        assert!(!board.selection().contains(1));
        assert!(board.selection().contains(2));
    }

    #[tokio::test]
    async fn test_selection_survives_edit_of_same_id() {
        let store = FakeStore::with_todos(vec![todo(2, "b", false)]);
        let mut board = loaded_board(store).await;
        board.toggle_selected(2).unwrap();

        board.edit(2, Some("renamed"), Some("work")).await.unwrap();

        assert!(board.selection().contains(2));
        assert_eq!(board.todos()[0].title, "renamed");
        assert_eq!(board.todos()[0].category.title, "work");
    }

    #[tokio::test]
    async fn test_edit_refreshes_categories() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;
        assert!(board.categories().is_empty());

        // The server mints the category as a side effect of the edit
        *board.store.categories.lock().unwrap() = vec![crate::models::Category::named("work")];
        board.edit(1, None, Some("work")).await.unwrap();

        assert_eq!(board.categories().len(), 1);
        assert_eq!(board.categories()[0].title, "work");
    }

    #[tokio::test]
    async fn test_failure_message_cleared_by_next_success() {
        let store = FakeStore::with_todos(vec![todo(1, "a", false)]);
        let mut board = loaded_board(store).await;

        *board.store.fail_create.lock().unwrap() = true;
        board.create("b").await.unwrap_err();
        assert!(board.last_error().is_some());

        *board.store.fail_create.lock().unwrap() = false;
        board.create("b").await.unwrap();
        assert!(board.last_error().is_none());
    }
}
