use futures::future;
use shared::domain::{TodoId, TodoItem};
use tracing::{debug, warn};

use crate::{interaction::Interaction, store::RemoteStore};

pub const EDIT_PROMPT: &str = "Edit your todo:";
pub const REMOVE_CONFIRM: &str =
    "Are you sure you want to delete this todo? This action cannot be undone.";
pub const REMOVE_ALL_CONFIRM: &str =
    "Are you sure you want to delete all todos? This action cannot be undone. All todos will be permanently deleted.";

pub const REMOVE_OK_NOTICE: &str = "Todo deleted successfully.";
pub const REMOVE_FAILED_NOTICE: &str = "Error deleting todo. Please try again.";
pub const REMOVE_ALL_OK_NOTICE: &str = "All todos have been permanently deleted.";
pub const REMOVE_ALL_FAILED_NOTICE: &str = "Error deleting todos. Please try again.";
pub const CREATE_FAILED_NOTICE: &str = "Error adding todo. Please try again.";
pub const UPDATE_FAILED_NOTICE: &str = "Error updating todo. Please try again.";

/// How an operation resolved. Store failures are absorbed here rather than
/// propagated; the interaction collaborator has already been notified by the
/// time a `Failed` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Completed,
    /// Input did not meet the operation's constraints; nothing happened.
    Ignored,
    /// The user declined a confirmation or abandoned a prompt.
    Cancelled,
    Failed,
}

/// Owns the in-memory todo list, the edit cursor, and the pending input
/// draft; mediates every mutation through the remote store and reconciles
/// local state with the response.
///
/// Methods take `&mut self`, so operations issued through one controller
/// handle run dispatch, await, and reconcile without interleaving.
pub struct TodoListController<S, I> {
    store: S,
    interaction: I,
    items: Vec<TodoItem>,
    edit_cursor: Option<TodoId>,
    draft: String,
    next_local_id: u64,
}

impl<S: RemoteStore, I: Interaction> TodoListController<S, I> {
    pub fn new(store: S, interaction: I) -> Self {
        Self {
            store,
            interaction,
            items: Vec::new(),
            edit_cursor: None,
            draft: String::new(),
            next_local_id: 1,
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn edit_cursor(&self) -> Option<&TodoId> {
        self.edit_cursor.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_cursor.is_some()
    }

    /// Replaces local state wholesale with the remote collection. A fetch
    /// failure leaves the list empty; it is logged but not surfaced further.
    pub async fn load(&mut self) {
        match self.store.list_all().await {
            Ok(records) => {
                self.items = records
                    .into_iter()
                    .map(|(id, text)| TodoItem { id, text })
                    .collect();
                debug!(count = self.items.len(), "loaded todo collection");
            }
            Err(err) => {
                warn!(error = %err, "initial load failed; starting with an empty list");
                self.items.clear();
            }
        }
    }

    /// Dispatches the draft: create mode when no edit cursor is staged,
    /// update mode otherwise. Whitespace-only drafts are a no-op. The draft
    /// is cleared after dispatch in both modes.
    pub async fn submit(&mut self) -> OpStatus {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return OpStatus::Ignored;
        }

        let status = match self.edit_cursor.take() {
            Some(id) => self.dispatch_update(&id, &text).await,
            None => self.dispatch_create(&text).await,
        };
        self.draft.clear();
        status
    }

    /// Stages an item for update mode: the edit cursor points at it and its
    /// current text becomes the draft. Returns false for an unknown id.
    pub fn stage_edit(&mut self, id: &TodoId) -> bool {
        let Some(item) = self.items.iter().find(|item| item.id == *id) else {
            return false;
        };
        self.draft = item.text.clone();
        self.edit_cursor = Some(item.id.clone());
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit_cursor = None;
        self.draft.clear();
    }

    /// Prompt-driven edit path, independent of the staged edit cursor: asks
    /// the interaction collaborator for replacement text and dispatches the
    /// update immediately. A cancelled or whitespace-only prompt abandons the
    /// operation with no state change.
    pub async fn begin_edit(&mut self, id: &TodoId) -> OpStatus {
        let Some(current) = self
            .items
            .iter()
            .find(|item| item.id == *id)
            .map(|item| item.text.clone())
        else {
            return OpStatus::Ignored;
        };

        let Some(replacement) = self.interaction.prompt(EDIT_PROMPT, &current) else {
            return OpStatus::Cancelled;
        };
        let replacement = replacement.trim().to_string();
        if replacement.is_empty() {
            return OpStatus::Cancelled;
        }

        self.dispatch_update(id, &replacement).await
    }

    /// Optimistically removes the item, then asks for confirmation and
    /// deletes remotely. Declined confirmation or a store failure restores
    /// the exact pre-removal sequence from the snapshot captured before the
    /// optimistic removal.
    pub async fn remove(&mut self, id: &TodoId) -> OpStatus {
        if !self.items.iter().any(|item| item.id == *id) {
            return OpStatus::Ignored;
        }

        let snapshot = self.items.clone();
        self.items.retain(|item| item.id != *id);

        if !self.interaction.confirm(REMOVE_CONFIRM) {
            self.items = snapshot;
            return OpStatus::Cancelled;
        }

        match self.store.delete(id).await {
            Ok(()) => {
                self.interaction.notify(REMOVE_OK_NOTICE);
                OpStatus::Completed
            }
            Err(err) => {
                warn!(id = %id, error = %err, "todo deletion failed; restoring snapshot");
                self.items = snapshot;
                self.interaction.notify(REMOVE_FAILED_NOTICE);
                OpStatus::Failed
            }
        }
    }

    /// Confirms, then re-fetches the remote collection and deletes every
    /// record concurrently. Local state is cleared only after all deletions
    /// succeed; on any failure it stays exactly as it was before the
    /// operation.
    pub async fn remove_all(&mut self) -> OpStatus {
        if !self.interaction.confirm(REMOVE_ALL_CONFIRM) {
            return OpStatus::Cancelled;
        }

        let records = match self.store.list_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "todo collection fetch failed during delete-all");
                self.interaction.notify(REMOVE_ALL_FAILED_NOTICE);
                return OpStatus::Failed;
            }
        };

        let deletions =
            future::join_all(records.iter().map(|(id, _)| self.store.delete(id))).await;
        let failures = deletions.iter().filter(|outcome| outcome.is_err()).count();
        if failures > 0 {
            warn!(
                failed = failures,
                total = deletions.len(),
                "delete-all left the collection partially deleted"
            );
            self.interaction.notify(REMOVE_ALL_FAILED_NOTICE);
            return OpStatus::Failed;
        }

        self.items.clear();
        self.interaction.notify(REMOVE_ALL_OK_NOTICE);
        OpStatus::Completed
    }

    async fn dispatch_create(&mut self, text: &str) -> OpStatus {
        let placeholder = self.mint_local_id();
        self.items.push(TodoItem::new(placeholder.clone(), text));

        match self.store.create(text).await {
            Ok(id) => {
                // Reconcile by placeholder id, not position: the sequence may
                // have changed while the create round trip was in flight.
                match self.items.iter_mut().find(|item| item.id == placeholder) {
                    Some(item) => item.id = id,
                    None => warn!(
                        id = %id,
                        "created todo no longer present locally; server id not adopted"
                    ),
                }
                OpStatus::Completed
            }
            Err(err) => {
                warn!(error = %err, "todo creation failed; reverting optimistic insert");
                self.items.retain(|item| item.id != placeholder);
                self.interaction.notify(CREATE_FAILED_NOTICE);
                OpStatus::Failed
            }
        }
    }

    /// Rewrites local state for the id immediately; the remote update is
    /// fire-and-forget relative to that rewrite, so a store failure notifies
    /// without rolling the local text back.
    async fn dispatch_update(&mut self, id: &TodoId, text: &str) -> OpStatus {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == *id) {
            item.text = text.to_string();
        }

        match self.store.update(id, text).await {
            Ok(()) => OpStatus::Completed,
            Err(err) => {
                warn!(id = %id, error = %err, "todo update failed");
                self.interaction.notify(UPDATE_FAILED_NOTICE);
                OpStatus::Failed
            }
        }
    }

    fn mint_local_id(&mut self) -> TodoId {
        let id = TodoId::local(self.next_local_id);
        self.next_local_id += 1;
        id
    }
}
