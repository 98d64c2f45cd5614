//! Backend commands queued from UI to backend worker.

use shared::domain::TodoId;

pub enum BackendCommand {
    Refresh,
    Submit { text: String },
    StageEdit { id: TodoId },
    CancelEdit,
    Remove { id: TodoId },
    RemoveAll,
}
