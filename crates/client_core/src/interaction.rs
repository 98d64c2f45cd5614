/// Synchronous user-interaction collaborators: a text prompt, a yes/no
/// confirmation, and a fire-and-forget notification.
pub trait Interaction: Send + Sync {
    /// Asks the user for replacement text. `None` means the user cancelled.
    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    /// Asks the user to confirm a destructive action.
    fn confirm(&self, message: &str) -> bool;

    /// Informs the user of an outcome. Never blocks on an answer.
    fn notify(&self, message: &str);
}

/// Null implementation: cancels every prompt, declines every confirmation,
/// and logs notifications. Declining keeps destructive operations inert.
pub struct SilentInteraction;

impl Interaction for SilentInteraction {
    fn prompt(&self, _message: &str, _default: &str) -> Option<String> {
        None
    }

    fn confirm(&self, _message: &str) -> bool {
        false
    }

    fn notify(&self, message: &str) {
        tracing::info!(message, "notification dropped (no interaction surface)");
    }
}
