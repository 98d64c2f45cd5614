pub mod config;
pub mod controller;
pub mod firestore;
pub mod interaction;
pub mod store;

pub use config::{load_settings, Settings};
pub use controller::{OpStatus, TodoListController};
pub use firestore::FirestoreStore;
pub use interaction::{Interaction, SilentInteraction};
pub use store::RemoteStore;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/firestore_tests.rs"]
mod firestore_tests;
