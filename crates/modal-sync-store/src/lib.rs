#![forbid(unsafe_code)]

//! Headless state for modal-sync.
//!
//! This crate contains everything that decides *whether* a modal is shown,
//! and nothing about how it is drawn:
//!
//! - [`Store`]: a minimal observable snapshot with RAII [`Subscription`]s.
//! - [`RegistryStore`]: id → renderable-unit mapping, rendered by one root.
//! - [`ModalsStore`]: the per-id visibility state machine with its visible and
//!   pending index sets.
//! - [`ModalId`], [`AnyData`], [`Update`] and [`ModalError`].
//!
//! # Concurrency
//!
//! Everything is single-threaded (`Rc`/`RefCell`). Every mutation and every
//! notification completes synchronously inside the call that triggered it;
//! the event loop that calls into the stores provides mutual exclusion.
//!
//! # Example
//!
//! ```
//! use modal_sync_store::{ModalId, ModalPhase, ModalsStore, Update};
//!
//! let store: ModalsStore<String> = ModalsStore::new();
//! let id = ModalId::next("modal");
//!
//! // Opened before its unit exists: waits for the mount signal.
//! store.open(&id, Some("hello".to_string()));
//! assert_eq!(store.phase(&id), ModalPhase::Pending);
//!
//! store.set_visible_on_mount_if_needed(&id);
//! assert!(store.any_visible());
//!
//! store.update(&id, Update::transform(|s: &String| s.to_uppercase()));
//! store.close(&id);
//! store.remove(&id);
//! assert_eq!(store.phase(&id), ModalPhase::Unbound);
//! ```

mod data;
mod error;
mod id;
pub mod modals;
pub mod registry;
pub mod store;
mod update;

pub use data::AnyData;
pub use error::ModalError;
pub use id::ModalId;
pub use modals::{ModalPhase, ModalRecord, Modals, ModalsStore};
pub use registry::{Registry, RegistryStore};
pub use store::{Store, Subscription};
pub use update::Update;
