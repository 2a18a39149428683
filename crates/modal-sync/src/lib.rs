#![forbid(unsafe_code)]

//! Open, update and close modals by id from anywhere.
//!
//! A modal is created once with [`create`], bound to a renderable unit with
//! [`Instance::define`] or [`Instance::register`], and then driven through
//! its [`Instance`] from any code that holds it. The unit reads its own state
//! with [`Instance::use_state`].
//!
//! Rendering is headless: units produce [`View`]s that draw text lines into a
//! [`Frame`]. Applications adapt these traits to their own widget layer.
//!
//! # Example
//!
//! ```
//! use modal_sync::{Frame, ModalError, ModalsContext, MountScope, View, mount};
//!
//! struct Greeting(modal_sync::ModalState<String>);
//!
//! impl View for Greeting {
//!     fn draw(&self, frame: &mut Frame) {
//!         if let Some(name) = self.0.data() {
//!             frame.push(format!("hello {name}"));
//!         }
//!     }
//! }
//!
//! let ctx = ModalsContext::new();
//! let greeting = ctx.create::<String>();
//!
//! let handle = greeting.clone();
//! let _registration = greeting.register(
//!     move |_: &mut MountScope| -> Result<Box<dyn View>, ModalError> {
//!         Ok(Box::new(Greeting(handle.use_state()?)))
//!     },
//! );
//! let root = mount(&ctx.registry_root()).expect("root mounts");
//!
//! greeting.open_with("world".to_string());
//! assert!(greeting.is_visible());
//! assert!(root.render().contains("hello world"));
//!
//! ctx.close_latest();
//! assert!(!ctx.any_visible());
//! ```
//!
//! # Lifecycle
//!
//! `open` on a modal whose unit is not mounted yet marks it pending; it
//! becomes visible as soon as the gate mounts the unit. `close` only hides
//! the modal. The unit stays mounted so it can play a close transition, and
//! the caller calls `remove` once that transition is over.

mod config;
mod context;
mod gate;
mod instance;
mod projection;
mod root;
mod view;

pub use config::{DEFAULT_ID_PREFIX, ENV_ID_PREFIX, ENV_LOG_TRANSITIONS, ModalsConfig};
pub use context::{
    ModalsContext, any_visible, cleanup, close_all, close_latest, create, create_in,
    registry_root, visible_ids,
};
pub use gate::Gate;
pub use instance::{Instance, Registration};
pub use projection::{ModalSnapshot, ModalState};
pub use root::RegistryRoot;
pub use view::{Frame, MountScope, Mounted, Unit, View, mount};

pub use modal_sync_store::{AnyData, ModalError, ModalId, ModalPhase, Subscription, Update};
