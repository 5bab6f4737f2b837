//! `haulplan-app`
//!
//! **Responsibility:** the application state machine.
//!
//! A single owned controller coordinates view transitions across the
//! generation, media, and persistence boundaries. The view is a sum type,
//! so illegal combinations (an error view holding an active inventory, an
//! idle view holding a live capture) are unrepresentable. All async
//! collaborator calls are awaited inside event handling; every one of them
//! has both a success and a failure transition.

pub mod event;
pub mod machine;
pub mod view;

pub use event::AppEvent;
pub use machine::{App, EMPTY_DESCRIPTION_MESSAGE};
pub use view::{ActiveInventory, ActiveSource, AppView, CapturePhase, Notice};
