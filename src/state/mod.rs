//! Application state module

mod app_state;
mod forms;
pub mod transition;

pub use app_state::*;
pub use forms::*;
pub use transition::{PendingMutation, TransitionKind, TransitionTracker};
