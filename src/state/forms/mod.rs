//! Form domain layer
//!
//! Field value objects shared by the add-item draft and the inline editors
//! of committed entries.

mod field;
mod form_state;

pub use field::{FieldValue, FormField};
pub use form_state::AddItemForm;
