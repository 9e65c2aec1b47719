//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `entry_form`: All fields of an entry, for drafts and expanded entries

mod entry_form;
mod field_renderer;

pub use entry_form::entry_form_lines;
pub use field_renderer::{field_lines, inline_field_line};
