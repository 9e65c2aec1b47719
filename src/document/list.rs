//! Ordered-list mutation helpers
//!
//! Each helper takes the current list and returns a new one; identifiers are
//! never reassigned and unknown identifiers leave the list unchanged.

use super::entry::Identified;

/// Index of the item carrying `id`
pub fn position<T: Identified>(list: &[T], id: &str) -> Option<usize> {
    list.iter().position(|item| item.id() == id)
}

/// Append `item` at the end of the list
pub fn add_item<T: Clone>(list: &[T], item: T) -> Vec<T> {
    let mut next = list.to_vec();
    next.push(item);
    next
}

/// Remove the item carrying `id`
pub fn delete_item<T: Identified + Clone>(list: &[T], id: &str) -> Vec<T> {
    list.iter().filter(|item| item.id() != id).cloned().collect()
}

/// Swap the item carrying `id` with its predecessor
pub fn move_item_up<T: Identified + Clone>(list: &[T], id: &str) -> Vec<T> {
    let mut next = list.to_vec();
    if let Some(index) = position(list, id) {
        if index > 0 {
            next.swap(index, index - 1);
        }
    }
    next
}

/// Swap the item carrying `id` with its successor
pub fn move_item_down<T: Identified + Clone>(list: &[T], id: &str) -> Vec<T> {
    let mut next = list.to_vec();
    if let Some(index) = position(list, id) {
        if index + 1 < list.len() {
            next.swap(index, index + 1);
        }
    }
    next
}
