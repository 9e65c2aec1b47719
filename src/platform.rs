//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for copy/save shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Save shortcut display for the status bar.
/// Ctrl+S works on all platforms.
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// Copy shortcut display
/// - macOS: "Cmd+Y"
/// - Linux/Windows: "Ctrl+Y"
#[cfg(target_os = "macos")]
pub const COPY_SHORTCUT: &str = "Cmd+Y";

#[cfg(not(target_os = "macos"))]
pub const COPY_SHORTCUT: &str = "Ctrl+Y";

/// Whether `modifiers` request an item move instead of cursor movement
pub fn is_move_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Whether `modifiers` carry the platform copy/save modifier
pub fn is_command(modifiers: KeyModifiers) -> bool {
    modifiers.contains(COPY_MODIFIER) || modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_modifier() {
        assert!(is_move_modifier(KeyModifiers::CONTROL));
        assert!(is_move_modifier(KeyModifiers::ALT));
        assert!(!is_move_modifier(KeyModifiers::SHIFT));
        assert!(!is_move_modifier(KeyModifiers::NONE));
    }

    #[test]
    fn test_control_is_always_a_command() {
        assert!(is_command(KeyModifiers::CONTROL));
        assert!(is_command(COPY_MODIFIER));
        assert!(!is_command(KeyModifiers::ALT));
    }
}
