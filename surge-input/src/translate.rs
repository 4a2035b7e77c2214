//! Terminal key events to gesture events
//!
//! Release events only arrive when the terminal supports the keyboard
//! enhancement protocol. Without it the watched modifier is recovered by the
//! watchdog alone.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use surge_core::{EventTarget, GestureKey};

/// Phase of a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Bound gesture key for a terminal key code
pub fn gesture_key(code: KeyCode) -> Option<GestureKey> {
    match code {
        KeyCode::Modifier(ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl) => {
            Some(GestureKey::PrimaryModifier)
        }
        KeyCode::Char('z') => Some(GestureKey::SecondaryModifier),
        KeyCode::Right => Some(GestureKey::Seek),
        _ => None,
    }
}

/// Translate a terminal key event. Auto-repeat counts as another key-down.
///
/// `editing` marks the command line as the focused element.
pub fn translate_key(key: &KeyEvent, editing: bool) -> (KeyPhase, surge_core::KeyEvent) {
    let phase = match key.kind {
        KeyEventKind::Release => KeyPhase::Up,
        KeyEventKind::Press | KeyEventKind::Repeat => KeyPhase::Down,
    };
    let target = if editing {
        EventTarget::Editable
    } else {
        EventTarget::Media
    };

    let event = surge_core::KeyEvent {
        key: gesture_key(key.code),
        modifier_down: key.modifiers.contains(KeyModifiers::CONTROL),
        target,
    };
    (phase, event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_bindings() {
        assert_eq!(
            gesture_key(KeyCode::Modifier(ModifierKeyCode::LeftControl)),
            Some(GestureKey::PrimaryModifier)
        );
        assert_eq!(
            gesture_key(KeyCode::Modifier(ModifierKeyCode::RightControl)),
            Some(GestureKey::PrimaryModifier)
        );
        assert_eq!(gesture_key(KeyCode::Char('z')), Some(GestureKey::SecondaryModifier));
        assert_eq!(gesture_key(KeyCode::Right), Some(GestureKey::Seek));
        assert_eq!(gesture_key(KeyCode::Char('Z')), None);
        assert_eq!(gesture_key(KeyCode::Left), None);
        assert_eq!(gesture_key(KeyCode::Modifier(ModifierKeyCode::LeftShift)), None);
    }

    #[test]
    fn test_phases() {
        let press = key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press);
        let repeat = key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Repeat);
        let release = key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release);

        assert_eq!(translate_key(&press, false).0, KeyPhase::Down);
        assert_eq!(translate_key(&repeat, false).0, KeyPhase::Down);
        assert_eq!(translate_key(&release, false).0, KeyPhase::Up);
    }

    #[test]
    fn test_modifier_flag_and_target() {
        let combo = key(KeyCode::Char('a'), KeyModifiers::CONTROL, KeyEventKind::Press);
        let (_, event) = translate_key(&combo, false);
        assert_eq!(event.key, None);
        assert!(event.modifier_down);
        assert_eq!(event.target, EventTarget::Media);

        let typed = key(KeyCode::Char('z'), KeyModifiers::NONE, KeyEventKind::Press);
        let (_, event) = translate_key(&typed, true);
        assert_eq!(event.key, Some(GestureKey::SecondaryModifier));
        assert!(!event.modifier_down);
        assert!(event.is_editable());
    }
}
