//! Gesture key identities and the raw key events fed into the controller

/// A trackable input that can start an override session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKey {
    /// Control (either side) - immediate trigger, release event is unreliable
    PrimaryModifier,
    /// Z - immediate trigger
    SecondaryModifier,
    /// Right arrow - long-press debounced, short tap skips forward
    Seek,
}

impl GestureKey {
    pub const ALL: [GestureKey; 3] = [
        GestureKey::PrimaryModifier,
        GestureKey::SecondaryModifier,
        GestureKey::Seek,
    ];

    /// How a press of this key is classified
    pub fn kind(self) -> GestureKind {
        match self {
            GestureKey::PrimaryModifier | GestureKey::SecondaryModifier => GestureKind::Immediate,
            GestureKey::Seek => GestureKind::Debounced,
        }
    }

    /// Get display name for the key
    pub fn display_name(self) -> &'static str {
        match self {
            GestureKey::PrimaryModifier => "Ctrl",
            GestureKey::SecondaryModifier => "Z",
            GestureKey::Seek => "Right",
        }
    }
}

/// Gesture shape for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Override starts on key-down, no debounce
    Immediate,
    /// Override starts only once the key has been held past the long-press delay
    Debounced,
}

/// What the key event was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTarget {
    #[default]
    Media,
    /// A text-input-like element; such events are never classified
    Editable,
}

/// A key-down or key-up as reported by the host event layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Bound gesture key, `None` for any other key
    pub key: Option<GestureKey>,
    /// Whether the event reports the primary modifier as held
    pub modifier_down: bool,
    pub target: EventTarget,
}

impl KeyEvent {
    /// Event for a gesture key aimed at the media surface
    pub fn gesture(key: GestureKey) -> Self {
        Self {
            key: Some(key),
            modifier_down: key == GestureKey::PrimaryModifier,
            target: EventTarget::Media,
        }
    }

    /// Event for an unbound key
    pub fn other() -> Self {
        Self {
            key: None,
            modifier_down: false,
            target: EventTarget::Media,
        }
    }

    pub fn with_modifier(mut self, down: bool) -> Self {
        self.modifier_down = down;
        self
    }

    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    pub fn is_editable(&self) -> bool {
        self.target == EventTarget::Editable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(GestureKey::PrimaryModifier.kind(), GestureKind::Immediate);
        assert_eq!(GestureKey::SecondaryModifier.kind(), GestureKind::Immediate);
        assert_eq!(GestureKey::Seek.kind(), GestureKind::Debounced);
    }

    #[test]
    fn test_gesture_event_reports_own_modifier() {
        assert!(KeyEvent::gesture(GestureKey::PrimaryModifier).modifier_down);
        assert!(!KeyEvent::gesture(GestureKey::Seek).modifier_down);
        assert!(!KeyEvent::other().modifier_down);
    }
}
