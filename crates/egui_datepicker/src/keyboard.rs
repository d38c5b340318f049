use egui::{Key, Modifiers};

/// What a key press asks the picker to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Open,
    Close,
    TabForward,
    TabBackward,
}

/// Where the key press happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyTarget {
    /// The bound text input has focus.
    Input,

    /// Somewhere in the open panel.
    Panel,
}

/// The keys the picker reacts to.
pub const KEY_BINDINGS: [(Modifiers, Key, Action); 4] = [
    (Modifiers::NONE, Key::Enter, Action::Open),
    (Modifiers::NONE, Key::Escape, Action::Close),
    (Modifiers::NONE, Key::Tab, Action::TabForward),
    (Modifiers::SHIFT, Key::Tab, Action::TabBackward),
];

/// Look up the action bound to a key press, if any.
pub fn action_for(key: Key, modifiers: Modifiers) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(bound_modifiers, bound_key, _)| *bound_key == key && *bound_modifiers == modifiers)
        .map(|(_, _, action)| *action)
}

/// All actions triggered by this frame's key presses.
pub fn actions_in(input: &egui::InputState) -> Vec<Action> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => action_for(*key, *modifiers),
            _ => None,
        })
        .collect()
}
