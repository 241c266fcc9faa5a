#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    MoveDown,
}

const ACTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::MoveDown,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::MoveDown => 3,
        }
    }
}

/// Input as seen by exactly one simulation tick.
///
/// `was_pressed` reports press edges collected since the previous tick; the
/// collector clears them once this snapshot is taken, so a held key reports
/// one edge no matter how many ticks it stays down.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    held: ActionStates,
    pressed: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(held: ActionStates, pressed: ActionStates) -> Self {
        Self { held, pressed }
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn with_held(mut self, action: InputAction, is_held: bool) -> Self {
        self.held.set(action, is_held);
        self
    }

    /// A press edge implies the action is held during the same tick.
    pub fn with_pressed(mut self, action: InputAction) -> Self {
        self.pressed.set(action, true);
        self.held.set(action, true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_reports_nothing() {
        let snapshot = InputSnapshot::empty();
        for action in InputAction::ALL {
            assert!(!snapshot.is_held(action));
            assert!(!snapshot.was_pressed(action));
        }
    }

    #[test]
    fn pressed_builder_marks_action_held() {
        let snapshot = InputSnapshot::empty().with_pressed(InputAction::Jump);
        assert!(snapshot.was_pressed(InputAction::Jump));
        assert!(snapshot.is_held(InputAction::Jump));
        assert!(!snapshot.was_pressed(InputAction::MoveLeft));
    }

    #[test]
    fn action_states_clear_resets_all() {
        let mut states = ActionStates::default();
        states.set(InputAction::MoveRight, true);
        states.set(InputAction::MoveDown, true);
        states.clear();
        assert_eq!(states, ActionStates::default());
    }
}
