//! Logical actions and control bindings.
//!
//! The simulation only ever sees `InputFrame`s made of logical actions; how a
//! physical key maps to an action is decided by `ControlBindings`, which the
//! front-end resolves before calling into the core.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Jump,
    Slide,
    Shoot,
    Interact,
    Open,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Slide,
        Action::Shoot,
        Action::Interact,
        Action::Open,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

// ── ActionSet ────────────────────────────────────────────────────────────────

/// Small bit set of actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionSet(u8);

impl ActionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn of(actions: &[Action]) -> Self {
        let mut set = Self::empty();
        for &a in actions {
            set.insert(a);
        }
        set
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Actions in `self` that are not in `other`.
    pub fn difference(&self, other: ActionSet) -> ActionSet {
        ActionSet(self.0 & !other.0)
    }
}

/// Logical input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Actions currently held down.
    pub held: ActionSet,
    /// Actions that went down this frame.
    pub pressed: ActionSet,
    /// Actions that went up this frame.
    pub released: ActionSet,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Derive press/release edges from two consecutive held sets.
    pub fn from_held(previous: ActionSet, current: ActionSet) -> Self {
        Self {
            held: current,
            pressed: current.difference(previous),
            released: previous.difference(current),
        }
    }

    pub fn held(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    pub fn released(&self, action: Action) -> bool {
        self.released.contains(action)
    }

    /// -1, 0 or 1 from the left/right actions; both held cancel out.
    pub fn horizontal(&self) -> f32 {
        match (self.held(Action::Left), self.held(Action::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

// ── Bindings ─────────────────────────────────────────────────────────────────

/// Input symbol per logical action, e.g. `"a"` or `"space"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBindings {
    pub left: String,
    pub right: String,
    pub jump: String,
    pub slide: String,
    pub shoot: String,
    pub interact: String,
    pub open: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            left: "a".to_string(),
            right: "d".to_string(),
            jump: "w".to_string(),
            slide: "s".to_string(),
            shoot: "space".to_string(),
            interact: "f".to_string(),
            open: "e".to_string(),
        }
    }
}

impl ControlBindings {
    pub fn symbol(&self, action: Action) -> &str {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
            Action::Slide => &self.slide,
            Action::Shoot => &self.shoot,
            Action::Interact => &self.interact,
            Action::Open => &self.open,
        }
    }

    fn symbol_mut(&mut self, action: Action) -> &mut String {
        match action {
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Jump => &mut self.jump,
            Action::Slide => &mut self.slide,
            Action::Shoot => &mut self.shoot,
            Action::Interact => &mut self.interact,
            Action::Open => &mut self.open,
        }
    }

    /// The action bound to `symbol`, if any.
    pub fn action_for(&self, symbol: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|&a| self.symbol(a) == symbol)
    }

    /// Bind `symbol` to `action`. Fails when the symbol is taken by another
    /// action or is not a bindable key.
    pub fn rebind(&mut self, action: Action, symbol: &str) -> Result<(), ConfigError> {
        if !is_bindable(symbol) {
            return Err(ConfigError::KeyNotAllowed(symbol.to_string()));
        }
        if let Some(owner) = self.action_for(symbol) {
            if owner != action {
                return Err(ConfigError::KeyInUse {
                    symbol: symbol.to_string(),
                    action: owner,
                });
            }
        }
        *self.symbol_mut(action) = symbol.to_string();
        Ok(())
    }
}

/// Single lowercase ASCII letters and digits, plus `space`.
pub fn is_bindable(symbol: &str) -> bool {
    if symbol == "space" {
        return true;
    }
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_lowercase() || c.is_ascii_digit(),
        _ => false,
    }
}
