use std::fmt::{self, Debug};

/// A closed, per-environment set of discrete actions.
///
/// `ALL` is the declaration order, which the majority fallback of the
/// response parser uses to break ties. `DEFAULT` is substituted whenever an
/// agent reply cannot be turned into a legal action.
pub trait Action: Copy + Eq + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];
    const DEFAULT: Self;

    /// Canonical lower-case name
    fn name(&self) -> &'static str;

    /// Look up an action by name, ignoring case and surrounding whitespace
    fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.name() == wanted)
    }

    /// Comma-joined names, as carried in `valid_actions`
    fn join_names(actions: &[Self]) -> String {
        actions
            .iter()
            .map(|action| action.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Render an action list the way prompts show it: `[a, b, up]`
pub fn describe<A: Action>(actions: &[A]) -> String {
    let names: Vec<&str> = actions.iter().map(|action| action.name()).collect();
    format!("[{}]", names.join(", "))
}

/// Physical Game Boy buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
}

impl Button {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Start => "start",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input event delivered to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Press(Button),
    Release(Button),
}

/// Actions that map onto a press/release pair of one button
pub trait ButtonAction: Action {
    fn button(&self) -> Button;

    /// The (press, release) signals for this action
    fn signals(&self) -> (Signal, Signal) {
        let button = self.button();
        (Signal::Press(button), Signal::Release(button))
    }
}

/// Pokemon Red controls (every button except SELECT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokemonAction {
    A,
    B,
    Up,
    Down,
    Left,
    Right,
    Start,
}

impl Action for PokemonAction {
    const ALL: &'static [Self] = &[
        Self::A,
        Self::B,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Start,
    ];
    const DEFAULT: Self = Self::B;

    fn name(&self) -> &'static str {
        self.button().as_str()
    }
}

impl ButtonAction for PokemonAction {
    fn button(&self) -> Button {
        match self {
            Self::A => Button::A,
            Self::B => Button::B,
            Self::Up => Button::Up,
            Self::Down => Button::Down,
            Self::Left => Button::Left,
            Self::Right => Button::Right,
            Self::Start => Button::Start,
        }
    }
}

impl fmt::Display for PokemonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Movement on a text grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAction {
    Up,
    Down,
    Left,
    Right,
}

impl GridAction {
    /// (row, column) offset of one step
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl Action for GridAction {
    const ALL: &'static [Self] = &[Self::Up, Self::Down, Self::Left, Self::Right];
    const DEFAULT: Self = Self::Up;

    fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
