//! Panel visibility.

/// Whether the chat panel is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    Open,
    #[default]
    Closed,
}

impl PanelState {
    /// Flip between open and closed, returning the new state.
    pub fn toggle(&mut self) -> Self {
        *self = match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        };
        *self
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
