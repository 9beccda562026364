use thiserror::Error;

/// Default tab stop, in columns.
///
/// With a tab stop of two, a leading tab lines up with two leading spaces.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Largest accepted tab stop, in columns.
pub const MAX_TAB_WIDTH: usize = 64;

/// Invalid [`ParseOptions`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("tab width must be between 1 and {MAX_TAB_WIDTH}, got {0}")]
    InvalidTabWidth(usize),
}

/// Settings for [`parse`](crate::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    tab_width: usize,
}

impl ParseOptions {
    /// Create options with the given tab stop.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidTabWidth`] if `tab_width` is zero or
    /// larger than [`MAX_TAB_WIDTH`].
    pub fn new(tab_width: usize) -> Result<Self, OptionsError> {
        if !(1..=MAX_TAB_WIDTH).contains(&tab_width) {
            return Err(OptionsError::InvalidTabWidth(tab_width));
        }
        Ok(Self { tab_width })
    }

    /// Columns a tab advances to: the next multiple of this value.
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
