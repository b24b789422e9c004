use crate::{Error, Result};

pub const DEFAULT_TAB_SIZE: u32 = 4;

/// Settings applied while loading a trove.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadOptions {
    tab_size: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { tab_size: DEFAULT_TAB_SIZE }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns a tab advances to: `col += tab - ((col - 1) % tab)`.
    pub fn with_tab_size(mut self, tab_size: u32) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn tab_size(&self) -> u32 {
        self.tab_size
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tab_size == 0 {
            return Err(Error::BadParameter("tab size must be at least 1"));
        }
        Ok(())
    }
}
