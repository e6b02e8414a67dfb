use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    WINDOW_FOOTER_HEIGHT, WINDOW_HEADER_HEIGHT, WINDOW_SIZER_WIDTH,
};

/// Window metrics used by [`crate::ui::Ui`].
///
/// `Default` pulls every value from [`crate::constants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    pub default_window_size: (u16, u16),
    pub min_window_size: (i32, i32),
    pub header_height: u16,
    pub footer_height: u16,
    pub sizer_width: u16,
}

impl UiConfig {
    pub fn with_default_window_size(mut self, width: u16, height: u16) -> Self {
        self.default_window_size = (width, height);
        self
    }

    pub fn with_min_window_size(mut self, width: i32, height: i32) -> Self {
        self.min_window_size = (width, height);
        self
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_window_size: (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            min_window_size: (MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT),
            header_height: WINDOW_HEADER_HEIGHT,
            footer_height: WINDOW_FOOTER_HEIGHT,
            sizer_width: WINDOW_SIZER_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants_and_builders_override() {
        let config = UiConfig::default();
        assert_eq!(config.default_window_size, (480, 350));
        assert_eq!(config.min_window_size, (10, 25));

        let tuned = config
            .with_default_window_size(200, 100)
            .with_min_window_size(20, 30);
        assert_eq!(tuned.default_window_size, (200, 100));
        assert_eq!(tuned.min_window_size, (20, 30));
        assert_eq!(tuned.header_height, config.header_height);
    }
}
