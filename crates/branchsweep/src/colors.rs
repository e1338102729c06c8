//! Semantic color theme for terminal output
//!
//! - `active` => blue: spinners, branch names in listings
//! - `success` => green: completed deletions and switches
//! - `warning` => yellow: detector warnings
//! - `fail` => red: errors
//! - `muted` => dimmed: commit dates

use std::sync::LazyLock;

use owo_colors::Style;

/// Semantic color definitions for terminal output
pub struct SemanticColors {
    pub active: Style,
    pub success: Style,
    pub warning: Style,
    pub fail: Style,
    pub muted: Style,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            active: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            fail: Style::new().red(),
            muted: Style::new().dimmed(),
        }
    }
}

/// Global default theme
pub static COLORS: LazyLock<SemanticColors> = LazyLock::new(SemanticColors::default);

#[cfg(test)]
mod tests {
    use owo_colors::OwoColorize;

    use super::*;

    #[test]
    fn test_styles_keep_text() {
        let rendered = format!("{}", "feature".style(COLORS.active));
        assert!(rendered.contains("feature"));
        let rendered = format!("{}", "2026-01-01".style(COLORS.muted));
        assert!(rendered.contains("2026-01-01"));
    }
}
