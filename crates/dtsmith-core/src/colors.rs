//! ANSI color codes for terminal output.
//!
//! Semantic palette shared by the emitter and the CLI:
//! - Blue: member and type names
//! - Green: string literals and module paths
//! - Yellow: inline warning comments
//! - Dim: keywords and punctuation
//! - Reset: return to default

/// ANSI color palette for declaration-file output.
///
/// Only standard 16-color codes, so output is readable in both light and
/// dark themes. `Colors::OFF` substitutes empty strings, making colored and
/// plain rendering share one code path.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        yellow: "\x1b[33m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Colors disabled (empty strings).
    pub const OFF: Self = Self {
        blue: "",
        green: "",
        yellow: "",
        dim: "",
        reset: "",
    };

    /// Create colors based on enabled flag.
    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    /// Check if colors are enabled.
    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
