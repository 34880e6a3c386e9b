//! Color theme for CLI output

use crate::domain::workflow::StepOutcome;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn get_outcome_color(&self, outcome: StepOutcome) -> TableColor {
        match outcome {
            StepOutcome::Completed => self.success,
            StepOutcome::Skipped => self.muted,
        }
    }
}
