//! Status icons for CLI output

use crate::domain::workflow::StepOutcome;

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const SKIPPED: &'static str = "↷";

    pub fn get_outcome_icon(outcome: StepOutcome) -> &'static str {
        match outcome {
            StepOutcome::Completed => Self::SUCCESS,
            StepOutcome::Skipped => Self::SKIPPED,
        }
    }

    pub fn get_outcome_text(outcome: StepOutcome) -> &'static str {
        match outcome {
            StepOutcome::Completed => "Done",
            StepOutcome::Skipped => "Skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_icons() {
        assert_eq!(StatusIcon::get_outcome_icon(StepOutcome::Completed), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_outcome_icon(StepOutcome::Skipped), StatusIcon::SKIPPED);
        assert_eq!(StatusIcon::get_outcome_text(StepOutcome::Skipped), "Skipped");
    }
}
