//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::workflow::InstallReport;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the steps of a finished installation
    pub fn render_install_report(&self, report: &InstallReport) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Right),
                Cell::new("STEP").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
            ]);

        for (index, (step, outcome)) in report.steps.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1).set_alignment(CellAlignment::Right),
                Cell::new(step.to_string()),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_outcome_icon(*outcome),
                    StatusIcon::get_outcome_text(*outcome)
                ))
                .fg(self.theme.get_outcome_color(*outcome)),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "API Operator installed".green().bold(),
            format!("[{} steps]", report.steps.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output
    }
}
