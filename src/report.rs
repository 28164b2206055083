//! Formatting of IRR results for display

use crate::irr::IrrResult;
use crate::scenario::ScenarioOutcome;

/// Shown in place of a rate when the calculation fails
pub const FAILURE_MARKER: &str = "calculation failed";

/// Format a rate as a percentage with two decimals (0.1 -> "10.00%")
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Percentage string on success, the failure marker otherwise
pub fn format_result(result: &IrrResult) -> String {
    match result {
        Ok(rate) => format_rate(*rate),
        Err(_) => FAILURE_MARKER.to_string(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Render outcomes as an aligned Project / Scenario / Type / IRR table
///
/// An "Annual IRR" column is added when any outcome carries an annualized rate.
pub fn render_table(outcomes: &[ScenarioOutcome]) -> String {
    let with_annual = outcomes.iter().any(|o| o.annualized.is_some());

    let mut headers = vec!["Project".to_string(), "Scenario".to_string(), "Type".to_string(), "IRR".to_string()];
    if with_annual {
        headers.push("Annual IRR".to_string());
    }

    let rows: Vec<Vec<String>> = outcomes
        .iter()
        .map(|o| {
            let mut row = vec![o.project.clone(), o.scenario.clone(), o.kind.clone(), o.display.clone()];
            if with_annual {
                row.push(o.annualized.map(format_rate).unwrap_or_default());
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            // Rate columns are right-aligned
            if i >= 3 {
                line.push_str(&format!("{:>width$}", cell, width = *width));
            } else {
                line.push_str(&pad(cell, *width));
            }
        }
        line.trim_end().to_string()
    };

    let total_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let mut out = String::new();
    out.push_str(&format_row(&headers));
    out.push('\n');
    out.push_str(&"-".repeat(total_width));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

/// Serialize outcomes as a JSON array
pub fn to_json(outcomes: &[ScenarioOutcome]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irr::IrrError;

    fn outcome(project: &str, scenario: &str, display: &str, irr: Option<f64>) -> ScenarioOutcome {
        ScenarioOutcome {
            project: project.to_string(),
            scenario: scenario.to_string(),
            kind: "finite".to_string(),
            irr,
            failure: None,
            display: display.to_string(),
            annualized: None,
        }
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.1), "10.00%");
        assert_eq!(format_rate(-0.194_018_52), "-19.40%");
        assert_eq!(format_rate(0.0), "0.00%");
        assert_eq!(format_rate(1.5), "150.00%");
    }

    #[test]
    fn test_format_result_failure() {
        let failed: IrrResult = Err(IrrError::InvalidGrowthRate(1.2));
        assert_eq!(format_result(&failed), FAILURE_MARKER);
        assert_eq!(format_result(&Ok(0.12)), "12.00%");
    }

    #[test]
    fn test_render_table_alignment() {
        let outcomes = vec![
            outcome("Plant", "Base", "10.00%", Some(0.1)),
            outcome("Long project name", "Salvage", FAILURE_MARKER, None),
        ];
        let table = render_table(&outcomes);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Project"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("Plant "));
        assert!(lines[2].ends_with("10.00%"));
        assert!(lines[3].ends_with(FAILURE_MARKER));
        // Scenario column starts at the same offset on every row
        let offset = lines[0].find("Scenario").unwrap();
        assert_eq!(&lines[2][offset..offset + 4], "Base");
        assert_eq!(&lines[3][offset..offset + 7], "Salvage");
    }

    #[test]
    fn test_render_table_annual_column() {
        let mut monthly = outcome("Plant", "Monthly", "1.00%", Some(0.01));
        monthly.annualized = Some(1.01_f64.powi(12) - 1.0);
        let failed = outcome("Plant", "Broken", FAILURE_MARKER, None);

        let table = render_table(&[monthly, failed]);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].ends_with("Annual IRR"));
        assert!(lines[2].ends_with("12.68%"));
        assert!(lines[3].ends_with(FAILURE_MARKER));

        let plain = render_table(&[outcome("Plant", "Base", "10.00%", Some(0.1))]);
        assert!(!plain.contains("Annual IRR"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&[outcome("Plant", "Base", "10.00%", Some(0.1))]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["display"], "10.00%");
        assert_eq!(value[0]["type"], "finite");
        assert_eq!(value[0]["irr"], 0.1);
        assert!(value[0].get("annualized").is_none());
    }
}
