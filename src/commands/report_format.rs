use crate::services::simulation_types::{BurnupForecastReport, ScopeForecastReport};

const DEGENERATE_POOL_WARNING: &str =
    "Warning: no usable throughput history, forecast assumes 1 item per week";

pub fn format_scope_report(report: &ScopeForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push("Delivery Forecast".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!("Scope: {} - {} items", report.scope_min, report.scope_max));
    lines.push(format!("Team pulse: {}", report.pulse_preview));
    lines.push(format!("Iterations: {}", report.iterations));
    if report.degenerate_pool {
        lines.push(DEGENERATE_POOL_WARNING.to_string());
    }
    lines.push(String::new());
    lines.push(format!("Option A (Aggressive): {} Weeks (50% Chance)", report.p50 as u64));
    lines.push(format!("Option B (Likely):     {} Weeks (85% Chance)", report.p85 as u64));
    lines.push(format!("Option C (Safe):       {} Weeks (95% Chance)", report.p95 as u64));

    lines.join("\n")
}

pub fn format_burnup_report(report: &BurnupForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push("Risk Horizon".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!("Project status: Week {}", report.current_week));
    lines.push(format!("Items done: {} / {}", report.completed_so_far, report.total_scope));
    lines.push(format!("Pulse data: {}", report.pulse_preview));
    lines.push(format!(
        "Horizon: {} weeks, Iterations: {}",
        report.horizon_weeks, report.iterations
    ));
    if report.degenerate_pool {
        lines.push(DEGENERATE_POOL_WARNING.to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "Option A (Aggressive): {} (50% Chance)",
        format_week(report.crossings.aggressive)
    ));
    lines.push(format!(
        "Option B (Commercial): {} (85% Chance)",
        format_week(report.crossings.commercial)
    ));
    lines.push(format!(
        "Option C (Safe):       {} (95% Chance)",
        format_week(report.crossings.safe)
    ));

    lines.join("\n")
}

/// Rounds a crossing up to the week in which it happens.
fn format_week(week: Option<f64>) -> String {
    match week {
        Some(value) => format!("Week {}", value.ceil() as u64),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulation_types::{CrossingWeeks, PercentileBands};

    fn build_scope_report() -> ScopeForecastReport {
        ScopeForecastReport {
            data_source: "manual entry".to_string(),
            scope_min: 12,
            scope_max: 17,
            iterations: 10000,
            pool_size: 9,
            pulse_preview: "[6, 5, 4, 6, 3, 6, 5, 4, 7]".to_string(),
            degenerate_pool: false,
            p50: 3.0,
            p85: 3.6,
            p95: 4.0,
        }
    }

    fn build_burnup_report() -> BurnupForecastReport {
        BurnupForecastReport {
            data_source: "pulse.csv".to_string(),
            current_week: 3,
            completed_so_far: 11,
            total_scope: 100.0,
            horizon_weeks: 40,
            iterations: 10000,
            pool_size: 10,
            pulse_preview: "[2, 5, 4, 6, 4, 3, 5, 2, 5, 4]".to_string(),
            degenerate_pool: false,
            actuals: vec![2, 5, 4],
            crossings: CrossingWeeks {
                aggressive: Some(25.2),
                commercial: Some(27.0),
                safe: None,
            },
            bands: PercentileBands::default(),
        }
    }

    #[test]
    fn format_scope_report_lists_decision_menu() {
        let output = format_scope_report(&build_scope_report());

        assert!(output.contains("Delivery Forecast"));
        assert!(output.contains("Data source: manual entry"));
        assert!(output.contains("Scope: 12 - 17 items"));
        assert!(output.contains("Team pulse: [6, 5, 4, 6, 3, 6, 5, 4, 7]"));
        assert!(output.contains("Iterations: 10000"));
        assert!(output.contains("Option A (Aggressive): 3 Weeks (50% Chance)"));
        assert!(output.contains("Option B (Likely):     3 Weeks (85% Chance)"));
        assert!(output.contains("Option C (Safe):       4 Weeks (95% Chance)"));
        assert!(!output.contains("Warning"));
    }

    #[test]
    fn format_burnup_report_rounds_crossings_up() {
        let output = format_burnup_report(&build_burnup_report());

        assert!(output.contains("Project status: Week 3"));
        assert!(output.contains("Items done: 11 / 100"));
        assert!(output.contains("Horizon: 40 weeks, Iterations: 10000"));
        assert!(output.contains("Option A (Aggressive): Week 26 (50% Chance)"));
        assert!(output.contains("Option B (Commercial): Week 27 (85% Chance)"));
        assert!(output.contains("Option C (Safe):       N/A (95% Chance)"));
    }

    #[test]
    fn degenerate_pool_is_called_out() {
        let mut report = build_burnup_report();
        report.degenerate_pool = true;

        assert!(format_burnup_report(&report).contains(DEGENERATE_POOL_WARNING));
    }
}
