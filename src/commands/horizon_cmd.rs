use std::path::Path;

use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_burnup_report;
use crate::commands::{CommandError, data_source_name, read_weekly_values, write_output};
use crate::services::burnup_chart::write_burnup_png;
use crate::services::burnup_forecast::{BurnupRequest, forecast_burnup};
use crate::services::pdf_report::write_pdf_report;
use crate::services::rng::forecast_rng;

pub fn horizon_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Horizon {
        pulse,
        actuals,
        actuals_file,
        total_scope,
        horizon_weeks,
        output,
        simulation,
    } = cmd
    {
        let settings = simulation.resolve(horizon_weeks)?;
        let raw_pulse = read_weekly_values(pulse.pulse.as_deref(), pulse.pulse_file.as_deref())?;
        let raw_actuals = read_weekly_values(actuals.as_deref(), actuals_file.as_deref())?;

        let request = BurnupRequest {
            pulse: &raw_pulse,
            actuals: &raw_actuals,
            total_scope,
            horizon_weeks: settings.horizon_weeks,
            iterations: settings.iterations,
            exclude_zeros: settings.exclude_zeros,
        };
        let mut report = forecast_burnup(&request, forecast_rng(settings.seed))?;
        report.data_source = data_source_name(pulse.pulse_file.as_deref());

        let chart_path = format!("{output}.png");
        write_burnup_png(&chart_path, &report)?;
        write_output(&output, &report)?;

        let report_text = format_burnup_report(&report);
        let pdf_path = format!("{output}.pdf");
        write_pdf_report(&pdf_path, "Risk Horizon", &report_text, Some(Path::new(&chart_path)))?;

        println!("{report_text}");
        println!("Burn-up forecast for week {} written to {output}", report.current_week);
        println!("Burn-up chart written to {chart_path}");
        println!("Burn-up report written to {pdf_path}");
    }
    Ok(())
}
