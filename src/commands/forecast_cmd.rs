use std::path::Path;

use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_scope_report;
use crate::commands::{CommandError, data_source_name, read_weekly_values, write_output};
use crate::domain::scope::ScopeRange;
use crate::domain::throughput::ThroughputPool;
use crate::services::histogram::write_histogram_png;
use crate::services::pdf_report::write_pdf_report;
use crate::services::rng::forecast_rng;
use crate::services::scope_forecast::forecast_scope;

pub fn forecast_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Forecast {
        min,
        max,
        pulse,
        output,
        simulation,
    } = cmd
    {
        let settings = simulation.resolve(None)?;
        let scope = ScopeRange::new(min, max)?;
        let raw_pulse = read_weekly_values(pulse.pulse.as_deref(), pulse.pulse_file.as_deref())?;
        let pool = ThroughputPool::normalize(&raw_pulse, settings.exclude_zeros);

        let mut forecast = forecast_scope(&scope, &pool, settings.iterations, forecast_rng(settings.seed))?;
        forecast.report.data_source = data_source_name(pulse.pulse_file.as_deref());

        let histogram_path = format!("{output}.png");
        write_histogram_png(&histogram_path, &forecast)?;
        write_output(&output, &forecast)?;

        let report_text = format_scope_report(&forecast.report);
        let pdf_path = format!("{output}.pdf");
        write_pdf_report(
            &pdf_path,
            "Delivery Forecast",
            &report_text,
            Some(Path::new(&histogram_path)),
        )?;

        println!("{report_text}");
        println!("Forecast for {min}-{max} items written to {output}");
        println!("Forecast histogram written to {histogram_path}");
        println!("Forecast report written to {pdf_path}");
    }
    Ok(())
}
