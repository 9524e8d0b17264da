use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation_types::BurnupForecastReport;

#[derive(Error, Debug)]
pub enum BurnupChartError {
    #[error("failed to render burn-up chart: {0}")]
    Plot(String),
}

/// Writes the burn-up chart: actuals, the scope line, the 5-95% and 25-75%
/// fans, the median and one marker per decision-line crossing.
pub fn write_burnup_png(output_path: &str, report: &BurnupForecastReport) -> Result<(), BurnupChartError> {
    if report.bands.p50.is_empty() {
        return Ok(());
    }

    let current_week = report.current_week as f64;
    let start = report.completed_so_far as f64;
    let max_x = (report.current_week + report.horizon_weeks) as f64;
    let top_band = report.bands.p95.last().copied().unwrap_or(start);
    let max_y = top_band.max(report.total_scope).max(1.0) * 1.1;

    // Band value `k` belongs to week `current_week + k + 1`; the fan opens at
    // the current week from the completed count.
    let fan_line = |band: &[f64]| -> Vec<(f64, f64)> {
        std::iter::once((current_week, start))
            .chain(band.iter().enumerate().map(|(k, value)| (current_week + (k + 1) as f64, *value)))
            .collect()
    };
    let fan = |lower: &[f64], upper: &[f64]| -> Vec<(f64, f64)> {
        let mut outline = fan_line(upper);
        outline.extend(fan_line(lower).into_iter().rev());
        outline
    };

    let root = BitMapBackend::new(output_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Risk Horizon (Week {})", report.current_week), ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(0.0..max_x, 0.0..max_y)
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc("Completed items")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .draw()
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    let fan_color = RGBColor(34, 139, 34);
    chart
        .draw_series(std::iter::once(Polygon::new(
            fan(report.bands.p5.as_slice(), report.bands.p95.as_slice()),
            fan_color.mix(0.1).filled(),
        )))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?
        .label("Range (5-95%)")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fan_color.mix(0.1).filled()));
    chart
        .draw_series(std::iter::once(Polygon::new(
            fan(report.bands.p25.as_slice(), report.bands.p75.as_slice()),
            fan_color.mix(0.2).filled(),
        )))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?
        .label("Likely (25-75%)")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fan_color.mix(0.2).filled()));
    chart
        .draw_series(LineSeries::new(fan_line(report.bands.p50.as_slice()), fan_color.mix(0.6)))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    let scope_color = RGBColor(30, 80, 200);
    chart
        .draw_series(LineSeries::new(
            vec![(0.0, report.total_scope), (max_x, report.total_scope)],
            scope_color.stroke_width(2),
        ))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?
        .label("Scope")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], scope_color.stroke_width(2)));

    let mut cumulative = 0.0;
    let actuals: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain(report.actuals.iter().enumerate().map(|(week, value)| {
            cumulative += *value as f64;
            ((week + 1) as f64, cumulative)
        }))
        .collect();
    chart
        .draw_series(LineSeries::new(actuals.clone(), BLACK.stroke_width(3)))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?
        .label("Actuals")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(3)));
    chart
        .draw_series(actuals.iter().map(|point| Circle::new(*point, 4, BLACK.filled())))
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    let crossings = [
        ("Aggressive", report.crossings.aggressive, RGBColor(255, 140, 0)),
        ("Commercial", report.crossings.commercial, fan_color),
        ("Safe", report.crossings.safe, scope_color),
    ];
    for (label, week, color) in crossings {
        let Some(week) = week else {
            continue;
        };
        chart
            .draw_series(LineSeries::new(
                vec![(week, 0.0), (week, report.total_scope)],
                color.stroke_width(1),
            ))
            .map_err(|e| BurnupChartError::Plot(e.to_string()))?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{label} ~W{}", week as u64),
                (week, report.total_scope),
                ("sans-serif", 14).into_font().color(&color),
            )))
            .map_err(|e| BurnupChartError::Plot(e.to_string()))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| BurnupChartError::Plot(e.to_string()))?;
    Ok(())
}
