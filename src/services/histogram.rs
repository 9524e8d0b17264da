use std::collections::BTreeMap;

use plotters::prelude::*;
use thiserror::Error;

use crate::services::simulation_types::ScopeForecastOutput;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

struct Marker {
    label: String,
    weeks: f64,
    color: RGBColor,
}

/// Writes the weeks-to-complete histogram with the P50/P85/P95 lines.
pub fn write_histogram_png(output_path: &str, output: &ScopeForecastOutput) -> Result<(), HistogramError> {
    let report = &output.report;
    let markers = [
        Marker {
            label: format!("50% (Flip Coin): {} wks", report.p50 as u64),
            weeks: report.p50,
            color: RGBColor(255, 140, 0),
        },
        Marker {
            label: format!("85% (Commercial): {} wks", report.p85 as u64),
            weeks: report.p85,
            color: RGBColor(34, 139, 34),
        },
        Marker {
            label: format!("95% (Safe): {} wks", report.p95 as u64),
            weeks: report.p95,
            color: RGBColor(30, 80, 200),
        },
    ];
    render_histogram_png(output_path, &output.results, &markers)
}

fn render_histogram_png(
    output_path: &str,
    results: &[u32],
    markers: &[Marker],
) -> Result<(), HistogramError> {
    if results.is_empty() {
        return Ok(());
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for weeks in results {
        *counts.entry(*weeks).or_insert(0usize) += 1;
    }
    let max_count = *counts.values().max().unwrap_or(&1);
    let min_week = *counts.keys().next().unwrap_or(&0) as f64;
    let max_week = *counts.keys().next_back().unwrap_or(&0) as f64;

    let root = BitMapBackend::new(output_path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("Delivery Forecast ({} runs)", results.len()), ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d((min_week - 1.0)..(max_week + 1.0), 0..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Weeks to Complete")
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{value:.0}"))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(44, 62, 80);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(counts.iter().map(|(weeks, count)| {
            let center = *weeks as f64;
            Rectangle::new([(center - 0.45, 0), (center + 0.45, *count)], bar_style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    for marker in markers {
        let color = marker.color;
        chart
            .draw_series(LineSeries::new(
                vec![(marker.weeks, 0), (marker.weeks, max_count)],
                color.stroke_width(2),
            ))
            .map_err(|e| HistogramError::Render(e.to_string()))?
            .label(marker.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulation_types::ScopeForecastReport;

    fn output(results: Vec<u32>) -> ScopeForecastOutput {
        ScopeForecastOutput {
            report: ScopeForecastReport {
                data_source: String::new(),
                scope_min: 12,
                scope_max: 17,
                iterations: results.len(),
                pool_size: 3,
                pulse_preview: "[6, 5, 4]".to_string(),
                degenerate_pool: false,
                p50: 3.0,
                p85: 4.0,
                p95: 4.0,
            },
            results,
        }
    }

    #[test]
    fn writes_png_file() {
        let file = assert_fs::NamedTempFile::new("histogram.png").unwrap();
        let path = file.path().to_str().unwrap();

        write_histogram_png(path, &output(vec![2, 3, 3, 3, 4, 4, 5])).unwrap();

        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    #[test]
    fn empty_results_write_nothing() {
        let file = assert_fs::NamedTempFile::new("empty.png").unwrap();
        let path = file.path().to_str().unwrap();

        write_histogram_png(path, &output(Vec::new())).unwrap();

        assert!(std::fs::metadata(path).is_err());
    }
}
