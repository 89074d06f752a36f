use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::application::MonthlyReport;
use crate::domain::cents_to_f64;

use super::{render_error, ChartError, FONT};

const SIZE: (u32, u32) = (1000, 600);

const INCOME_COLOR: RGBColor = RGBColor(44, 160, 44);
const EXPENSE_COLOR: RGBColor = RGBColor(214, 39, 40);
const NET_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Draw income, expenses and net as one line each, one point per month.
pub fn render_monthly_trend(report: &MonthlyReport, path: &Path) -> Result<(), ChartError> {
    if report.months.is_empty() {
        return Err(ChartError::NoData("no transactions recorded"));
    }

    let labels: Vec<String> = report.months.iter().map(|m| m.month.short_label()).collect();
    let income: Vec<f64> = report.months.iter().map(|m| cents_to_f64(m.income)).collect();
    let expense: Vec<f64> = report.months.iter().map(|m| cents_to_f64(m.expense)).collect();
    let net: Vec<f64> = report.months.iter().map(|m| cents_to_f64(m.net)).collect();

    let (y_min, y_max) = value_range(income.iter().chain(&expense).chain(&net).copied());
    let month_count = report.months.len() as u32;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Income vs Expenses", (FONT, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((0..month_count).into_segmented(), y_min..y_max)
        .map_err(render_error)?;

    let month_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Amount")
        .x_labels(labels.len())
        .x_label_formatter(&month_label)
        .y_label_formatter(&axis_amount)
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(render_error)?;

    for (name, values, color) in [
        ("Income", &income, INCOME_COLOR),
        ("Expenses", &expense, EXPENSE_COLOR),
        ("Net", &net, NET_COLOR),
    ] {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| (SegmentValue::CenterOf(i as u32), *v));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(4))
            .map_err(render_error)?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    info!(path = %path.display(), "saved monthly trend chart");
    Ok(())
}

/// Y-axis bounds that always include zero, padded by 10% so lines stay off the frame.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = max - min;
    if span == 0.0 {
        return (-1.0, 1.0);
    }
    let pad = span * 0.1;
    (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
}

fn axis_amount(value: &f64) -> String {
    format!("{:.0}", value)
}
