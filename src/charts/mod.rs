//! SVG chart rendering for ledger reports.
//!
//! - **Category pie**: share of total expenses per category
//! - **Monthly trend**: income, expenses and net per month as lines
//!
//! Charts are drawn with plotters' SVG backend, which needs no system fonts
//! or image codecs.

mod pie;
mod trend;

use plotters::drawing::DrawingAreaErrorKind;
use plotters::style::{Palette, Palette99, RGBColor};
use thiserror::Error;

pub use pie::render_category_pie;
pub use trend::render_monthly_trend;

pub const CATEGORY_PIE_FILE: &str = "chart_expenses_by_category.svg";
pub const MONTHLY_TREND_FILE: &str = "chart_monthly_trend.svg";

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to chart: {0}")]
    NoData(&'static str),

    #[error("Failed to render chart: {0}")]
    Render(String),
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Render(err.to_string())
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}
