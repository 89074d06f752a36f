use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::application::CategoryReport;
use crate::domain::{cents_to_f64, format_cents};

use super::{palette_color, render_error, ChartError, FONT};

const SIZE: (u32, u32) = (900, 700);

/// Draw one wedge per expense category, largest first, starting at twelve o'clock.
pub fn render_category_pie(report: &CategoryReport, path: &Path) -> Result<(), ChartError> {
    if report.categories.is_empty() || report.total == 0 {
        return Err(ChartError::NoData("no expenses recorded"));
    }

    let sizes: Vec<f64> = report
        .categories
        .iter()
        .map(|c| cents_to_f64(c.total))
        .collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(palette_color).collect();
    let labels: Vec<String> = report
        .categories
        .iter()
        .map(|c| format!("{} ({})", c.category, format_cents(c.total)))
        .collect();

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;
    let title = format!("Expenses by Category (total {})", format_cents(report.total));
    let area = root.titled(&title, (FONT, 28)).map_err(render_error)?;

    // Pie coordinates are absolute backend pixels, not relative to the titled area
    let (width, height) = area.dim_in_pixel();
    let (base_x, base_y) = area.get_base_pixel();
    let center = (base_x + (width / 2) as i32, base_y + (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.33;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 16).into_font().color(&BLACK));
    pie.percentages((FONT, 14).into_font().color(&WHITE));
    area.draw(&pie).map_err(render_error)?;

    root.present().map_err(render_error)?;
    info!(path = %path.display(), "saved category pie chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::CategorySummary;

    fn summary(category: &str, total: i64, percentage: f64) -> CategorySummary {
        CategorySummary {
            category: category.to_string(),
            total,
            count: 1,
            percentage,
        }
    }

    #[test]
    fn test_render_pie_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pie.svg");
        let report = CategoryReport {
            categories: vec![summary("Rent", 9000, 90.0), summary("Groceries", 1000, 10.0)],
            total: 10000,
        };

        render_category_pie(&report, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Groceries (10.00)"));
        assert!(svg.contains("Expenses by Category"));
    }

    #[test]
    fn test_render_pie_without_expenses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pie.svg");
        let report = CategoryReport {
            categories: Vec::new(),
            total: 0,
        };

        assert!(matches!(
            render_category_pie(&report, &path),
            Err(ChartError::NoData(_))
        ));
        assert!(!path.exists());
    }
}
