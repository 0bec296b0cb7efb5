//! PNG rendering of a player's day: games per hour next to a results pie.

use std::io::Cursor;
use std::sync::LazyLock;

use chess_core::{DailySummary, Outcome};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 400;

const FONT_FAMILY: &str = "sans-serif";
static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const NO_GAMES_TEXT: &str = "Sem jogos hoje";
const NO_RESULTS_TEXT: &str = "-";
const RESULTS_TITLE: &str = "Resultados";
const HOUR_AXIS: &str = "Hora";
const COUNT_AXIS: &str = "Número de jogos";

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Chart font is unavailable")]
    FontUnavailable,

    #[error("Drawing failed: {0}")]
    Draw(String),

    #[error("Pixel buffer does not match the image size")]
    Buffer,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

// The ab_glyph backend has no system fonts; text rendering fails until a
// family is registered in its process-wide table.
static FONT_REGISTERED: LazyLock<bool> = LazyLock::new(|| {
    match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS) {
        Ok(()) => {
            tracing::debug!("Registered chart font family {FONT_FAMILY}");
            true
        }
        Err(_) => {
            tracing::error!("Bundled chart font could not be parsed");
            false
        }
    }
});

/// Register the chart font. Runs once per process; later calls are free.
pub fn init_fonts() -> Result<(), RenderError> {
    if *FONT_REGISTERED {
        Ok(())
    } else {
        Err(RenderError::FontUnavailable)
    }
}

/// Render the two-panel chart for `username` as PNG bytes.
pub fn render_daily_chart(summary: &DailySummary, username: &str) -> Result<Vec<u8>, RenderError> {
    init_fonts()?;

    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        draw_panels(&root, summary, username).map_err(|e| RenderError::Draw(e.to_string()))?;
        root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
    }

    let img = RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, pixels).ok_or(RenderError::Buffer)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    summary: &DailySummary,
    username: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(CHART_WIDTH / 2);

    if summary.is_empty() {
        draw_placeholder(&left, NO_GAMES_TEXT)?;
        draw_placeholder(&right, NO_RESULTS_TEXT)?;
        return Ok(());
    }

    draw_hourly_bars(&left, summary, username)?;
    draw_results_pie(&right, summary)
}

fn draw_placeholder<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from((FONT_FAMILY, 20).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(text, ((w / 2) as i32, (h / 2) as i32), style))
}

fn draw_hourly_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    summary: &DailySummary,
    username: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let y_max = summary.busiest_hour_count().max(1) + 1;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Jogos por hora - {username}"), (FONT_FAMILY, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..23u32).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(24)
        .x_label_formatter(&|v| match v {
            SegmentValue::Exact(h) | SegmentValue::CenterOf(h) => h.to_string(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(HOUR_AXIS)
        .y_desc(COUNT_AXIS)
        .label_style((FONT_FAMILY, 12))
        .axis_desc_style((FONT_FAMILY, 14))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(3)
            .data(summary.hourly()),
    )?;

    Ok(())
}

fn draw_results_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    summary: &DailySummary,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let area = area.titled(RESULTS_TITLE, (FONT_FAMILY, 20))?;

    let breakdown = summary.outcome_breakdown();
    let sizes: Vec<f64> = breakdown.iter().map(|(_, count)| f64::from(*count)).collect();
    let colors: Vec<RGBColor> = breakdown.iter().map(|(o, _)| outcome_color(*o)).collect();
    let labels: Vec<&str> = breakdown.iter().map(|(o, _)| o.as_str()).collect();

    // Pie takes its centre in image pixels, not relative to the area
    let (x0, y0) = area.get_base_pixel();
    let (w, h) = area.dim_in_pixel();
    let center = (x0 + (w / 2) as i32, y0 + (h / 2) as i32);
    let radius = f64::from(w.min(h)) * 0.38;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT_FAMILY, 16).into_font().color(&BLACK));
    pie.percentages((FONT_FAMILY, 14).into_font().color(&WHITE));
    area.draw(&pie)
}

fn outcome_color(outcome: Outcome) -> RGBColor {
    match outcome {
        Outcome::Win => RGBColor(44, 160, 44),
        Outcome::Loss => RGBColor(214, 39, 40),
        Outcome::Draw => RGBColor(127, 127, 127),
        Outcome::Other => RGBColor(255, 127, 14),
    }
}
