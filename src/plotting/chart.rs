use image::{ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::io::Cursor;

use super::styles::{ChartStyle, ChartTheme};
use crate::error::{ChartError, Result};
use crate::types::{LineTotals, WeekKey};

// Helper function to wrap errors
fn wrap_err<E: Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Renders aggregated commit statistics to PNG images.
#[derive(Default)]
pub struct ChartRenderer {
    pub theme: ChartTheme,
    pub style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(theme: ChartTheme, style: ChartStyle) -> Self {
        Self { theme, style }
    }

    /// Weekly commit curve for one contributor.
    ///
    /// `points` are the raw `(week index, commits)` values and `curve` the smoothed
    /// line through them. The y axis spans at least `0..min_commit_axis` and grows to
    /// fit larger counts; the curve is clipped to the axis.
    pub fn contributor_timeseries(
        &self,
        login: &str,
        weeks: &[WeekKey],
        points: &[(f64, f64)],
        curve: &[(f64, f64)],
    ) -> Result<Vec<u8>> {
        if weeks.is_empty() || points.is_empty() {
            return Err(ChartError::DataInsufficient(format!(
                "no weekly data to plot for {login}"
            )));
        }

        let y_max = commit_axis_max(points, self.style.min_commit_axis);
        let x_max = (weeks.len() - 1) as f64;
        let labels: Vec<String> = weeks.iter().map(|w| w.to_string()).collect();

        self.draw_png(|root| {
            let theme = &self.theme;
            let style = &self.style;

            let mut chart = ChartBuilder::on(root)
                .caption(
                    format!("Weekly contributions of {login}"),
                    self.font(style.caption_size),
                )
                .margin(style.margin)
                .x_label_area_size(style.label_area_size + 40)
                .y_label_area_size(style.label_area_size)
                .build_cartesian_2d(-0.5f64..(x_max + 0.5), 0f64..y_max)
                .map_err(wrap_err)?;

            let x_label_formatter = |x: &f64| index_label(&labels, *x);

            chart
                .configure_mesh()
                .light_line_style(TRANSPARENT)
                .bold_line_style(theme.grid_color)
                .axis_style(theme.axis_color)
                .x_labels(labels.len().min(12))
                .x_label_formatter(&x_label_formatter)
                .y_label_formatter(&|y| format!("{:.0}", y))
                .x_desc("Week")
                .y_desc("Commits")
                .label_style(self.font(style.font_size))
                .x_label_style(
                    self.font(style.font_size)
                        .transform(FontTransform::Rotate90)
                        .pos(Pos::new(HPos::Right, VPos::Center)),
                )
                .draw()
                .map_err(wrap_err)?;

            let line_color = theme.line_color;
            chart
                .draw_series(LineSeries::new(
                    curve.iter().map(|&(x, y)| (x, y.clamp(0.0, y_max))),
                    line_color.stroke_width(style.line_width),
                ))
                .map_err(wrap_err)?
                .label(login)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2))
                });

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), style.point_size, theme.point_color.filled())),
                )
                .map_err(wrap_err)?;

            chart
                .configure_series_labels()
                .label_font(self.font(style.font_size))
                .background_style(WHITE.mix(0.8))
                .border_style(theme.axis_color)
                .draw()
                .map_err(wrap_err)?;

            Ok(())
        })
    }

    /// Added and deleted lines per contributor as stacked bars.
    ///
    /// `ranked` is expected in display order, largest contributor first.
    pub fn line_totals(&self, ranked: &[(String, LineTotals)]) -> Result<Vec<u8>> {
        if ranked.is_empty() {
            return Err(ChartError::DataInsufficient(
                "no contributors to plot".to_string(),
            ));
        }

        let labels: Vec<String> = ranked.iter().map(|(login, _)| login.clone()).collect();
        let y_max = ranked
            .iter()
            .map(|(_, lines)| lines.changed() as f64)
            .fold(1.0, f64::max)
            * 1.1;

        self.draw_png(|root| {
            let theme = &self.theme;
            let style = &self.style;

            let mut chart = self.bar_chart(
                root,
                "Lines added and deleted per contributor",
                "Lines",
                &labels,
                y_max,
            )?;

            let additions_color = theme.additions_color;
            let deletions_color = theme.deletions_color;

            chart
                .draw_series(ranked.iter().enumerate().map(|(i, (_, lines))| {
                    let (x0, x1) = bar_span(i);
                    Rectangle::new(
                        [(x0, 0.0), (x1, lines.additions as f64)],
                        additions_color.filled(),
                    )
                }))
                .map_err(wrap_err)?
                .label("Additions")
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], additions_color.filled())
                });

            chart
                .draw_series(ranked.iter().enumerate().map(|(i, (_, lines))| {
                    let (x0, x1) = bar_span(i);
                    let base = lines.additions as f64;
                    Rectangle::new(
                        [(x0, base), (x1, base + lines.deletions as f64)],
                        deletions_color.filled(),
                    )
                }))
                .map_err(wrap_err)?
                .label("Deletions")
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], deletions_color.filled())
                });

            // Value labels at the middle of each non-empty segment
            let centered = self
                .font(style.font_size)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let segment_labels = ranked.iter().enumerate().flat_map(|(i, (_, lines))| {
                let x = i as f64;
                let additions = lines.additions as f64;
                let deletions = lines.deletions as f64;
                [
                    (lines.additions, (x, additions / 2.0)),
                    (lines.deletions, (x, additions + deletions / 2.0)),
                ]
                .into_iter()
                .filter(|(value, _)| *value > 0)
                .map(|(value, at)| Text::new(value.to_string(), at, centered.clone()))
                .collect::<Vec<_>>()
            });
            chart.draw_series(segment_labels).map_err(wrap_err)?;

            chart
                .configure_series_labels()
                .label_font(self.font(style.font_size))
                .background_style(WHITE.mix(0.8))
                .border_style(theme.axis_color)
                .draw()
                .map_err(wrap_err)?;

            Ok(())
        })
    }

    /// Total commits per contributor as a bar chart and a pie chart, in that order.
    pub fn commit_totals(&self, totals: &[(String, usize)]) -> Result<(Vec<u8>, Vec<u8>)> {
        if totals.is_empty() || totals.iter().all(|(_, count)| *count == 0) {
            return Err(ChartError::DataInsufficient(
                "no commits to plot".to_string(),
            ));
        }

        let labels: Vec<String> = totals.iter().map(|(login, _)| login.clone()).collect();
        let y_max = totals
            .iter()
            .map(|(_, count)| *count as f64)
            .fold(1.0, f64::max)
            * 1.1;

        let bars = self.draw_png(|root| {
            let mut chart =
                self.bar_chart(root, "Total commits per contributor", "Commits", &labels, y_max)?;

            chart
                .draw_series(totals.iter().enumerate().map(|(i, (_, count))| {
                    let (x0, x1) = bar_span(i);
                    Rectangle::new(
                        [(x0, 0.0), (x1, *count as f64)],
                        self.theme.series_color(i).filled(),
                    )
                }))
                .map_err(wrap_err)?;

            let above = self
                .font(self.style.font_size)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart
                .draw_series(totals.iter().enumerate().map(|(i, (_, count))| {
                    Text::new(count.to_string(), (i as f64, *count as f64), above.clone())
                }))
                .map_err(wrap_err)?;

            Ok(())
        })?;

        let pie = self.draw_png(|root| {
            let area = root
                .titled("Commit share per contributor", self.font(self.style.caption_size))
                .map_err(wrap_err)?;
            let (width, height) = area.dim_in_pixel();
            let center = ((width / 2) as i32, (height / 2) as i32);
            let radius = f64::from(width.min(height)) * 0.35;

            let sizes: Vec<f64> = totals.iter().map(|(_, count)| *count as f64).collect();
            let colors: Vec<RGBColor> = (0..totals.len())
                .map(|i| self.theme.series_color(i))
                .collect();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style(self.font(self.style.font_size));
            pie.percentages(self.font(self.style.font_size.saturating_sub(2)).color(&WHITE));
            area.draw(&pie).map_err(wrap_err)?;

            Ok(())
        })?;

        Ok((bars, pie))
    }

    /// Category bar chart frame with one slot per label.
    fn bar_chart<'a, 'b>(
        &self,
        root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
        caption: &str,
        y_desc: &str,
        labels: &'a [String],
        y_max: f64,
    ) -> Result<ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>> {
        let style = &self.style;
        let theme = &self.theme;

        let mut chart = ChartBuilder::on(root)
            .caption(caption, self.font(style.caption_size))
            .margin(style.margin)
            .x_label_area_size(style.label_area_size + 40)
            .y_label_area_size(style.label_area_size + 20)
            .build_cartesian_2d(-0.5f64..(labels.len() as f64 - 0.5), 0f64..y_max)
            .map_err(wrap_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(theme.grid_color)
            .axis_style(theme.axis_color)
            .x_labels(labels.len())
            .x_label_formatter(&|x| index_label(labels, *x))
            .y_label_formatter(&|y| {
                // Use K/M formatting for large numbers
                if y.abs() >= 1_000_000.0 {
                    format!("{:.1}M", y / 1_000_000.0)
                } else if y.abs() >= 1_000.0 {
                    format!("{:.1}K", y / 1_000.0)
                } else {
                    format!("{:.0}", y)
                }
            })
            .y_desc(y_desc)
            .label_style(self.font(style.font_size))
            .x_label_style(
                self.font(style.font_size)
                    .transform(FontTransform::Rotate90)
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            )
            .draw()
            .map_err(wrap_err)?;

        Ok(chart)
    }

    fn font(&self, size: u32) -> TextStyle<'static> {
        ("sans-serif", f64::from(size))
            .into_font()
            .color(&self.theme.text_color)
    }

    /// Draw into an in-memory bitmap and encode it as PNG.
    fn draw_png<F>(&self, draw: F) -> Result<Vec<u8>>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
    {
        let (width, height) = (self.style.width, self.style.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&self.theme.background_color).map_err(wrap_err)?;
            draw(&root)?;
            root.present().map_err(wrap_err)?;
        }
        encode_png(buffer, width, height)
    }
}

/// Top of the commit axis: at least `floor`, extended to fit the largest count.
pub fn commit_axis_max(points: &[(f64, f64)], floor: f64) -> f64 {
    let peak = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    if peak > floor {
        (peak + peak / 10.0).ceil()
    } else {
        floor
    }
}

/// Label for an axis position that falls on an integer index.
fn index_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn bar_span(index: usize) -> (f64, f64) {
    let x = index as f64;
    (x - 0.4, x + 0.4)
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("pixel buffer does not match image size".to_string()))?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
