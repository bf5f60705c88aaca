use std::path::Path;

use anyhow::{anyhow, Context, Result};
use palette::{Hsl, IntoColor, Srgb};
use plotters::prelude::*;

use crate::data::model::{Quantity, SpectralSeries};

// ---------------------------------------------------------------------------
// Chart inputs
// ---------------------------------------------------------------------------

/// A labelled series ready to draw.
pub struct ChartSeries {
    pub label: String,
    pub series: SpectralSeries,
}

// ---------------------------------------------------------------------------
// Color assignment
// ---------------------------------------------------------------------------

// Okabe-Ito blue/orange, the pair used throughout the publication figures.
const SERIES_BLUE: RGBColor = RGBColor(0x00, 0x72, 0xB2);
const SERIES_ORANGE: RGBColor = RGBColor(0xD5, 0x5E, 0x00);

/// Colors for `n` series: the fixed blue/orange pair first, then evenly
/// spaced hues for anything beyond two.
pub fn series_colors(n: usize) -> Vec<RGBColor> {
    let mut colors = vec![SERIES_BLUE, SERIES_ORANGE];
    if n > 2 {
        let extra = n - 2;
        colors.extend((0..extra).map(|i| {
            let hue = (i as f32 / extra as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        }));
    }
    colors.truncate(n);
    colors
}

// ---------------------------------------------------------------------------
// Overlay chart (log-scale y)
// ---------------------------------------------------------------------------

/// Overlay N spectral series on one chart: shared wavenumber axis,
/// logarithmic value axis. Non-positive samples are not drawable on a log
/// axis and are skipped, as matplotlib clips them.
pub fn overlay_chart(
    path: &Path,
    series_list: &[ChartSeries],
    quantity: Quantity,
    window: Option<(f64, f64)>,
    title: Option<&str>,
) -> Result<()> {
    let (x_lo, x_hi) = window
        .or_else(|| wavenumber_bounds(series_list))
        .context("nothing to plot: every series is empty")?;
    let (y_lo, y_hi) = positive_value_bounds(series_list, x_lo, x_hi);
    let colors = series_colors(series_list.len());

    let (width, height) = (800u32, 450u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(18)
            .x_label_area_size(42)
            .y_label_area_size(64);
        if let Some(title) = title {
            builder.caption(title, (FontFamily::SansSerif, 18));
        }
        let mut chart = builder
            .build_cartesian_2d(x_lo..x_hi, (y_lo..y_hi).log_scale())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Wavenumber (cm^-1)")
            .y_desc(quantity.axis_label())
            .x_labels(7)
            .draw()
            .map_err(draw_err)?;

        for (entry, color) in series_list.iter().zip(&colors) {
            let color = *color;
            chart
                .draw_series(LineSeries::new(
                    entry
                        .series
                        .iter()
                        .filter(|&(nu, v)| nu >= x_lo && nu <= x_hi && v > 0.0),
                    color.stroke_width(1),
                ))
                .map_err(draw_err)?
                .label(entry.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }
    write_png(path, buffer, width, height)
}

// ---------------------------------------------------------------------------
// Stacked two-panel chart (linear y)
// ---------------------------------------------------------------------------

/// Two vertically stacked panels over the same wavenumber window, one
/// series each, for comparing coefficients from two sources side by side.
pub fn stacked_chart(
    path: &Path,
    top: &ChartSeries,
    bottom: &ChartSeries,
    window: (f64, f64),
) -> Result<()> {
    let (width, height) = (900u32, 600u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let panels = root.split_evenly((2, 1));

        draw_panel(&panels[0], top, SERIES_BLUE, window, false)?;
        draw_panel(&panels[1], bottom, SERIES_ORANGE, window, true)?;

        root.present().map_err(draw_err)?;
    }
    write_png(path, buffer, width, height)
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    entry: &ChartSeries,
    color: RGBColor,
    (x_lo, x_hi): (f64, f64),
    label_x_axis: bool,
) -> Result<()> {
    let y_hi = entry
        .series
        .iter()
        .filter(|&(nu, _)| nu >= x_lo && nu <= x_hi)
        .map(|(_, v)| v)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(if label_x_axis { 42 } else { 10 })
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi * 1.05)
        .map_err(draw_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(entry.label.as_str()).y_labels(5);
    if label_x_axis {
        mesh.x_desc("Wavenumber (cm^-1)");
    } else {
        mesh.x_labels(0);
    }
    mesh.draw().map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            entry.series.iter().filter(|&(nu, _)| nu >= x_lo && nu <= x_hi),
            color.stroke_width(1),
        ))
        .map_err(draw_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Observed-vs-fitted chart
// ---------------------------------------------------------------------------

/// Observed points against a fitted curve over temperature. The curve is
/// sampled on its own (usually denser) axis.
pub fn fit_chart(
    path: &Path,
    curve_x: &[f64],
    curve_y: &[f64],
    point_x: &[f64],
    point_y: &[f64],
    y_desc: &str,
    title: &str,
) -> Result<()> {
    let (x_lo, x_hi) =
        padded_bounds(point_x, 0.05).context("fit chart needs at least one point")?;
    let (y_lo, y_hi) = padded_bounds(&[curve_y, point_y].concat(), 0.10)
        .context("fit chart needs at least one point")?;

    let (width, height) = (640u32, 480u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(18)
            .caption(title, (FontFamily::SansSerif, 16))
            .x_label_area_size(42)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Temperature (K)")
            .y_desc(y_desc)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                curve_x.iter().copied().zip(curve_y.iter().copied()),
                SERIES_ORANGE.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("Fitted")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], SERIES_ORANGE.stroke_width(2)));

        chart
            .draw_series(
                point_x
                    .iter()
                    .zip(point_y)
                    .map(|(&t, &w)| Circle::new((t, w), 4, SERIES_BLUE.filled())),
            )
            .map_err(draw_err)?
            .label("Observed")
            .legend(|(x, y)| Circle::new((x + 9, y), 4, SERIES_BLUE.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }
    write_png(path, buffer, width, height)
}

// ---------------------------------------------------------------------------
// Emissivity comparison chart
// ---------------------------------------------------------------------------

/// Reference (points) vs model (line) emissivities over temperature, one
/// color per case, emissivity axis fixed to [0, 1].
pub fn emissivity_chart(
    path: &Path,
    temperature: &[f64],
    cases: &[(String, Vec<f64>, Vec<f64>)],
) -> Result<()> {
    let (x_lo, x_hi) =
        padded_bounds(temperature, 0.03).context("emissivity chart needs at least one point")?;
    let colors = series_colors(cases.len());

    let (width, height) = (800u32, 500u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(18)
            .caption("LBL vs WSGG total emissivity", (FontFamily::SansSerif, 18))
            .x_label_area_size(42)
            .y_label_area_size(55)
            .build_cartesian_2d(x_lo..x_hi, 0.0..1.0)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Temperature (K)")
            .y_desc("Emissivity")
            .draw()
            .map_err(draw_err)?;

        for ((label, reference, model), color) in cases.iter().zip(&colors) {
            let color = *color;
            chart
                .draw_series(LineSeries::new(
                    temperature.iter().copied().zip(model.iter().copied()),
                    color.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label(format!("WSGG, {label}"))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });

            chart
                .draw_series(
                    temperature
                        .iter()
                        .zip(reference)
                        .map(|(&t, &e)| Circle::new((t, e), 4, color.filled())),
                )
                .map_err(draw_err)?
                .label(format!("LBL, {label}"))
                .legend(move |(x, y)| Circle::new((x + 9, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }
    write_png(path, buffer, width, height)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn wavenumber_bounds(series_list: &[ChartSeries]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for entry in series_list {
        for &nu in entry.series.wavenumbers() {
            lo = lo.min(nu);
            hi = hi.max(nu);
        }
    }
    (lo < hi).then_some((lo, hi))
}

/// Value range over the window for a log axis: the positive samples only,
/// padded by one decade each way. Falls back to a wide default when a
/// window holds no positive sample at all.
fn positive_value_bounds(series_list: &[ChartSeries], x_lo: f64, x_hi: f64) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for entry in series_list {
        for (nu, v) in entry.series.iter() {
            if nu >= x_lo && nu <= x_hi && v > 0.0 {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if lo > hi {
        return (1e-30, 1.0);
    }
    (lo / 10.0, hi * 10.0)
}

fn padded_bounds(values: &[f64], fraction: f64) -> Option<(f64, f64)> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let pad = ((hi - lo) * fraction).max(f64::MIN_POSITIVE);
    Some((lo - pad, hi + pad))
}

fn draw_err<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow!("chart rendering: {err}")
}

fn write_png(path: &Path, buffer: Vec<u8>, width: u32, height: u32) -> Result<()> {
    let img = image::RgbImage::from_raw(width, height, buffer)
        .context("chart buffer did not match its dimensions")?;
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing chart {}", path.display()))?;
    log::info!("wrote chart {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_two_colors_are_fixed() {
        let colors = series_colors(2);
        assert_eq!(colors, vec![SERIES_BLUE, SERIES_ORANGE]);
        assert_eq!(series_colors(1), vec![SERIES_BLUE]);
    }

    #[test]
    fn extra_colors_are_distinct() {
        let colors = series_colors(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn log_bounds_ignore_non_positive_samples() {
        let entry = ChartSeries {
            label: "s".into(),
            series: SpectralSeries::new(vec![1.0, 2.0, 3.0], vec![0.0, 1e-20, 1e-18]),
        };
        let (lo, hi) = positive_value_bounds(&[entry], 0.0, 10.0);
        assert!((lo - 1e-21).abs() < 1e-33);
        assert!((hi - 1e-17).abs() < 1e-29);
    }

    #[test]
    fn padded_bounds_of_empty_slice_is_none() {
        assert!(padded_bounds(&[], 0.1).is_none());
    }
}
