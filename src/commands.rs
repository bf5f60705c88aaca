use anyhow::{bail, Context, Result};

use crate::config::{
    ConvertJob, EmissivityJob, PanelsJob, PlotJob, ReconcileJob, SeriesSource, SourceFormat,
    WsggJob,
};
use crate::convert;
use crate::data::loader;
use crate::data::model::{Quantity, SpectralSeries};
use crate::data::writer;
use crate::plot::{self, ChartSeries};
use crate::wsgg;

// ---------------------------------------------------------------------------
// convert: ExoMol σ(ν̃) → κ(ν̃)
// ---------------------------------------------------------------------------

pub fn convert(job: &ConvertJob) -> Result<()> {
    let sigma = loader::load_series(&job.input)?;
    let kappa = convert::cross_section_to_coefficient(&sigma, &job.state);

    let header = format!("nu(cm^-1)    {}", Quantity::Coefficient.column_label());
    writer::write_series(&job.output, &kappa, &header)?;

    if let Some(chart) = &job.chart {
        let entry = ChartSeries {
            label: job.state.to_string(),
            series: kappa.clone(),
        };
        plot::overlay_chart(chart, &[entry], Quantity::Coefficient, None, None)?;
    }

    println!(
        "Conversion complete: {} samples -> {}",
        kappa.len(),
        job.output.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// reconcile: HITRAN κ column → σ(ν̃)
// ---------------------------------------------------------------------------

pub fn reconcile(job: &ReconcileJob) -> Result<()> {
    let values = loader::load_column(&job.input)?;
    let kappa = job.grid.pair_with(values);
    let sigma_values = convert::coefficient_to_cross_section(kappa.values(), &job.state, job.unit);
    let sigma = kappa.with_values(sigma_values);

    let header = format!("nu(cm^-1)    {}", Quantity::CrossSection.column_label());
    writer::write_series(&job.output, &sigma, &header)?;

    if let Some(chart) = &job.chart {
        let entry = ChartSeries {
            label: format!("{} [{}]", job.state, job.unit),
            series: sigma.clone(),
        };
        plot::overlay_chart(chart, &[entry], Quantity::CrossSection, None, None)?;
    }

    println!(
        "Reconciliation complete: {} samples -> {}",
        sigma.len(),
        job.output.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// plot: overlay N sources
// ---------------------------------------------------------------------------

pub fn plot(job: &PlotJob) -> Result<()> {
    if job.sources.is_empty() {
        bail!("plot job lists no sources");
    }

    let mut series_list = Vec::with_capacity(job.sources.len());
    for source in &job.sources {
        let series = resolve_source(source, job.quantity)
            .with_context(|| format!("loading source {}", source.path.display()))?;
        series_list.push(ChartSeries {
            label: source.display_label(),
            series,
        });
    }

    plot::overlay_chart(
        &job.output,
        &series_list,
        job.quantity,
        job.window,
        job.title.as_deref(),
    )
}

/// Load a source and express it in the chart's quantity. Two-column sources
/// are taken at face value; HITRAN sources are coefficient-valued and are
/// reconciled to cross-sections on demand, which requires a state and unit.
fn resolve_source(source: &SeriesSource, quantity: Quantity) -> Result<SpectralSeries> {
    match source.format {
        SourceFormat::TwoColumn => loader::load_series(&source.path),
        SourceFormat::Hitran => {
            let values = loader::load_column(&source.path)?;
            let kappa = source.grid.pair_with(values);
            match quantity {
                Quantity::Coefficient => Ok(kappa),
                Quantity::CrossSection => {
                    let state = source
                        .state
                        .context("HITRAN source needs a thermodynamic state to reconcile to cross-sections")?;
                    let unit = source
                        .unit
                        .context("HITRAN source needs a coefficient unit to reconcile to cross-sections")?;
                    let sigma = convert::coefficient_to_cross_section(kappa.values(), &state, unit);
                    Ok(kappa.with_values(sigma))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// panels: stacked κ comparison
// ---------------------------------------------------------------------------

pub fn panels(job: &PanelsJob) -> Result<()> {
    let (lo, hi) = job.window;
    let top = ChartSeries {
        label: format!("kappa {} (cm^-1)", job.top.display_label()),
        series: resolve_source(&job.top, Quantity::Coefficient)
            .with_context(|| format!("loading source {}", job.top.path.display()))?
            .window(lo, hi),
    };
    let bottom = ChartSeries {
        label: format!("kappa {} (cm^-1)", job.bottom.display_label()),
        series: resolve_source(&job.bottom, Quantity::Coefficient)
            .with_context(|| format!("loading source {}", job.bottom.path.display()))?
            .window(lo, hi),
    };

    plot::stacked_chart(&job.output, &top, &bottom, job.window)
}

// ---------------------------------------------------------------------------
// wsgg: polynomial fits of the gray-gas weights
// ---------------------------------------------------------------------------

pub fn wsgg_fit(job: &WsggJob) -> Result<()> {
    let table = wsgg::read_weight_table(&job.table, job.delimiter_byte()?, job.decimal_comma)?;

    if let Some(dir) = &job.chart_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating chart directory {}", dir.display()))?;
    }

    for (name, weights) in &table.columns {
        let fit = wsgg::fit_polynomial(&table.temperature, weights, job.degree)
            .with_context(|| format!("fitting column '{name}'"))?;
        wsgg::print_fit_summary(name, job.degree, &table.temperature, weights, &fit);

        if let Some(dir) = &job.chart_dir {
            let (curve_x, curve_y) = sample_polynomial(&fit.coefficients, &table.temperature);
            let chart = dir.join(format!("{name}.png"));
            plot::fit_chart(
                &chart,
                &curve_x,
                &curve_y,
                &table.temperature,
                weights,
                name,
                &format!("Degree-{} fit of {name} vs T", job.degree),
            )?;
        }
    }
    Ok(())
}

/// Dense sampling of the fitted polynomial over the observed temperature
/// range, for a smooth chart curve.
fn sample_polynomial(coefficients: &[f64], temperature: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let lo = temperature.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = temperature.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let samples = 200;
    let step = (hi - lo) / (samples - 1) as f64;
    let x: Vec<f64> = (0..samples).map(|i| lo + i as f64 * step).collect();
    let y: Vec<f64> = x.iter().map(|&t| wsgg::evaluate(coefficients, t)).collect();
    (x, y)
}

// ---------------------------------------------------------------------------
// emissivity: LBL vs WSGG comparison tables and chart
// ---------------------------------------------------------------------------

pub fn emissivity(job: &EmissivityJob) -> Result<()> {
    if job.cases.is_empty() {
        bail!("emissivity job lists no cases");
    }
    for case in &job.cases {
        if case.lbl.len() != job.temperature.len() || case.wsgg.len() != job.temperature.len() {
            bail!(
                "case '{}' column lengths do not match the temperature axis ({} points)",
                case.label,
                job.temperature.len()
            );
        }
    }

    for case in &job.cases {
        let metrics = wsgg::error_metrics(&case.lbl, &case.wsgg);
        wsgg::print_error_table(&case.label, &job.temperature, &case.lbl, &case.wsgg, &metrics);
    }

    if let Some(chart) = &job.chart {
        let cases: Vec<(String, Vec<f64>, Vec<f64>)> = job
            .cases
            .iter()
            .map(|case| (case.label.clone(), case.lbl.clone(), case.wsgg.clone()))
            .collect();
        plot::emissivity_chart(chart, &job.temperature, &cases)?;
    }
    Ok(())
}
