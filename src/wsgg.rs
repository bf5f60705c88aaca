use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use nalgebra::{DMatrix, DVector};

use crate::data::writer::format_exp;

// ---------------------------------------------------------------------------
// Weight table
// ---------------------------------------------------------------------------

/// A WSGG coefficient table: temperatures plus one column per gray-gas
/// weight, in header order.
#[derive(Debug, Clone)]
pub struct WeightTable {
    pub temperature: Vec<f64>,
    pub columns: Vec<(String, Vec<f64>)>,
}

/// Read a delimited weight table with a header row. One column must be
/// named `T` (case-insensitive); every other column is a gray-gas weight.
/// `decimal_comma` accepts the `0,210462755` numeric convention the source
/// tables use.
pub fn read_weight_table(path: &Path, delimiter: u8, decimal_comma: bool) -> Result<WeightTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening weight table {}", path.display()))?;
    let table = parse_weight_table(file, delimiter, decimal_comma)
        .with_context(|| format!("parsing weight table {}", path.display()))?;
    log::info!(
        "loaded weight table {}: {} rows, {} weight columns",
        path.display(),
        table.temperature.len(),
        table.columns.len()
    );
    Ok(table)
}

fn parse_weight_table<R: Read>(reader: R, delimiter: u8, decimal_comma: bool) -> Result<WeightTable> {
    let mut table = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = table
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let t_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("t"))
        .context("weight table is missing a 'T' column")?;

    let mut temperature = Vec::new();
    let mut columns: Vec<(String, Vec<f64>)> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != t_idx)
        .map(|(_, name)| (name.clone(), Vec::new()))
        .collect();

    for (row_no, record) in table.records().enumerate() {
        let record = record.with_context(|| format!("row {row_no}"))?;
        temperature.push(parse_number(record.get(t_idx).unwrap_or(""), decimal_comma)
            .with_context(|| format!("row {row_no}, column 'T'"))?);

        let mut slot = 0;
        for (i, field) in record.iter().enumerate() {
            if i == t_idx {
                continue;
            }
            let (name, values) = &mut columns[slot];
            values.push(
                parse_number(field, decimal_comma)
                    .with_context(|| format!("row {row_no}, column '{name}'"))?,
            );
            slot += 1;
        }
    }

    if temperature.is_empty() {
        bail!("weight table holds no data rows");
    }
    if columns.is_empty() {
        bail!("weight table holds no weight columns besides 'T'");
    }
    Ok(WeightTable {
        temperature,
        columns,
    })
}

fn parse_number(field: &str, decimal_comma: bool) -> Result<f64> {
    let normalized;
    let token = if decimal_comma {
        normalized = field.replace(',', ".");
        normalized.as_str()
    } else {
        field
    };
    token
        .parse::<f64>()
        .with_context(|| format!("'{field}' is not a number"))
}

// ---------------------------------------------------------------------------
// Polynomial least squares
// ---------------------------------------------------------------------------

/// Result of an ordinary-least-squares polynomial fit.
#[derive(Debug, Clone)]
pub struct PolynomialFit {
    /// Intercept first, then the T¹…T^degree terms.
    pub coefficients: Vec<f64>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub r_squared: f64,
    /// NaN when the fit has no residual degrees of freedom.
    pub adj_r_squared: f64,
    pub rmse: f64,
}

/// Fit `y ≈ c₀ + c₁x + … + c_d x^d` by SVD least squares.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<PolynomialFit> {
    if x.len() != y.len() {
        bail!(
            "predictor and response lengths differ ({} vs {})",
            x.len(),
            y.len()
        );
    }
    let n = x.len();
    let terms = degree + 1;
    if n < terms {
        bail!("need at least {terms} rows to fit degree {degree}, got {n}");
    }

    let design = DMatrix::from_fn(n, terms, |i, j| x[i].powi(j as i32));
    let response = DVector::from_column_slice(y);

    let svd = design.clone().svd(true, true);
    let solution = svd
        .solve(&response, 1e-14)
        .map_err(|e| anyhow!("least-squares solve failed: {e}"))?;
    let fitted_vec = &design * &solution;

    let fitted: Vec<f64> = fitted_vec.iter().copied().collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(&obs, &fit)| obs - fit).collect();

    let mean = y.iter().sum::<f64>() / n as f64;
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot: f64 = y.iter().map(|&v| (v - mean) * (v - mean)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };
    let adj_r_squared = if n > terms {
        1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / (n - terms) as f64
    } else {
        f64::NAN
    };
    let rmse = (ss_res / n as f64).sqrt();

    Ok(PolynomialFit {
        coefficients: solution.iter().copied().collect(),
        fitted,
        residuals,
        r_squared,
        adj_r_squared,
        rmse,
    })
}

/// Evaluate a polynomial with ascending coefficients (intercept first).
pub fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}

/// Print the statsmodels-style summary block for one weight column.
pub fn print_fit_summary(name: &str, degree: usize, temperature: &[f64], observed: &[f64], fit: &PolynomialFit) {
    println!();
    println!("==============================");
    println!("  MODEL FOR {name}: poly(T, {degree})");
    println!("==============================");
    println!(
        "rows: {}   R^2: {:.6}   adj R^2: {:.6}   RMSE: {}",
        temperature.len(),
        fit.r_squared,
        fit.adj_r_squared,
        format_exp(fit.rmse)
    );
    println!("coefficients:");
    for (power, coefficient) in fit.coefficients.iter().enumerate() {
        println!("  T^{power}: {:>15}", format_exp(*coefficient));
    }
    println!("{:>8}  {:>15}  {:>15}  {:>15}", "T", "observed", "fitted", "residual");
    for (i, &t) in temperature.iter().enumerate() {
        println!(
            "{t:>8}  {:>15}  {:>15}  {:>15}",
            format_exp(observed[i]),
            format_exp(fit.fitted[i]),
            format_exp(fit.residuals[i])
        );
    }
}

// ---------------------------------------------------------------------------
// Emissivity error metrics
// ---------------------------------------------------------------------------

/// Point-by-point comparison of a model emissivity against a line-by-line
/// reference.
#[derive(Debug, Clone)]
pub struct ErrorMetrics {
    /// model - reference.
    pub diff: Vec<f64>,
    /// diff / reference.
    pub relative: Vec<f64>,
    /// diff / mean(|model|, |reference|).
    pub symmetric: Vec<f64>,
    pub rmse: f64,
    pub mae: f64,
    pub max_abs: f64,
}

/// Compute the error metrics. Both slices must be the same length (callers
/// validate against the shared temperature axis first).
pub fn error_metrics(reference: &[f64], model: &[f64]) -> ErrorMetrics {
    assert_eq!(reference.len(), model.len(), "emissivity columns must be the same length");
    let diff: Vec<f64> = model.iter().zip(reference).map(|(&m, &r)| m - r).collect();
    let relative: Vec<f64> = diff.iter().zip(reference).map(|(&d, &r)| d / r).collect();
    let symmetric: Vec<f64> = diff
        .iter()
        .zip(model.iter().zip(reference))
        .map(|(&d, (&m, &r))| d / ((m.abs() + r.abs()) / 2.0))
        .collect();

    let n = diff.len().max(1) as f64;
    let rmse = (diff.iter().map(|d| d * d).sum::<f64>() / n).sqrt();
    let mae = diff.iter().map(|d| d.abs()).sum::<f64>() / n;
    let max_abs = diff.iter().map(|d| d.abs()).fold(0.0, f64::max);

    ErrorMetrics {
        diff,
        relative,
        symmetric,
        rmse,
        mae,
        max_abs,
    }
}

/// Print one comparison table: per-point rows, then the aggregate error
/// figures.
pub fn print_error_table(
    label: &str,
    temperature: &[f64],
    reference: &[f64],
    model: &[f64],
    metrics: &ErrorMetrics,
) {
    println!();
    println!("{}", "=".repeat(70));
    println!("{label}");
    println!("{}", "=".repeat(70));
    println!(
        "{:>8}  {:>12}  {:>12}  {:>13}  {:>9}  {:>9}",
        "T [K]", "LBL", "WSGG", "diff", "rel [%]", "sym [%]"
    );
    for (i, &t) in temperature.iter().enumerate() {
        println!(
            "{t:>8}  {:>12.9}  {:>12.9}  {:>13}  {:>9.4}  {:>9.4}",
            reference[i],
            model[i],
            format_exp(metrics.diff[i]),
            metrics.relative[i] * 100.0,
            metrics.symmetric[i] * 100.0
        );
    }
    println!(
        "RMSE: {}   MAE: {}   MAX_ABS: {}",
        format_exp(metrics.rmse),
        format_exp(metrics.mae),
        format_exp(metrics.max_abs)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    // -- Table parsing --

    #[test]
    fn parses_decimal_comma_table() {
        let text = "b1;b2;T\n0,21;0,27;400\n0,18;0,22;500\n";
        let table = parse_weight_table(text.as_bytes(), b';', true).unwrap();
        assert_eq!(table.temperature, vec![400.0, 500.0]);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].0, "b1");
        assert_eq!(table.columns[0].1, vec![0.21, 0.18]);
        assert_eq!(table.columns[1].1, vec![0.27, 0.22]);
    }

    #[test]
    fn missing_temperature_column_is_an_error() {
        let text = "b1;b2\n0.1;0.2\n";
        let err = parse_weight_table(text.as_bytes(), b';', false).unwrap_err();
        assert!(format!("{err:#}").contains("'T' column"));
    }

    #[test]
    fn bad_cell_reports_row_and_column() {
        let text = "T;b1\n400;0.1\n500;oops\n";
        let err = parse_weight_table(text.as_bytes(), b';', false).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("row 1"), "{message}");
        assert!(message.contains("b1"), "{message}");
    }

    // -- Polynomial fit --

    #[test]
    fn recovers_exact_quartic() {
        let coefficients = [1.0, -0.5, 0.25, -0.125, 0.0625];
        let x: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| evaluate(&coefficients, v)).collect();

        let fit = fit_polynomial(&x, &y, 4).unwrap();
        for (got, want) in fit.coefficients.iter().zip(&coefficients) {
            assert_close(*got, *want, 1e-8);
        }
        assert_close(fit.r_squared, 1.0, 1e-12);
        assert!(fit.rmse < 1e-9);
    }

    #[test]
    fn recovers_exact_line() {
        let x = [400.0, 600.0, 800.0, 1000.0];
        let y: Vec<f64> = x.iter().map(|&v| 2.0 * v + 1.0).collect();
        let fit = fit_polynomial(&x, &y, 1).unwrap();
        assert_close(fit.coefficients[0], 1.0, 1e-8);
        assert_close(fit.coefficients[1], 2.0, 1e-10);
    }

    #[test]
    fn imperfect_fit_has_residuals() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 0.0];
        let fit = fit_polynomial(&x, &y, 1).unwrap();
        assert!(fit.r_squared < 1.0);
        assert!(fit.rmse > 0.0);
        // Residuals sum to ~0 for a fit with an intercept.
        assert_close(fit.residuals.iter().sum::<f64>(), 0.0, 1e-12);
    }

    #[test]
    fn too_few_rows_rejected() {
        let err = fit_polynomial(&[1.0, 2.0], &[1.0, 2.0], 4).unwrap_err();
        assert!(err.to_string().contains("at least 5 rows"));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        assert!(fit_polynomial(&[1.0], &[1.0, 2.0], 1).is_err());
    }

    // -- Error metrics --

    #[test]
    fn metrics_match_hand_computation() {
        let metrics = error_metrics(&[1.0, 2.0], &[1.1, 1.8]);
        assert_close(metrics.diff[0], 0.1, 1e-12);
        assert_close(metrics.diff[1], -0.2, 1e-12);
        assert_close(metrics.relative[0], 0.1, 1e-12);
        assert_close(metrics.relative[1], -0.1, 1e-12);
        assert_close(metrics.symmetric[0], 0.1 / 1.05, 1e-12);
        assert_close(metrics.symmetric[1], -0.2 / 1.9, 1e-12);
        assert_close(metrics.mae, 0.15, 1e-12);
        assert_close(metrics.rmse, 0.025_f64.sqrt(), 1e-12);
        assert_close(metrics.max_abs, 0.2, 1e-12);
    }

    #[test]
    fn perfect_model_has_zero_errors() {
        let metrics = error_metrics(&[0.5, 0.7], &[0.5, 0.7]);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.max_abs, 0.0);
    }
}
