use std::path::Path;

use anyhow::{Context, Result};

use super::model::SpectralSeries;

// ---------------------------------------------------------------------------
// Spectral text loaders
// ---------------------------------------------------------------------------

/// Load a two-column whitespace-delimited spectral file (ExoMol `.xsec`
/// style): wavenumber [cm⁻¹] ascending, value.
///
/// Blank lines and `#`-prefixed comment lines are skipped.
pub fn load_series(path: &Path) -> Result<SpectralSeries> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading spectral file {}", path.display()))?;
    let series = parse_series(&text)
        .with_context(|| format!("parsing spectral file {}", path.display()))?;
    if series.is_empty() {
        log::warn!("{} holds no data rows", path.display());
    }
    log::info!("loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

/// Load a single-column whitespace-delimited coefficient file (HITRAN
/// export style): one κ value per line, no wavenumber column.
pub fn load_column(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading coefficient file {}", path.display()))?;
    let values = parse_column(&text)
        .with_context(|| format!("parsing coefficient file {}", path.display()))?;
    log::info!("loaded {} values from {}", values.len(), path.display());
    Ok(values)
}

// -- Parsing (separated from I/O so it is directly testable) --

fn parse_series(text: &str) -> Result<SpectralSeries> {
    let mut wavenumber = Vec::new();
    let mut value = Vec::new();

    for (line_no, line) in data_lines(text) {
        let mut fields = line.split_whitespace();
        let nu = fields
            .next()
            .with_context(|| format!("line {line_no}: missing wavenumber column"))?;
        let v = fields
            .next()
            .with_context(|| format!("line {line_no}: missing value column"))?;

        wavenumber.push(parse_float(nu, line_no, "wavenumber")?);
        value.push(parse_float(v, line_no, "value")?);
    }

    Ok(SpectralSeries::new(wavenumber, value))
}

fn parse_column(text: &str) -> Result<Vec<f64>> {
    data_lines(text)
        .map(|(line_no, line)| {
            // First token only; trailing fields on a line are ignored.
            let token = line
                .split_whitespace()
                .next()
                .with_context(|| format!("line {line_no}: empty data line"))?;
            parse_float(token, line_no, "coefficient")
        })
        .collect()
}

/// Non-blank, non-comment lines with their 1-based line numbers.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_float(token: &str, line_no: usize, column: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .with_context(|| format!("line {line_no}: {column} '{token}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_columns() {
        let series = parse_series("50.0 1.0e-21\n50.5 2.0e-21\n").unwrap();
        assert_eq!(series.wavenumbers(), &[50.0, 50.5]);
        assert_eq!(series.values(), &[1.0e-21, 2.0e-21]);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# nu(cm^-1)    sigma(cm^2/molecule)\n\n  \n100.0 1e-20\n";
        let series = parse_series(text).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn reports_line_number_on_bad_token() {
        let err = parse_series("50.0 1e-21\n51.0 oops\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("oops"), "{message}");
    }

    #[test]
    fn rejects_missing_value_column() {
        let err = parse_series("50.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("missing value column"));
    }

    #[test]
    fn parses_single_column() {
        let values = parse_column("1.0e-3\n# comment\n2.5e-2\n").unwrap();
        assert_eq!(values, vec![1.0e-3, 2.5e-2]);
    }

    #[test]
    fn column_loader_takes_first_token() {
        let values = parse_column("1.0 trailing junk\n").unwrap();
        assert_eq!(values, vec![1.0]);
    }
}
