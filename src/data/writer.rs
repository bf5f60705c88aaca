use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::SpectralSeries;

// ---------------------------------------------------------------------------
// Two-column spectral text writer
// ---------------------------------------------------------------------------

/// Write a series as whitespace-delimited text: one `#` header line, then
/// one `wavenumber value` row per sample, both columns in `%.8e`
/// exponential notation.
pub fn write_series(path: &Path, series: &SpectralSeries, header: &str) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# {header}")?;
    for (nu, value) in series.iter() {
        writeln!(out, "{} {}", format_exp(nu), format_exp(value))?;
    }
    out.flush()
        .with_context(|| format!("writing output file {}", path.display()))?;

    log::info!("wrote {} samples to {}", series.len(), path.display());
    Ok(())
}

/// `%.8e`-style formatting: 8 fractional digits, explicit exponent sign,
/// exponent zero-padded to two digits (`2.47900000e+19`, `6.03440000e-02`).
pub fn format_exp(value: f64) -> String {
    let formatted = format!("{value:.8e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // inf / NaN carry no exponent; pass them through.
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_numpy_exponential_format() {
        assert_eq!(format_exp(2.479e19), "2.47900000e+19");
        assert_eq!(format_exp(6.0344e-2), "6.03440000e-02");
        assert_eq!(format_exp(0.0), "0.00000000e+00");
        assert_eq!(format_exp(-1.5), "-1.50000000e+00");
        assert_eq!(format_exp(1e-100), "1.00000000e-100");
    }

    #[test]
    fn infinities_pass_through() {
        assert_eq!(format_exp(f64::INFINITY), "inf");
    }
}
