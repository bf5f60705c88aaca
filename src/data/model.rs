use serde::Deserialize;

// ---------------------------------------------------------------------------
// Quantity – what the value column of a series means
// ---------------------------------------------------------------------------

/// Physical meaning of a series' value column. The two flavors share the
/// same representation and differ only in units and axis labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quantity {
    /// Per-molecule absorption cross-section σ [cm²/molecule].
    #[default]
    CrossSection,
    /// Bulk absorption coefficient κ [cm⁻¹].
    Coefficient,
}

impl Quantity {
    /// Axis label for charts.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Quantity::CrossSection => "Cross-section (cm^2/molecule)",
            Quantity::Coefficient => "Absorption coefficient (cm^-1)",
        }
    }

    /// Column label for output-file headers.
    pub fn column_label(&self) -> &'static str {
        match self {
            Quantity::CrossSection => "sigma(cm^2/molecule)",
            Quantity::Coefficient => "kappa(cm^-1)",
        }
    }
}

// ---------------------------------------------------------------------------
// SpectralSeries – one spectrum
// ---------------------------------------------------------------------------

/// An ordered spectral series: equal-length wavenumber and value columns,
/// wavenumbers ascending (assumed from the source, not validated).
///
/// Series are immutable value objects: read once, transformed into *new*
/// series, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSeries {
    wavenumber: Vec<f64>,
    value: Vec<f64>,
}

impl SpectralSeries {
    /// Build a series from paired columns.
    ///
    /// Panics if the columns differ in length; callers at the file boundary
    /// check lengths and report a proper error before constructing.
    pub fn new(wavenumber: Vec<f64>, value: Vec<f64>) -> Self {
        assert_eq!(
            wavenumber.len(),
            value.len(),
            "spectral series columns must be the same length"
        );
        SpectralSeries { wavenumber, value }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }

    /// Wavenumber column [cm⁻¹].
    pub fn wavenumbers(&self) -> &[f64] {
        &self.wavenumber
    }

    /// Value column (cross-section or coefficient, per context).
    pub fn values(&self) -> &[f64] {
        &self.value
    }

    /// Iterate (wavenumber, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavenumber
            .iter()
            .copied()
            .zip(self.value.iter().copied())
    }

    /// New series restricted to wavenumbers in `[lo, hi]` (inclusive).
    pub fn window(&self, lo: f64, hi: f64) -> SpectralSeries {
        let (wavenumber, value) = self
            .iter()
            .filter(|&(nu, _)| nu >= lo && nu <= hi)
            .unzip();
        SpectralSeries { wavenumber, value }
    }

    /// Replace the value column, keeping the grid.
    pub fn with_values(self, value: Vec<f64>) -> SpectralSeries {
        SpectralSeries::new(self.wavenumber, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_inclusive_range() {
        let series = SpectralSeries::new(
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        );
        let cut = series.window(20.0, 40.0);
        assert_eq!(cut.wavenumbers(), &[20.0, 30.0, 40.0]);
        assert_eq!(cut.values(), &[2.0, 3.0, 4.0]);
        // Source series untouched.
        assert_eq!(series.len(), 5);
    }

    #[test]
    fn window_can_be_empty() {
        let series = SpectralSeries::new(vec![10.0, 20.0], vec![1.0, 2.0]);
        assert!(series.window(100.0, 200.0).is_empty());
    }

    #[test]
    fn with_values_keeps_grid() {
        let series = SpectralSeries::new(vec![1.0, 2.0], vec![0.0, 0.0]);
        let replaced = series.with_values(vec![5.0, 6.0]);
        assert_eq!(replaced.wavenumbers(), &[1.0, 2.0]);
        assert_eq!(replaced.values(), &[5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn mismatched_columns_panic() {
        SpectralSeries::new(vec![1.0], vec![1.0, 2.0]);
    }
}
