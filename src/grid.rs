use serde::Deserialize;

use crate::data::model::SpectralSeries;

// ---------------------------------------------------------------------------
// Wavenumber grid reconstruction
// ---------------------------------------------------------------------------

/// Uniform ascending wavenumber grid, used to rebuild the spectral axis of
/// HITRAN-style coefficient files (which store no wavenumber column).
///
/// Defaults to the fixed HITRAN export mesh: 50.0 → 10000.0 cm⁻¹ in steps
/// of 0.01.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WavenumberGrid {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Default for WavenumberGrid {
    fn default() -> Self {
        WavenumberGrid {
            start: 50.0,
            stop: 10000.0,
            step: 0.01,
        }
    }
}

impl WavenumberGrid {
    /// Materialize the grid points: start, start+step, … up to stop
    /// inclusive (the endpoint test uses a half-step margin, so `stop`
    /// itself is included even under floating-point drift).
    pub fn points(&self) -> Vec<f64> {
        let limit = self.stop + self.step / 2.0;
        let count = ((limit - self.start) / self.step).ceil();
        if !count.is_finite() || count <= 0.0 {
            return Vec::new();
        }
        let count = count as usize;
        (0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    /// Pair the grid with a coefficient column, truncating BOTH sides to the
    /// shorter length before zipping.
    ///
    /// Trailing unmatched samples are dropped silently (only logged): the
    /// exported files this tool consumes are occasionally one sample short
    /// of the nominal mesh, and a length mismatch must not abort the run.
    pub fn pair_with(&self, values: Vec<f64>) -> SpectralSeries {
        let mut grid = self.points();
        let mut values = values;
        let shorter = grid.len().min(values.len());
        if grid.len() != values.len() {
            log::warn!(
                "grid/value length mismatch ({} grid points, {} values): keeping first {}",
                grid.len(),
                values.len(),
                shorter
            );
        }
        grid.truncate(shorter);
        values.truncate(shorter);
        SpectralSeries::new(grid, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mesh_includes_endpoint() {
        let grid = WavenumberGrid::default();
        let points = grid.points();
        assert_eq!(points.len(), 995_001);
        assert_eq!(points[0], 50.0);
        let last = *points.last().unwrap();
        assert!((last - 10000.0).abs() < 1e-6, "last point {last}");
    }

    #[test]
    fn unit_step_grid() {
        let grid = WavenumberGrid {
            start: 0.0,
            stop: 6.0,
            step: 1.0,
        };
        assert_eq!(grid.points(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn shorter_value_column_truncates_grid() {
        let grid = WavenumberGrid {
            start: 0.0,
            stop: 6.0,
            step: 1.0,
        };
        let series = grid.pair_with(vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(series.len(), 5);
        assert_eq!(series.wavenumbers(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(series.values(), &[0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn shorter_grid_truncates_values() {
        let grid = WavenumberGrid {
            start: 0.0,
            stop: 2.0,
            step: 1.0,
        };
        let series = grid.pair_with(vec![9.0; 10]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.wavenumbers(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn equal_lengths_pass_through() {
        let grid = WavenumberGrid {
            start: 1.0,
            stop: 3.0,
            step: 1.0,
        };
        let series = grid.pair_with(vec![7.0, 8.0, 9.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn degenerate_step_yields_empty_grid() {
        let grid = WavenumberGrid {
            start: 10.0,
            stop: 5.0,
            step: 1.0,
        };
        assert!(grid.points().is_empty());
        assert!(grid.pair_with(vec![1.0, 2.0]).is_empty());
    }
}
