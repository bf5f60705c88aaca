use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::data::model::SpectralSeries;

// ---------------------------------------------------------------------------
// Reference condition
// ---------------------------------------------------------------------------

/// Loschmidt number density at 296 K and 1 atm [molecules/cm³].
pub const LOSCHMIDT_296: f64 = 2.479e19;

/// Reference temperature of [`LOSCHMIDT_296`] [K].
pub const REFERENCE_TEMPERATURE: f64 = 296.0;

/// 1 atm expressed in bar.
pub const ATM_IN_BAR: f64 = 1.01325;

// ---------------------------------------------------------------------------
// Thermodynamic state
// ---------------------------------------------------------------------------

/// Gas state under which a coefficient was (or is to be) evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ThermodynamicState {
    /// Temperature [K].
    pub temperature: f64,
    /// Total pressure [bar].
    pub pressure: f64,
    /// Mole fraction of the absorbing species, in (0, 1].
    pub mole_fraction: f64,
}

impl fmt::Display for ThermodynamicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T = {} K, p = {} bar, Y = {}",
            Sig(self.temperature),
            Sig(self.pressure),
            Sig(self.mole_fraction)
        )
    }
}

/// Compact float display (no trailing zeros), for labels and logs.
struct Sig(f64);

impl fmt::Display for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == self.0.trunc() && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Coefficient unit conventions
// ---------------------------------------------------------------------------

/// The two coefficient conventions accepted when ingesting HITRAN-style data.
///
/// The literal spellings `"cm^-1"` and `"cm^-1 amagat^-1"` are the external
/// compatibility surface: job files and `FromStr` accept exactly these two
/// strings, anything else is [`ConvertError::UnrecognizedUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CoefficientUnit {
    /// Coefficient evaluated at the actual (T, p) of the measurement.
    #[serde(rename = "cm^-1")]
    PerCm,
    /// Coefficient normalised per amagat; depends only on the reference
    /// density, not on T or p.
    #[serde(rename = "cm^-1 amagat^-1")]
    PerCmPerAmagat,
}

impl CoefficientUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoefficientUnit::PerCm => "cm^-1",
            CoefficientUnit::PerCmPerAmagat => "cm^-1 amagat^-1",
        }
    }
}

impl fmt::Display for CoefficientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoefficientUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm^-1" => Ok(CoefficientUnit::PerCm),
            "cm^-1 amagat^-1" => Ok(CoefficientUnit::PerCmPerAmagat),
            other => Err(ConvertError::UnrecognizedUnit(other.to_string())),
        }
    }
}

/// Errors raised by the unit-conversion layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("unrecognized coefficient unit {0:?}: expected \"cm^-1\" or \"cm^-1 amagat^-1\"")]
    UnrecognizedUnit(String),
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Gas number density N(T, p) [molecules/cm³] from ideal-gas scaling of the
/// reference condition: N₀ · (p/1 atm) · (296 K / T).
///
/// No range check is performed: `temperature == 0.0` yields an infinite
/// density, mirroring the behavior of the data this tool was built against.
/// Callers that cannot tolerate that must guard beforehand.
pub fn number_density(pressure_bar: f64, temperature: f64) -> f64 {
    let pressure_atm = pressure_bar / ATM_IN_BAR;
    LOSCHMIDT_296 * pressure_atm * (REFERENCE_TEMPERATURE / temperature)
}

/// Convert a cross-section series σ(ν̃) [cm²/molecule] into an absorption
/// coefficient series κ(ν̃) [cm⁻¹]: κ = N(T,p) · Y · σ.
///
/// Element-wise and order-preserving; the wavenumber grid is carried over
/// unchanged.
pub fn cross_section_to_coefficient(
    series: &SpectralSeries,
    state: &ThermodynamicState,
) -> SpectralSeries {
    let density = number_density(state.pressure, state.temperature);
    let values = series
        .values()
        .iter()
        .map(|&sigma| density * state.mole_fraction * sigma)
        .collect();
    SpectralSeries::new(series.wavenumbers().to_vec(), values)
}

/// Convert HITRAN-style coefficient values into cross-sections
/// [cm²/molecule], honoring the coefficient's unit convention:
///
/// * [`CoefficientUnit::PerCmPerAmagat`]: σ = κ / (N₀ · Y), independent of
///   the state's temperature and pressure.
/// * [`CoefficientUnit::PerCm`]: σ = κ / (N(T,p) · Y).
pub fn coefficient_to_cross_section(
    kappa: &[f64],
    state: &ThermodynamicState,
    unit: CoefficientUnit,
) -> Vec<f64> {
    let density = match unit {
        CoefficientUnit::PerCmPerAmagat => LOSCHMIDT_296,
        CoefficientUnit::PerCm => number_density(state.pressure, state.temperature),
    };
    kappa
        .iter()
        .map(|&k| k / (density * state.mole_fraction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
        let scale = expected.abs().max(f64::MIN_POSITIVE);
        assert!(
            ((actual - expected) / scale).abs() < rel_tol,
            "expected {expected}, got {actual}"
        );
    }

    fn state(temperature: f64, pressure: f64, mole_fraction: f64) -> ThermodynamicState {
        ThermodynamicState {
            temperature,
            pressure,
            mole_fraction,
        }
    }

    // -- Number density --

    #[test]
    fn reference_condition_identity() {
        assert_close(number_density(ATM_IN_BAR, 296.0), LOSCHMIDT_296, 1e-14);
    }

    #[test]
    fn density_linear_in_pressure() {
        let full = number_density(2.0, 500.0);
        let half = number_density(1.0, 500.0);
        assert_close(half, full / 2.0, 1e-14);
    }

    #[test]
    fn density_inverse_in_temperature() {
        let cold = number_density(1.0, 400.0);
        let hot = number_density(1.0, 800.0);
        assert_close(hot, cold / 2.0, 1e-14);
    }

    #[test]
    fn zero_temperature_yields_infinity() {
        assert!(number_density(1.0, 0.0).is_infinite());
    }

    // -- Forward conversion --

    #[test]
    fn flame_condition_scenario() {
        // T = 1200 K, p = 1 bar, Y = 1:
        // N = 2.479e19 / 1.01325 * (296 / 1200) ≈ 6.0349e18, so a
        // σ = 1e-20 sample maps to κ ≈ 6.0349e-2.
        let st = state(1200.0, 1.0, 1.0);
        let density = number_density(st.pressure, st.temperature);
        assert_close(density, 6.0349e18, 1e-4);

        let series = SpectralSeries::new(vec![1000.0], vec![1e-20]);
        let kappa = cross_section_to_coefficient(&series, &st);
        assert_close(kappa.values()[0], 6.0349e-2, 1e-4);
    }

    #[test]
    fn conversion_preserves_grid_and_order() {
        let series = SpectralSeries::new(vec![50.0, 60.0, 70.0], vec![1e-22, 3e-21, 2e-23]);
        let kappa = cross_section_to_coefficient(&series, &state(300.0, 1.0, 0.5));
        assert_eq!(kappa.wavenumbers(), series.wavenumbers());
        assert_eq!(kappa.len(), 3);
        // Larger σ maps to larger κ at fixed state.
        assert!(kappa.values()[1] > kappa.values()[0]);
        assert!(kappa.values()[0] > kappa.values()[2]);
    }

    // -- Inverse conversion --

    #[test]
    fn round_trip_recovers_cross_sections() {
        let sigma = vec![1e-25, 4.2e-21, 7.7e-19, 3.3e-24];
        let series = SpectralSeries::new(vec![100.0, 200.0, 300.0, 400.0], sigma.clone());
        let st = state(950.0, 2.5, 0.8);

        let kappa = cross_section_to_coefficient(&series, &st);
        let back = coefficient_to_cross_section(kappa.values(), &st, CoefficientUnit::PerCm);

        for (orig, recovered) in sigma.iter().zip(&back) {
            assert_close(*recovered, *orig, 1e-12);
        }
    }

    #[test]
    fn amagat_branch_ignores_state() {
        let kappa = [1e-3, 5e-2];
        let a = coefficient_to_cross_section(
            &kappa,
            &state(300.0, 1.0, 0.5),
            CoefficientUnit::PerCmPerAmagat,
        );
        let b = coefficient_to_cross_section(
            &kappa,
            &state(1800.0, 40.0, 0.5),
            CoefficientUnit::PerCmPerAmagat,
        );
        assert_eq!(a, b);
        assert_close(a[0], 1e-3 / (LOSCHMIDT_296 * 0.5), 1e-14);
    }

    #[test]
    fn per_cm_branch_tracks_state() {
        let kappa = [1e-3];
        let a = coefficient_to_cross_section(&kappa, &state(300.0, 1.0, 1.0), CoefficientUnit::PerCm);
        let b = coefficient_to_cross_section(&kappa, &state(600.0, 1.0, 1.0), CoefficientUnit::PerCm);
        // Halving the density doubles the inferred cross-section.
        assert_close(b[0], a[0] * 2.0, 1e-12);
    }

    // -- Unit parsing --

    #[test]
    fn unit_literals_round_trip() {
        assert_eq!("cm^-1".parse::<CoefficientUnit>(), Ok(CoefficientUnit::PerCm));
        assert_eq!(
            "cm^-1 amagat^-1".parse::<CoefficientUnit>(),
            Ok(CoefficientUnit::PerCmPerAmagat)
        );
        assert_eq!(CoefficientUnit::PerCm.as_str(), "cm^-1");
        assert_eq!(CoefficientUnit::PerCmPerAmagat.as_str(), "cm^-1 amagat^-1");
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = "foo".parse::<CoefficientUnit>().unwrap_err();
        assert_eq!(err, ConvertError::UnrecognizedUnit("foo".to_string()));
        let message = err.to_string();
        assert!(message.contains("cm^-1"));
        assert!(message.contains("cm^-1 amagat^-1"));
    }

    #[test]
    fn unit_deserializes_from_job_literals() {
        let unit: CoefficientUnit = serde_json::from_str("\"cm^-1 amagat^-1\"").unwrap();
        assert_eq!(unit, CoefficientUnit::PerCmPerAmagat);
        assert!(serde_json::from_str::<CoefficientUnit>("\"amagat\"").is_err());
    }
}
