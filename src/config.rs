use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::convert::{CoefficientUnit, ThermodynamicState};
use crate::data::model::Quantity;
use crate::grid::WavenumberGrid;

// ---------------------------------------------------------------------------
// Job files
// ---------------------------------------------------------------------------
//
// Every pipeline is driven by a small JSON job document instead of
// hardcoded top-of-file constants: paths, the thermodynamic state, the unit
// selector and the grid are all plain data handed to the conversion
// functions.

/// Load and deserialize a JSON job file.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading job file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing job file {}", path.display()))
}

/// ExoMol cross-section file → absorption-coefficient file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub state: ThermodynamicState,
    /// Optional κ preview chart.
    #[serde(default)]
    pub chart: Option<PathBuf>,
}

/// HITRAN coefficient export → cross-section file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub state: ThermodynamicState,
    pub unit: CoefficientUnit,
    #[serde(default)]
    pub grid: WavenumberGrid,
    #[serde(default)]
    pub chart: Option<PathBuf>,
}

/// On-disk layout of one spectral source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Two whitespace columns: wavenumber, value (ExoMol style).
    #[default]
    TwoColumn,
    /// Single coefficient column, wavenumber axis rebuilt from the grid
    /// (HITRAN export style).
    Hitran,
}

/// One series in a comparison chart.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSource {
    pub path: PathBuf,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub format: SourceFormat,
    /// Required when a HITRAN source must be reconciled to cross-sections.
    #[serde(default)]
    pub state: Option<ThermodynamicState>,
    #[serde(default)]
    pub unit: Option<CoefficientUnit>,
    #[serde(default)]
    pub grid: WavenumberGrid,
}

impl SeriesSource {
    /// Explicit label, or the file stem as a fallback.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string()),
        }
    }
}

/// Overlay chart of N sources.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotJob {
    pub output: PathBuf,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub title: Option<String>,
    /// Wavenumber window; data bounds when omitted.
    #[serde(default)]
    pub window: Option<(f64, f64)>,
    pub sources: Vec<SeriesSource>,
}

/// Stacked two-panel coefficient comparison.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelsJob {
    pub output: PathBuf,
    pub top: SeriesSource,
    pub bottom: SeriesSource,
    #[serde(default = "default_window")]
    pub window: (f64, f64),
}

fn default_window() -> (f64, f64) {
    (50.0, 10000.0)
}

/// WSGG gray-gas weight regression.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WsggJob {
    pub table: PathBuf,
    #[serde(default = "default_degree")]
    pub degree: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub decimal_comma: bool,
    /// Directory for per-column observed-vs-fitted charts.
    #[serde(default)]
    pub chart_dir: Option<PathBuf>,
}

fn default_degree() -> usize {
    4
}

fn default_delimiter() -> char {
    ';'
}

impl WsggJob {
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("table delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}

/// One LBL-vs-WSGG emissivity comparison over a shared temperature axis.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissivityCase {
    pub label: String,
    pub lbl: Vec<f64>,
    pub wsgg: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissivityJob {
    pub temperature: Vec<f64>,
    pub cases: Vec<EmissivityCase>,
    #[serde(default)]
    pub chart: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_job_from_json() {
        let job: ConvertJob = serde_json::from_str(
            r#"{
                "input": "xsec_1200K.txt",
                "output": "kappa_1200K.txt",
                "state": { "temperature": 1200.0, "pressure": 1.0, "mole_fraction": 1.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(job.state.temperature, 1200.0);
        assert!(job.chart.is_none());
    }

    #[test]
    fn reconcile_job_defaults_to_hitran_mesh() {
        let job: ReconcileJob = serde_json::from_str(
            r#"{
                "input": "kappa.txt",
                "output": "sigma.txt",
                "state": { "temperature": 300.0, "pressure": 1.0, "mole_fraction": 1.0 },
                "unit": "cm^-1 amagat^-1"
            }"#,
        )
        .unwrap();
        assert_eq!(job.grid, WavenumberGrid::default());
        assert_eq!(job.unit, CoefficientUnit::PerCmPerAmagat);
    }

    #[test]
    fn plot_job_source_defaults() {
        let job: PlotJob = serde_json::from_str(
            r#"{
                "output": "chart.png",
                "sources": [
                    { "path": "a.xsec" },
                    { "path": "b.txt", "format": "hitran", "unit": "cm^-1",
                      "state": { "temperature": 300.0, "pressure": 1.0, "mole_fraction": 1.0 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(job.quantity, Quantity::CrossSection);
        assert_eq!(job.sources[0].format, SourceFormat::TwoColumn);
        assert_eq!(job.sources[0].display_label(), "a");
        assert_eq!(job.sources[1].format, SourceFormat::Hitran);
    }

    #[test]
    fn wsgg_job_defaults() {
        let job: WsggJob = serde_json::from_str(r#"{ "table": "weights.csv" }"#).unwrap();
        assert_eq!(job.degree, 4);
        assert_eq!(job.delimiter_byte().unwrap(), b';');
        assert!(!job.decimal_comma);
    }

    #[test]
    fn unknown_job_fields_are_rejected() {
        let result = serde_json::from_str::<WsggJob>(r#"{ "table": "w.csv", "degre": 3 }"#);
        assert!(result.is_err());
    }
}
