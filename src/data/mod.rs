/// Data layer: spectral series type and text-file I/O.
///
/// Architecture:
/// ```text
///  ExoMol .xsec (2 col)      HITRAN export (1 col)
///        │                         │
///        ▼                         ▼
///   ┌──────────┐              ┌──────────┐
///   │  loader   │              │  loader   │  values only; axis rebuilt
///   └──────────┘              └──────────┘  by grid::WavenumberGrid
///        │                         │
///        ▼                         ▼
///   ┌────────────────────────────────────┐
///   │           SpectralSeries            │  (wavenumber, value) pairs
///   └────────────────────────────────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐              ┌──────────┐
///   │  writer   │              │   plot    │  %.8e text / PNG chart
///   └──────────┘              └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
