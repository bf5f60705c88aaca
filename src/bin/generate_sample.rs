use std::fs::File;
use std::io::{BufWriter, Write};

/// Synthetic input generator: writes a two-column ExoMol-style
/// cross-section file and a single-column HITRAN-style coefficient file,
/// so the converter can be tried without downloading database exports.

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Band model: a handful of Gaussian absorption bands over a flat floor.
/// Band positions loosely follow the NH3 infrared bands.
fn band_spectrum(
    wavenumbers: &[f64],
    bands: &[(f64, f64, f64)],
    floor: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let signal: f64 = bands
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            // Multiplicative jitter keeps every sample positive, as a real
            // cross-section is.
            (signal + floor) * (1.0 + rng.gauss(0.0, noise_level)).abs()
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 50 → 6000 cm^-1, step 1.0
    let wavenumbers: Vec<f64> = (0..=5950).map(|i| 50.0 + i as f64).collect();

    // (center [cm^-1], width [cm^-1], peak amplitude)
    let xsec_bands = [
        (950.0, 60.0, 8.0e-19),
        (1630.0, 90.0, 3.0e-19),
        (3336.0, 70.0, 5.0e-19),
        (5050.0, 120.0, 4.0e-20),
    ];
    let xsec = band_spectrum(&wavenumbers, &xsec_bands, 1.0e-27, 0.05, &mut rng);

    let xsec_path = "sample_xsec_300K.txt";
    write_two_column(xsec_path, &wavenumbers, &xsec).expect("Failed to write cross-section file");

    // Coefficient file: same band shape scaled to bulk-absorption
    // magnitudes, values only (the converter rebuilds the axis).
    let kappa_bands = [
        (950.0, 60.0, 2.0e-2),
        (1630.0, 90.0, 7.5e-3),
        (3336.0, 70.0, 1.2e-2),
        (5050.0, 120.0, 1.0e-3),
    ];
    let kappa = band_spectrum(&wavenumbers, &kappa_bands, 2.5e-11, 0.05, &mut rng);

    let kappa_path = "sample_hitran_300K.txt";
    write_single_column(kappa_path, &kappa).expect("Failed to write coefficient file");

    println!(
        "Wrote {} samples to {xsec_path} and {} values to {kappa_path}",
        wavenumbers.len(),
        kappa.len()
    );
    println!("Grid for the coefficient file: start=50.0, stop=6000.0, step=1.0");
}

fn write_two_column(path: &str, x: &[f64], y: &[f64]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (xi, yi) in x.iter().zip(y) {
        writeln!(out, "{xi:.2} {yi:.8e}")?;
    }
    out.flush()
}

fn write_single_column(path: &str, values: &[f64]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for v in values {
        writeln!(out, "{v:.8e}")?;
    }
    out.flush()
}
