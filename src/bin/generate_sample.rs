//! Writes `sample_strain.csv`: an instrument preamble followed by a
//! load/position table whose header sits on row 10.
//!
//! ```text
//! cargo run --bin generate_sample
//! cargo run -- sample_strain.csv --start 10 -x "POSITION mm" -y "LOAD N"
//! ```

use anyhow::{Context, Result};

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

/// Load of a shape-memory wire: linear, a stress plateau, then linear again.
fn strain_curve(position: f64) -> f64 {
    const STIFFNESS: f64 = 400.0;
    const PLATEAU_START: f64 = 0.25;
    const PLATEAU_END: f64 = 1.75;
    const PLATEAU_SLOPE: f64 = 12.0;

    let plateau_load = STIFFNESS * PLATEAU_START;
    if position < PLATEAU_START {
        STIFFNESS * position
    } else if position < PLATEAU_END {
        plateau_load + PLATEAU_SLOPE * (position - PLATEAU_START)
    } else {
        plateau_load
            + PLATEAU_SLOPE * (PLATEAU_END - PLATEAU_START)
            + STIFFNESS * (position - PLATEAU_END)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_strain.csv";

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output_path)
        .context("creating output file")?;

    // Rows 1-9: instrument preamble.
    let preamble: [&[&str]; 9] = [
        &["Test", "Room T 100 microns"],
        &["Instrument", "Tensile stage"],
        &["Specimen", "NiTi wire"],
        &["Diameter", "100 um"],
        &["Gauge length", "20 mm"],
        &["Rate", "0.1 mm/s"],
        &["Temperature", "22 C"],
        &["Operator", "lab"],
        &[],
    ];
    for line in preamble {
        writer.write_record(line)?;
    }

    // Row 10: header.
    writer.write_record(["TIME s", "POSITION mm", "LOAD N"])?;

    let n = 400;
    for i in 0..n {
        let position = 2.0 * i as f64 / n as f64;
        let load = strain_curve(position) + rng.gauss(0.0, 1.5);
        writer.write_record([
            format!("{:.1}", position / 0.1),
            format!("{position:.4}"),
            format!("{load:.3}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n} rows (header on row 10) to {output_path}");
    Ok(())
}
