//! Writes `sample_sales.csv`, a small monthly business table for trying the app.

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const REGIONS: [&str; 3] = ["North", "South", "West"];

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

    let output_path = "sample_sales.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["Month", "Region", "Revenue", "Expenses", "Customers", "Margin"])
        .expect("Failed to write header");

    // Revenue grows through the year with a summer bump; expenses track it loosely.
    for (i, month) in MONTHS.iter().enumerate() {
        let season = (i as f64 / 12.0 * 2.0 * std::f64::consts::PI).sin();
        let revenue = (12_000.0 + 650.0 * i as f64 + 1_500.0 * season + rng.gauss(0.0, 400.0)).round();
        let expenses = (0.62 * revenue + rng.gauss(0.0, 300.0)).round();
        let customers = (180.0 + 9.0 * i as f64 + rng.gauss(0.0, 12.0)).round() as i64;
        let margin = (revenue - expenses) / revenue;
        let region = REGIONS[i % REGIONS.len()];

        writer
            .write_record([
                month.to_string(),
                region.to_string(),
                format!("{revenue:.0}"),
                format!("{expenses:.0}"),
                customers.to_string(),
                format!("{margin:.3}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");

    println!("Wrote {} months to {output_path}", MONTHS.len());
}
