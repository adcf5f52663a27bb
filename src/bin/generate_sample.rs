//! Writes a synthetic study-data directory (all nine datasets, three
//! geographies) so the dashboard can be run without the private study data:
//!
//! ```sh
//! cargo run --bin generate_sample -- data
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

const GEOGRAPHIES: &[&str] = &["Italy", "Spain", "California"];
const MOBILITY_TYPES: &[&str] = &[
    "Workplace",
    "Transit",
    "Residential",
    "Retail/Recreation",
    "Grocery/Pharmacy",
    "Parks",
];

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

    fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        // Box-Muller
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        mu + sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(20200215);
    let start = NaiveDate::from_ymd_opt(2020, 2, 15).expect("valid date");
    let days = 106; // Feb 15 – May 31 2020

    let mut figure1 = String::from(
        "geography,date,percent_red,percent_red_lower,percent_red_upper,grocery_pharmacy,workplace,residential\n",
    );
    let mut figure12_sip = String::from("geography,date,SIP\n");
    let mut figure2 = String::from(
        "geography,date,percent_red,mars_elec,breakpoint,breakpoint_and_SIP_chg\n",
    );
    let mut table1 = String::from("geography,variable,coefficient,p_value,standard_error\n");
    let mut table2 = String::from("geography,Term,Break Point,Date,Slope After\n");
    let mut table3 =
        String::from("geography,mobility_type_desc,coefficient,standard_error,p_value,R2,N\n");
    let mut table4 = String::from("geography,mobility_type_desc,coefficient,standard_error,p_value\n");
    let mut figure3 = String::from("geography,Day.type,hour,load_median,load_Q10,load_Q90\n");
    let mut table5 = String::from("geography,type_desc,historic,actual\n");

    for (g, geo) in GEOGRAPHIES.iter().enumerate() {
        // Restriction steps: two CI increases at staggered offsets per
        // geography, both of which coincide with demand breakpoints.
        let step1 = 18 + 3 * g;
        let step2 = 34 + 4 * g;
        let recovery = 72 + 2 * g;

        let depth = -0.22 - 0.04 * g as f64;

        let mut percent_red = 0.0;
        for d in 0..days {
            let date = start + chrono::Days::new(d as u64);
            let sip = if d < step1 {
                0
            } else if d < step2 {
                2
            } else {
                3
            };
            writeln!(figure12_sip, "{geo},{date},{sip}").unwrap();

            // Demand trends toward the lockdown depth, then recovers.
            let target = if d < step1 {
                0.0
            } else if d < recovery {
                depth
            } else {
                depth * 0.4
            };
            percent_red += (target - percent_red) * 0.15 + rng.gauss(0.0, 0.01);
            let half_band = 0.03 + rng.next_f64() * 0.01;

            let workplace = (percent_red * 2.2 + rng.gauss(0.0, 0.02)).clamp(-0.9, 0.2);
            let grocery = (percent_red * 1.4 + rng.gauss(0.0, 0.03)).clamp(-0.9, 0.3);
            let residential = (-percent_red * 0.7 + rng.gauss(0.0, 0.01)).clamp(-0.2, 0.5);

            writeln!(
                figure1,
                "{geo},{date},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                percent_red,
                percent_red - half_band,
                percent_red + half_band,
                grocery,
                workplace,
                residential
            )
            .unwrap();

            let mars = percent_red + rng.gauss(0.0, 0.005);
            let is_break = d == step1 || d == step2 || d == recovery;
            let with_sip = d == step1 || d == step2;
            writeln!(
                figure2,
                "{geo},{date},{:.4},{:.4},{},{}",
                percent_red,
                mars,
                is_break as u8,
                with_sip as u8
            )
            .unwrap();
        }

        for level in 1..=3 {
            writeln!(
                table1,
                "{geo},CI level {level},{:.3},{:.3},{:.3}",
                depth * level as f64 / 3.0 + rng.gauss(0.0, 0.01),
                0.001 + rng.next_f64() * 0.05,
                0.01 + rng.next_f64() * 0.03
            )
            .unwrap();
        }

        for (i, day) in [step1, step2, recovery].iter().enumerate() {
            let date = start + chrono::Days::new(*day as u64);
            writeln!(
                table2,
                "{geo},h(t-{day}),{day},{date},{:.4}",
                (if i < 2 { -0.012 } else { 0.004 }) + rng.gauss(0.0, 0.001)
            )
            .unwrap();
        }

        for mobility in MOBILITY_TYPES {
            let coef = rng.gauss(0.2, 0.15);
            writeln!(
                table3,
                "{geo},{mobility},{:.3},{:.3},{:.3},{:.2},{days}",
                coef,
                0.02 + rng.next_f64() * 0.06,
                0.001 + rng.next_f64() * 0.08,
                0.4 + rng.next_f64() * 0.4
            )
            .unwrap();
            writeln!(
                table4,
                "{geo},{mobility},{:.3},{:.3},{:.3}",
                coef * 0.7,
                0.03 + rng.next_f64() * 0.06,
                0.001 + rng.next_f64() * 0.1
            )
            .unwrap();
        }

        let base = 20_000.0 + 4_000.0 * g as f64;
        for (day_type, scale) in [
            ("weekend - Historic (April 2016-2019)", 0.88),
            ("workday - Historic (April 2016-2019)", 1.0),
            ("workday - April 2020", 0.78),
        ] {
            for hour in 0..24 {
                // Double-peaked daily shape.
                let h = hour as f64;
                let shape = 1.0
                    + 0.18 * (-((h - 9.0) / 3.0).powi(2)).exp()
                    + 0.24 * (-((h - 19.5) / 2.5).powi(2)).exp()
                    - 0.12 * (-((h - 3.5) / 2.5).powi(2)).exp();
                let median = base * scale * shape * (1.0 + rng.gauss(0.0, 0.005));
                writeln!(
                    figure3,
                    "{geo},{day_type},{hour},{:.0},{:.0},{:.0}",
                    median,
                    median * 0.93,
                    median * 1.07
                )
                .unwrap();
            }
        }

        for (measure, historic, actual) in [
            ("Peak load (MW)", base * 1.24, base * 1.24 * 0.78),
            ("Baseload (MW)", base * 0.88, base * 0.88 * 0.82),
            ("Peak hour", 19.0, 20.0),
            ("Baseload hour", 4.0, 5.0),
        ] {
            writeln!(table5, "{geo},{measure},{:.0},{:.0}", historic, actual).unwrap();
        }
    }

    for (name, body) in [
        ("figure1", &figure1),
        ("figure12_sip", &figure12_sip),
        ("table1", &table1),
        ("figure2", &figure2),
        ("table2", &table2),
        ("table3", &table3),
        ("table4", &table4),
        ("figure3", &figure3),
        ("table5", &table5),
    ] {
        write_csv(&out_dir, name, body)?;
    }

    println!(
        "Wrote sample data for {} geographies to {}",
        GEOGRAPHIES.len(),
        out_dir.display()
    );
    Ok(())
}

fn write_csv(dir: &Path, name: &str, body: &str) -> std::io::Result<()> {
    std::fs::write(dir.join(format!("{name}.csv")), body)
}
