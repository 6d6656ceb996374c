use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

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

/// Monthly random walks per country, with blanks, `*` placeholders, a few
/// annotations and two highlight bands.
fn write_lines(path: &str, rng: &mut SimpleRng) -> Result<usize> {
    let series = ["UK", "France", "Germany", "Italy"];
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).context("invalid start date")?;
    let months = 36;

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let mut header = vec!["date"];
    header.extend(series);
    header.extend(["annotate", "highlight"]);
    writer.write_record(&header)?;

    let mut levels = [100.0_f64; 4];
    for m in 0..months {
        let date = start + Duration::days(30 * m as i64);
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for (i, level) in levels.iter_mut().enumerate() {
            *level += rng.gauss(0.0, 2.5);
            let roll = rng.next_f64();
            let cell = if roll < 0.05 {
                String::new()
            } else if roll < 0.08 {
                "*".to_string()
            } else {
                format!("{:.2}", *level + i as f64 * 5.0)
            };
            record.push(cell);
        }
        record.push(match m {
            6 => "Lockdown".to_string(),
            24 => "Reopening".to_string(),
            _ => String::new(),
        });
        record.push(match m {
            4 | 20 => "begin".to_string(),
            9 | 26 => "end".to_string(),
            _ => String::new(),
        });
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(months)
}

/// Flat name/group/value rows; a few leaves have no group and land
/// directly under the root.
fn write_hierarchy(path: &str, rng: &mut SimpleRng) -> Result<usize> {
    let groups: [(&str, &[&str]); 3] = [
        ("Europe", &["UK", "France", "Germany", "Spain"]),
        ("Asia", &["Japan", "India", "Vietnam"]),
        ("", &["Antarctica", "Oceania"]),
    ];

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["name", "group", "value"])?;

    let mut rows = 0;
    for (group, names) in groups {
        for name in names {
            let value = (rng.next_f64() * 90.0 + 10.0).round();
            writer.write_record([*name, group, value.to_string().as_str()])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let lines_path = "sample_lines.csv";
    let n = write_lines(lines_path, &mut rng)?;
    println!("Wrote {n} dated rows to {lines_path}");

    let hierarchy_path = "sample_hierarchy.csv";
    let n = write_hierarchy(hierarchy_path, &mut rng)?;
    println!("Wrote {n} leaves to {hierarchy_path}");

    Ok(())
}
