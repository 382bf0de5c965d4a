use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

const OUTPUT_PATH: &str = "data/car_price_prediction_.csv";
const LISTINGS: usize = 2_500;

const CATALOG: &[(&str, &[&str])] = &[
    ("Audi", &["A3", "A4", "Q5", "Q7"]),
    ("BMW", &["3 Series", "5 Series", "X3", "X5"]),
    ("Ford", &["Explorer", "Fiesta", "Focus", "Mustang"]),
    ("Honda", &["Accord", "CR-V", "Civic", "Fit"]),
    ("Mercedes", &["C-Class", "E-Class", "GLA", "GLC"]),
    ("Tesla", &["Model 3", "Model S", "Model X", "Model Y"]),
    ("Toyota", &["Camry", "Corolla", "Prius", "RAV4"]),
];
const FUEL_TYPES: &[&str] = &["Diesel", "Electric", "Hybrid", "Petrol"];
const TRANSMISSIONS: &[&str] = &["Automatic", "Manual"];
const CONDITIONS: &[&str] = &["Like New", "New", "Used"];

/// One output row, in the column order of the public dataset.
#[derive(Serialize)]
struct Listing<'a> {
    #[serde(rename = "Car ID")]
    car_id: usize,
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Engine Size")]
    engine_size: f64,
    #[serde(rename = "Fuel Type")]
    fuel_type: &'a str,
    #[serde(rename = "Transmission")]
    transmission: &'a str,
    #[serde(rename = "Mileage")]
    mileage: u32,
    #[serde(rename = "Condition")]
    condition: &'a str,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Model")]
    model: &'a str,
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Write `count` listings to `writer`, deterministic for a given seed.
fn write_listings<W: Write>(writer: &mut csv::Writer<W>, seed: u64, count: usize) -> Result<()> {
    let mut rng = SimpleRng::new(seed);

    for car_id in 1..=count {
        let (brand, models) = *rng.pick(CATALOG);
        let model = *rng.pick(models);
        let year = 2000 + (rng.next_u64() % 24) as u32;
        let condition = *rng.pick(CONDITIONS);

        let age = (2024 - year) as f64;
        let mileage = match condition {
            "New" => rng.range(0.0, 500.0),
            _ => (age * rng.range(6_000.0, 14_000.0)).min(300_000.0),
        };

        // Newer, less driven cars are worth more; the rest is noise.
        let base = rng.range(20_000.0, 90_000.0);
        let price = (base * (1.0 - age * 0.025) * (1.0 - mileage / 600_000.0)).max(3_000.0);

        writer.serialize(Listing {
            car_id,
            brand,
            year,
            engine_size: (rng.range(1.0, 6.0) * 10.0).round() / 10.0,
            fuel_type: *rng.pick(FUEL_TYPES),
            transmission: *rng.pick(TRANSMISSIONS),
            mileage: mileage.round() as u32,
            condition,
            price: (price * 100.0).round() / 100.0,
            model,
        })?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    if let Some(dir) = Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(OUTPUT_PATH).with_context(|| format!("creating {OUTPUT_PATH}"))?;
    write_listings(&mut writer, 42, LISTINGS)?;

    println!("Wrote {LISTINGS} listings to {OUTPUT_PATH}");
    Ok(())
}
