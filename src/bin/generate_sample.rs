use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// (port, border, longitude, latitude, base monthly volume)
const PORTS: [(&str, &str, f64, f64, f64); 8] = [
    ("San Ysidro", "US-Mexico Border", -117.03, 32.54, 2_400_000.0),
    ("El Paso", "US-Mexico Border", -106.45, 31.76, 1_900_000.0),
    ("Laredo", "US-Mexico Border", -99.51, 27.50, 1_500_000.0),
    ("Nogales", "US-Mexico Border", -110.94, 31.33, 800_000.0),
    ("Detroit", "US-Canada Border", -83.04, 42.33, 1_100_000.0),
    ("Buffalo Niagara Falls", "US-Canada Border", -79.06, 43.09, 900_000.0),
    ("Blaine", "US-Canada Border", -122.75, 49.00, 600_000.0),
    ("Champlain Rouses Point", "US-Canada Border", -73.45, 45.00, 250_000.0),
];

/// One output row, keyed the way the dashboard expects.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Port Name")]
    port: String,
    #[serde(rename = "Border")]
    border: String,
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Value")]
    value: i64,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
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

/// Monthly volume: long-run growth, a summer peak, a 2020 collapse, noise.
fn monthly_volume(base: f64, year: i32, month: usize, rng: &mut SimpleRng) -> i64 {
    let growth = 1.0 + 0.015 * f64::from(year - 2000);
    let season = 1.0 + 0.2 * ((month as f64 - 3.0) / 12.0 * std::f64::consts::TAU).sin();
    let shock = match year {
        2020 if month >= 3 => 0.35,
        2021 => 0.6,
        _ => 1.0,
    };
    let noise = rng.gauss(1.0, 0.05).max(0.5);
    (base * growth * season * shock * noise).round() as i64
}

fn generate(years: std::ops::RangeInclusive<i32>) -> Vec<SampleRow> {
    let mut rng = SimpleRng::new(42);
    let mut rows = Vec::new();
    for year in years {
        for (m, month) in MONTHS.iter().enumerate() {
            for &(port, border, lon, lat, base) in &PORTS {
                rows.push(SampleRow {
                    port: port.to_string(),
                    border: border.to_string(),
                    month: month.to_string(),
                    year: year.to_string(),
                    value: monthly_volume(base, year, m, &mut rng),
                    latitude: lat,
                    longitude: lon,
                });
            }
        }
    }
    rows
}

fn write_parquet(rows: &[SampleRow], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Port Name", DataType::Utf8, false),
        Field::new("Border", DataType::Utf8, false),
        Field::new("Month", DataType::Utf8, false),
        Field::new("Year", DataType::Utf8, false),
        Field::new("Value", DataType::Int64, false),
        Field::new("Latitude", DataType::Float64, false),
        Field::new("Longitude", DataType::Float64, false),
    ]));

    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<ArrayRef> = vec![
        text(|r| &r.port),
        text(|r| &r.border),
        text(|r| &r.month),
        text(|r| &r.year),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.value).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("opening parquet writer")?;
    writer.write(&batch).context("writing parquet")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("static/json"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let rows = generate(1996..=2023);

    let json_path = out_dir.join("data.json");
    let json = serde_json::to_string(&rows).context("serialising rows")?;
    fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;
    log::info!("Wrote {} rows to {}", rows.len(), json_path.display());

    let parquet_path = out_dir.join("data.parquet");
    write_parquet(&rows, &parquet_path)?;
    log::info!("Wrote {} rows to {}", rows.len(), parquet_path.display());

    println!(
        "Generated {} crossing records in {}",
        rows.len(),
        out_dir.display()
    );
    Ok(())
}
