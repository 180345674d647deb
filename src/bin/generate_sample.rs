use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated launch, with the column names of the real launch table.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

/// Booster generations in flight order: (category, flights, success rate,
/// typical payload ceiling in kg).
const ERAS: [(&str, usize, f64, f64); 5] = [
    ("v1.0", 5, 0.2, 700.0),
    ("v1.1", 15, 0.35, 4500.0),
    ("FT", 24, 0.8, 9600.0),
    ("B4", 11, 0.55, 7000.0),
    ("B5", 1, 1.0, 4000.0),
];

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let early_sites = ["CCAFS LC-40", "CCAFS LC-40", "VAFB SLC-4E"];
    let late_sites = ["CCAFS SLC-40", "KSC LC-39A", "KSC LC-39A", "VAFB SLC-4E"];

    let mut rows = Vec::new();
    let mut flight_number = 1;
    for (era, &(category, flights, success_rate, payload_ceiling)) in ERAS.iter().enumerate() {
        for n in 0..flights {
            let sites: &[&str] = if era < 2 { &early_sites } else { &late_sites };
            // Round to 10 kg like published manifests.
            let payload = (rng.next_f64() * payload_ceiling / 10.0).round() * 10.0;
            let class = i64::from(rng.next_f64() < success_rate);

            let serial = 1000 + flight_number * 3 + n as i64;

            rows.push(Row {
                flight_number,
                launch_site: rng.pick(sites).to_string(),
                class,
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{serial:04}"),
                booster_version_category: category.to_string(),
            });
            flight_number += 1;
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.launch_site.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version_category.as_str()),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "spacex_launch_dash.csv";
    let parquet_path = "spacex_launch_dash.parquet";
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    let successes = rows.iter().filter(|r| r.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
