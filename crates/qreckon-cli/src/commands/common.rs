//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde_json::{Map, Value};

use qreckon::{FrequenciesLike, Outcome};

/// Document encodings understood by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension; anything but YAML is JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Load a JSON or YAML document into a JSON value.
pub fn load_document(path: &str) -> Result<Value> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    match DocumentFormat::from_path(path_obj) {
        DocumentFormat::Json => {
            serde_json::from_str(&source).with_context(|| format!("Invalid JSON in {path}"))
        }
        DocumentFormat::Yaml => {
            let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(&source)
                .with_context(|| format!("Invalid YAML in {path}"))?;
            yaml_to_json(yaml)
        }
    }
}

/// Convert a YAML value to JSON, stringifying scalar mapping keys.
///
/// YAML allows `0: 10` with an integer key; JSON objects only have string
/// keys, which the outcome parser reads back.
pub fn yaml_to_json(value: serde_yaml_ng::Value) -> Result<Value> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::from(u)
            } else if let Some(i) = n.as_i64() {
                Value::from(i)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| anyhow::anyhow!("Non-finite number in YAML: {n}"))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => anyhow::bail!("Unsupported YAML mapping key: {other:?}"),
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Write a document to `output` (format by extension) or to stdout as JSON.
pub fn write_document(value: &Value, output: Option<&str>) -> Result<()> {
    let Some(path) = output else {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    };

    let text = match DocumentFormat::from_path(Path::new(path)) {
        DocumentFormat::Json => serde_json::to_string_pretty(value)?,
        DocumentFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    fs::write(path, text).with_context(|| format!("Failed to write file: {path}"))?;

    println!(
        "{} Written to {}",
        style("✓").green().bold(),
        style(path).cyan()
    );
    Ok(())
}

/// Parse a bit mask given as decimal, `0x` hex or `0b` binary.
pub fn parse_mask(text: &str) -> Result<Outcome, String> {
    qreckon::input::parse_outcome(text).map_err(|e| e.to_string())
}

/// Print a frequency table with proportional bars.
pub fn print_frequencies(frequencies: &FrequenciesLike) {
    let (label, rows): (&str, Vec<(Outcome, f64)>) = match frequencies {
        FrequenciesLike::Counts(counts) => (
            "counts",
            counts.iter().map(|(o, c)| (o, c as f64)).collect(),
        ),
        FrequenciesLike::QuasiDist(quasi) => ("quasi-distribution", quasi.iter().collect()),
        FrequenciesLike::Map(map) => ("weights", map.iter().collect()),
    };

    let total: f64 = rows.iter().map(|(_, w)| w.abs()).sum();
    let width = rows
        .iter()
        .map(|(o, _)| (Outcome::BITS - o.leading_zeros()).max(1) as usize)
        .max()
        .unwrap_or(1);

    println!("\n{} {} ({} outcomes):", style("✓").green().bold(), label, rows.len());

    for (outcome, weight) in rows.iter().take(16) {
        let share = if total > 0.0 { weight.abs() / total * 100.0 } else { 0.0 };
        let bar: String = "█".repeat((share / 2.0).round() as usize);
        println!(
            "  {}: {:>10.4} {}",
            style(format!("{outcome:0width$b}")).cyan(),
            weight,
            style(bar).green()
        );
    }

    if rows.len() > 16 {
        println!("  ... and {} more outcomes", rows.len() - 16);
    }
}
