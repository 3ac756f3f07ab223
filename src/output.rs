use anyhow::{Context, Result};
use life_common::Snapshot;
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Encoding used for recorded snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    /// Binary format (much more compact)
    Bincode,
    /// MessagePack format (compact and cross-platform)
    MessagePack,
}

impl OutputFormat {
    /// Maps the config string to a format. Missing means JSON; unknown falls back to JSON.
    pub fn from_config(name: Option<&str>) -> Self {
        match name.unwrap_or("json") {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" => OutputFormat::MessagePack,
            other => {
                error!("Unknown output format: {}. Using JSON instead.", other);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes all snapshots to `<base>_snapshots.<ext>` and returns the path.
pub fn save_snapshots(base_filename: &str, format: OutputFormat, snapshots: &[Snapshot]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_snapshots.{}", base_filename, format.extension()));
    let file = File::create(&path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => serde_json::to_writer(&mut writer, snapshots)
            .context("Error serializing snapshots to JSON")?,
        OutputFormat::Bincode => bincode::serialize_into(&mut writer, snapshots)
            .context("Error serializing snapshots to bincode")?,
        OutputFormat::MessagePack => rmp_serde::encode::write(&mut writer, snapshots)
            .context("Error serializing snapshots to MessagePack")?,
    }
    writer.flush()?;

    info!("{} snapshots saved to {}", snapshots.len(), path.display());
    Ok(path)
}

/// Writes `group,x,y` rows to `<base>_final_positions.csv` and returns the path.
pub fn save_final_positions(base_filename: &str, rows: &[(String, f64, f64)]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_final_positions.csv", base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;

    writer.write_record(["group", "x", "y"])?;
    for (group, x, y) in rows {
        let x = format!("{:.4}", x);
        let y = format!("{:.4}", y);
        writer.write_record([group.as_str(), x.as_str(), y.as_str()])?;
    }
    writer.flush()?;

    info!("Final positions saved to {}", path.display());
    Ok(path)
}
