use crate::models::VesselRecord;
use crate::{log_info, log_warn};
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Writes records to a CSV file. Columns are the union of all keys seen,
/// in encounter order, with `name` hoisted to the front and `url` pushed
/// to the back. Saving an empty set is a no-op.
pub fn save_to_csv(records: &[VesselRecord], output_path: &str, sort_by_name: bool) -> Result<()> {
    if records.is_empty() {
        log_warn!("No data to save");
        return Ok(());
    }

    let columns = column_order(records);

    let mut ordered: Vec<&VesselRecord> = records.iter().collect();
    if sort_by_name {
        ordered.sort_by(|a, b| a.name().cmp(b.name()));
    }

    let file = File::create(Path::new(output_path))
        .context(format!("Failed to create output file: {}", output_path))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&columns)?;
    for record in ordered {
        let row: Vec<&str> = columns
            .iter()
            .map(|column| record.get(column).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    log_info!("Saved {} vessels to {}", records.len(), output_path);
    Ok(())
}

/// Union of record keys in encounter order. When both `name` and `url`
/// are present they are moved to the first and last position; the rest
/// keep their relative order.
pub fn column_order(records: &[VesselRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }

    let has_name = columns.iter().any(|c| c == "name");
    let has_url = columns.iter().any(|c| c == "url");
    if has_name && has_url {
        columns.retain(|c| c != "name" && c != "url");
        columns.insert(0, "name".to_string());
        columns.push("url".to_string());
    }

    columns
}
