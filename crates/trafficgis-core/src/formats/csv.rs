use crate::error::{Result, TrafficGisError};
use crate::formats::{ExportFormat, ExportPayload};
use crate::models::TimeSeriesEntry;

/// Exact header row; downstream parsers depend on this layout
pub const CSV_HEADER: [&str; 6] = ["Timestamp", "Motorcycle", "Car", "Bus", "Truck", "Total"];

/// Vehicle-count time series as CSV
///
/// Rows are separated by `\n` with no trailing newline. The only error is a
/// failure of the underlying CSV writer, which an in-memory buffer does not
/// produce.
pub fn vehicle_counts_csv(camera_id: &str, series: &[TimeSeriesEntry]) -> Result<ExportPayload> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for entry in series {
        let counts = &entry.counts;
        writer
            .write_record([
                entry.timestamp.clone(),
                counts.motorcycle.to_string(),
                counts.car.to_string(),
                counts.bus.to_string(),
                counts.truck.to_string(),
                counts.total().to_string(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TrafficGisError::Serialization(format!("Failed to flush CSV: {}", e)))?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| TrafficGisError::Serialization(format!("CSV is not UTF-8: {}", e)))?;

    if content.ends_with('\n') {
        content.pop();
    }

    tracing::debug!(camera_id, rows = series.len(), "Serialized vehicle count CSV");
    Ok(ExportPayload::new(format!("{}_traffic_data.csv", camera_id), ExportFormat::Csv, content))
}

fn csv_error(e: ::csv::Error) -> TrafficGisError {
    TrafficGisError::Serialization(format!("Failed to write CSV: {}", e))
}
