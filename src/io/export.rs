//! CSV export for planned charging stops.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::TripPlan;

/// Column header for the charging-stop CSV export.
const HEADER: &str = "stop,at_km,latitude,longitude,candidates,\
                      best_id,best_name,best_power_kw,lookup_ok";

/// Exports the planned stops to a CSV file at the given path.
///
/// Writes a header row followed by one data row per stop. Produces
/// deterministic output for identical plans.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_stops_csv(plan: &TripPlan, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_stops_csv(plan, buf)
}

/// Writes the planned stops as CSV to any writer.
///
/// The `best_*` columns describe the first candidate (fetch order), empty
/// when the stop has none.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_stops_csv(plan: &TripPlan, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for (idx, stop) in plan.stops.iter().enumerate() {
        let best = stop.candidates.first();
        wtr.write_record(&[
            (idx + 1).to_string(),
            format!("{:.3}", stop.at_km),
            format!("{:.6}", stop.location.latitude),
            format!("{:.6}", stop.location.longitude),
            stop.candidates.len().to_string(),
            best.map(|c| c.id.to_string()).unwrap_or_default(),
            best.and_then(|c| c.name.clone()).unwrap_or_default(),
            best.and_then(|c| c.max_power_kw)
                .map(|kw| format!("{kw:.1}"))
                .unwrap_or_default(),
            stop.lookup_error.is_none().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chargers::Charger;
    use crate::geo::Waypoint;
    use crate::sim::types::ChargingStop;

    fn make_plan() -> TripPlan {
        TripPlan {
            stops: vec![
                ChargingStop {
                    at_km: 95.5,
                    location: Waypoint::new(52.43, -1.72),
                    candidates: vec![Charger {
                        id: 1001,
                        name: Some("Services North".into()),
                        latitude: 52.43,
                        longitude: -1.72,
                        max_power_kw: Some(50.0),
                    }],
                    lookup_error: None,
                },
                ChargingStop {
                    at_km: 210.0,
                    location: Waypoint::new(53.10, -1.40),
                    candidates: vec![],
                    lookup_error: Some("timed out".into()),
                },
            ],
            total_distance_km: 260.0,
        }
    }

    #[test]
    fn header_matches_schema() {
        let mut buf = Vec::new();
        write_stops_csv(&make_plan(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let first_line = output.lines().next().unwrap();
        assert_eq!(
            first_line,
            "stop,at_km,latitude,longitude,candidates,\
             best_id,best_name,best_power_kw,lookup_ok"
        );
    }

    #[test]
    fn row_count_matches_stop_count() {
        let mut buf = Vec::new();
        write_stops_csv(&make_plan(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 2 data rows
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn stop_without_candidates_has_empty_best_columns() {
        let mut buf = Vec::new();
        write_stops_csv(&make_plan(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let second_row = output.lines().nth(2).unwrap();
        assert!(second_row.starts_with("2,210.000,"));
        assert!(second_row.ends_with(",0,,,,false"));
    }

    #[test]
    fn deterministic_output() {
        let plan = make_plan();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_stops_csv(&plan, &mut buf1).unwrap();
        write_stops_csv(&plan, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn round_trip_parseable() {
        let mut buf = Vec::new();
        write_stops_csv(&make_plan(), &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 9);

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert!(rec[1].parse::<f64>().is_ok(), "at_km should parse as f64");
            row_count += 1;
        }
        assert_eq!(row_count, 2);
    }
}
