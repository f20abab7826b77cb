use anyhow::Result;

use crate::{Sample, Trace};

/// A JSON list of `{"ts": ..., "lon": ..., "lat": ...}` records, one per observation.
pub fn load_json<R: std::io::Read>(reader: R) -> Result<Trace> {
    let raw: Vec<Sample> = serde_json::from_reader(reader)?;
    Trace::new(raw)
}

/// The same records as CSV, with a header row.
pub fn load_csv<R: std::io::Read>(reader: R) -> Result<Trace> {
    let mut raw = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Sample = rec?;
        raw.push(rec);
    }
    Trace::new(raw)
}
