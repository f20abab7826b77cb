use std::io::Write;

use anyhow::Result;

use model::{Frame, Race};

/// As a GeoJSON FeatureCollection, to a file or STDOUT
pub fn write_frame(frame: &Frame, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(&frame.to_geojson())?;
    match path {
        Some(path) => {
            fs_err::write(path, json)?;
            debug!("Wrote frame at {} to {}", frame.time, path);
        }
        None => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

pub fn write_courses(race: &Race, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(&race.courses_to_geojson())?;
    fs_err::write(path, json)?;
    info!("Wrote {} courses to {}", race.competitors().len(), path);
    Ok(())
}
