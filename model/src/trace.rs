use anyhow::Result;
use serde::Serialize;

use crate::seam;
use crate::{Position, Sample, TrailBuilder};

/// Everything recorded about one competitor, ordered by time.
#[derive(Clone, Debug, Serialize)]
pub struct Trace {
    // Timestamps never decrease. Equal adjacent timestamps are allowed.
    inner: Vec<Sample>,
}

impl Trace {
    pub fn new(raw: Vec<Sample>) -> Result<Self> {
        for (idx, sample) in raw.iter().enumerate() {
            if !sample.lon.is_finite() || !sample.lat.is_finite() {
                bail!("Trace sample {} has a non-finite coordinate: {:?}", idx, sample);
            }
            if sample.lon.abs() > 180.0 {
                bail!("Trace sample {} has longitude {} outside [-180, 180]", idx, sample.lon);
            }
            if sample.lat.abs() > 90.0 {
                bail!("Trace sample {} has latitude {} outside [-90, 90]", idx, sample.lat);
            }
        }
        for (idx, pair) in raw.windows(2).enumerate() {
            if pair[0].ts > pair[1].ts {
                bail!(
                    "Trace input out-of-order at sample {}: {} then {}",
                    idx + 1,
                    pair[0].ts,
                    pair[1].ts
                );
            }
        }
        Ok(Self { inner: raw })
    }

    pub fn empty() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn start_time(&self) -> Option<i64> {
        self.inner.first().map(|s| s.ts)
    }

    pub fn end_time(&self) -> Option<i64> {
        self.inner.last().map(|s| s.ts)
    }

    /// The two samples immediately around `time`: the last one at or before it, and the first
    /// one strictly after it.
    pub fn bracket(&self, time: i64) -> Option<(&Sample, &Sample)> {
        let idx = self.inner.partition_point(|s| s.ts <= time);
        if idx == 0 {
            return None;
        }
        let next = self.inner.get(idx)?;
        Some((&self.inner[idx - 1], next))
    }

    /// None before the first sample, and at or after the last one. The caller should keep
    /// whatever it last had; nothing is extrapolated.
    pub fn interpolate(&self, time: i64) -> Option<Position> {
        let (prev, next) = self.bracket(time)?;
        Some(interpolate_between(prev, next, time))
    }

    /// The entire recorded course, split wherever it crosses the antimeridian.
    pub fn course(&self) -> TrailBuilder {
        let mut trail = TrailBuilder::new();
        for sample in &self.inner {
            trail.add_point(sample.pos());
        }
        trail
    }
}

// Assumes prev.ts <= time < next.ts
fn interpolate_between(prev: &Sample, next: &Sample, time: i64) -> Position {
    if time == prev.ts {
        return prev.pos();
    }
    let pct = (time - prev.ts) as f64 / (next.ts - prev.ts) as f64;

    if (prev.lon - next.lon).abs() <= 180.0 {
        return lerp(prev.pos(), next.pos(), pct);
    }

    // Going straight would wrap around the wrong side of the globe. Instead travel to the seam,
    // then continue from the opposite edge. Each leg gets time proportional to its east-west
    // share.
    let share = seam::share_before_seam(prev.lon, next.lon);
    let y = seam::crossing_latitude(prev.lon, prev.lat, next.lon, next.lat);
    if pct < share {
        let exit = Position::new(seam::seam_longitude(prev.lon), y);
        lerp(prev.pos(), exit, pct / share)
    } else {
        let entry = Position::new(seam::seam_longitude(next.lon), y);
        lerp(entry, next.pos(), (pct - share) / (1.0 - share))
    }
}

fn lerp(from: Position, to: Position, pct: f64) -> Position {
    Position::new(
        from.lon + pct * (to.lon - from.lon),
        from.lat + pct * (to.lat - from.lat),
    )
}
