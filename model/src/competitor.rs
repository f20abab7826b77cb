use serde::{Deserialize, Serialize};

use crate::{Position, Trace, TrailBuilder};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompetitorName(pub String);

impl std::fmt::Display for CompetitorName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct Competitor {
    pub name: CompetitorName,
    pub trace: Trace,
    // Its last point is where the competitor gets drawn, frozen once the trace runs out
    trail: TrailBuilder,
    started: bool,
}

impl Competitor {
    pub fn new(name: CompetitorName, trace: Trace) -> Self {
        Self {
            name,
            trace,
            trail: TrailBuilder::new(),
            started: false,
        }
    }

    /// Move to `time`, which must never go backwards between resets. None if the trace doesn't
    /// cover this time, in which case nothing changes.
    pub fn tick(&mut self, time: i64) -> Option<Position> {
        let pos = self.trace.interpolate(time)?;
        if !self.started {
            debug!("{} starts at {}", self.name, time);
            self.started = true;
        }
        self.trail.add_point(pos);
        Some(pos)
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Started, and the clock has reached the end of the trace
    pub fn has_finished(&self, time: i64) -> bool {
        self.started && self.trace.end_time().map(|t| time >= t).unwrap_or(true)
    }

    pub fn last_position(&self) -> Option<Position> {
        self.trail.last_point()
    }

    pub fn trail(&self) -> &TrailBuilder {
        &self.trail
    }

    pub fn reset(&mut self) {
        self.trail.reset();
        self.started = false;
    }
}
