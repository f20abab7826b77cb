use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

use crate::{Competitor, CompetitorName, Position, Trace, TrailBuilder};

/// When the race this was built for started: 2024-11-10T12:02:00Z
pub const DEFAULT_START_TIME: i64 = 1_731_240_120_000;

/// Drives every competitor with one shared clock.
pub struct Race {
    start_time: i64,
    time: i64,
    competitors: Vec<Competitor>,
}

impl Race {
    pub fn new(start_time: i64) -> Self {
        Self {
            start_time,
            time: start_time,
            competitors: Vec::new(),
        }
    }

    pub fn add_competitor(&mut self, name: CompetitorName, trace: Trace) -> Result<()> {
        if self.competitors.iter().any(|c| c.name == name) {
            bail!("Competitor {} added twice", name);
        }
        if trace.is_empty() {
            warn!("{} has an empty trace and will never appear", name);
        }
        let mut competitor = Competitor::new(name, trace);
        // Catch up if the race is already underway
        if self.time != self.start_time {
            competitor.tick(self.time);
        }
        self.competitors.push(competitor);
        Ok(())
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// The last moment any competitor has data for
    pub fn finish_time(&self) -> Option<i64> {
        self.competitors
            .iter()
            .filter_map(|c| c.trace.end_time())
            .max()
    }

    pub fn all_finished(&self) -> bool {
        match self.finish_time() {
            Some(t) => self.time >= t,
            None => true,
        }
    }

    /// Advance the clock by `increment` milliseconds and move everybody.
    pub fn tick(&mut self, increment: i64) -> Result<()> {
        if increment < 0 {
            bail!("Can't move the race clock by {}ms; reset instead", increment);
        }
        self.time = match self.time.checked_add(increment) {
            Some(t) => t,
            None => bail!("Race clock at {} can't advance by {}ms", self.time, increment),
        };
        for competitor in &mut self.competitors {
            let was_finished = competitor.has_finished(self.time - increment);
            competitor.tick(self.time);
            if !was_finished && competitor.has_finished(self.time) {
                debug!("{} finished by {}", competitor.name, self.time);
            }
        }
        Ok(())
    }

    /// Back to the start, with every trail cleared.
    pub fn reset(&mut self) {
        self.time = self.start_time;
        for competitor in &mut self.competitors {
            competitor.reset();
        }
    }

    pub fn frame(&self) -> Frame {
        let mut boats = Vec::new();
        for competitor in &self.competitors {
            if !competitor.has_started() {
                continue;
            }
            boats.push(BoatFrame {
                name: competitor.name.clone(),
                position: competitor.last_position(),
                trail: competitor.trail().clone(),
            });
        }
        Frame {
            time: self.time,
            boats,
        }
    }

    /// Every competitor's entire recorded course, regardless of the clock
    pub fn courses_to_geojson(&self) -> FeatureCollection {
        let features = self
            .competitors
            .iter()
            .filter(|c| !c.trace.is_empty())
            .map(|c| feature(&c.name, "course", None, c.trace.course().geometry()))
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Everything a renderer needs to draw one moment of the race.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub time: i64,
    /// Only competitors who've started
    pub boats: Vec<BoatFrame>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BoatFrame {
    pub name: CompetitorName,
    pub position: Option<Position>,
    pub trail: TrailBuilder,
}

impl Frame {
    /// A marker and a trail for each boat
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();
        for boat in &self.boats {
            if let Some(pos) = boat.position {
                features.push(feature(
                    &boat.name,
                    "position",
                    Some(self.time),
                    Geometry::new(Value::Point(pos.to_geojson())),
                ));
            }
            features.push(feature(
                &boat.name,
                "trail",
                Some(self.time),
                boat.trail.geometry(),
            ));
        }
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

}

fn feature(
    name: &CompetitorName,
    kind: &str,
    time: Option<i64>,
    geometry: Geometry,
) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), name.0.clone().into());
    properties.insert("kind".to_string(), kind.into());
    if let Some(time) = time {
        properties.insert("time".to_string(), time.into());
    }
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;

    fn name(x: &str) -> CompetitorName {
        CompetitorName(x.to_string())
    }

    fn race() -> Race {
        let mut race = Race::new(0);
        race.add_competitor(
            name("early"),
            Trace::new(vec![Sample::new(0, 179.0, 10.0), Sample::new(1000, -179.0, 20.0)])
                .unwrap(),
        )
        .unwrap();
        race.add_competitor(
            name("late"),
            Trace::new(vec![Sample::new(500, -1.83, 46.47), Sample::new(1500, -1.80, 46.50)])
                .unwrap(),
        )
        .unwrap();
        race
    }

    #[test]
    fn duplicate_names() {
        let mut race = race();
        assert!(race.add_competitor(name("late"), Trace::empty()).is_err());
    }

    #[test]
    fn frames_only_show_started_boats() {
        let mut race = race();
        race.tick(250).unwrap();
        let frame = race.frame();
        assert_eq!(frame.time, 250);
        assert_eq!(frame.boats.len(), 1);
        assert_eq!(frame.boats[0].name, name("early"));

        race.tick(500).unwrap();
        assert_eq!(race.frame().boats.len(), 2);
        assert!(!race.all_finished());
        assert_eq!(race.finish_time(), Some(1500));

        race.tick(1000).unwrap();
        assert!(race.all_finished());
        // Still drawn at their last known positions
        let frame = race.frame();
        assert_eq!(frame.boats.len(), 2);
        assert!(frame.boats.iter().all(|b| b.position.is_some()));
        assert_eq!(frame.boats[0].trail.segments().len(), 2);
        assert_eq!(frame.boats[1].trail.segments().len(), 1);
    }

    #[test]
    fn no_going_backwards() {
        let mut race = race();
        race.tick(100).unwrap();
        assert!(race.tick(-50).is_err());
        assert_eq!(race.time(), 100);
    }

    #[test]
    fn clock_overflow() {
        let mut race = Race::new(i64::MAX - 10);
        race.add_competitor(
            name("late"),
            Trace::new(vec![Sample::new(0, 0.0, 0.0), Sample::new(10, 1.0, 1.0)]).unwrap(),
        )
        .unwrap();
        race.tick(5).unwrap();
        assert!(race.tick(100).is_err());
        assert!(race.tick(i64::MIN).is_err());
        assert_eq!(race.time(), i64::MAX - 5);
    }

    #[test]
    fn reset() {
        let mut race = race();
        race.tick(600).unwrap();
        race.reset();
        assert_eq!(race.time(), 0);
        assert!(race.frame().boats.is_empty());
    }

    #[test]
    fn geojson() {
        let mut race = race();
        race.tick(750).unwrap();
        let fc = race.frame().to_geojson();
        // Two boats, each with a marker and a trail
        assert_eq!(fc.features.len(), 4);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["name"], "early");
        assert_eq!(props["kind"], "position");
        assert_eq!(props["time"], 750);

        // The trail feature is exactly the builder's own geometry
        assert_eq!(
            fc.features[1].geometry,
            Some(race.competitors()[0].trail().geometry())
        );
    }

    #[test]
    fn courses() {
        let mut race = race();
        race.add_competitor(name("nobody"), Trace::empty()).unwrap();
        let fc = race.courses_to_geojson();
        assert_eq!(fc.features.len(), 2);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["kind"], "course");
        assert!(!props.contains_key("time"));
        match fc.features[0].geometry.as_ref().map(|g| &g.value) {
            Some(Value::MultiLineString(lines)) => assert_eq!(lines.len(), 2),
            other => panic!("unexpected geometry {:?}", other),
        }
    }
}
