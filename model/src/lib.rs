//! Replays recorded GPS traces of race competitors. Positions are interpolated between samples,
//! and trails are split wherever they cross the antimeridian, so nothing ever gets drawn the
//! long way around the globe.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod competitor;
mod load;
mod race;
mod sample;
mod seam;
mod trace;
mod trail;

pub use self::competitor::{Competitor, CompetitorName};
pub use self::load::{load_csv, load_json};
pub use self::race::{BoatFrame, Frame, Race, DEFAULT_START_TIME};
pub use self::sample::{Position, Sample};
pub use self::trace::Trace;
pub use self::trail::TrailBuilder;
