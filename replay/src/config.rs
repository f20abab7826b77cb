use anyhow::{Context, Result};
use chrono::DateTime;

use model::DEFAULT_START_TIME;

use crate::Args;

pub struct ReplayConfig {
    /// Milliseconds since the epoch
    pub start_time: i64,
    /// Milliseconds per tick
    pub increment: i64,
    pub max_ticks: Option<usize>,
    pub output: Option<String>,
    pub every: Option<usize>,
    pub course: Option<String>,
    pub traces: Vec<String>,
}

impl ReplayConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let start_time = match args.start {
            Some(ref x) => parse_time(x)?,
            None => DEFAULT_START_TIME,
        };
        if !args.speed.is_finite() || args.speed <= 0.0 {
            bail!("--speed must be positive, not {}", args.speed);
        }
        // The clock works in milliseconds
        let ms = (args.speed * 1000.0).round();
        if ms >= i64::MAX as f64 {
            bail!("--speed {} is too large", args.speed);
        }
        let increment = ms as i64;
        if increment == 0 {
            bail!("--speed {} is less than a millisecond per tick", args.speed);
        }
        if args.every == Some(0) {
            bail!("--every must be at least 1");
        }
        if args.every.is_some() && args.output.is_none() {
            bail!("--every needs --output to know where to write frames");
        }
        Ok(Self {
            start_time,
            increment,
            max_ticks: args.ticks,
            output: args.output.clone(),
            every: args.every,
            course: args.course.clone(),
            traces: args.traces.clone(),
        })
    }

    /// Enough ticks for the clock to reach `finish`
    pub fn ticks_until(&self, finish: Option<i64>) -> usize {
        match finish {
            Some(t) if t > self.start_time => {
                // Both are i64, but the span might not be
                let span = (t as i128) - (self.start_time as i128);
                let increment = self.increment as i128;
                let ticks = span / increment + if span % increment == 0 { 0 } else { 1 };
                usize::try_from(ticks).unwrap_or(usize::MAX)
            }
            _ => 0,
        }
    }

    /// Where to write an intermediate frame
    pub fn frame_path(&self, tick: usize) -> Option<String> {
        let output = self.output.as_ref()?;
        let base = output.strip_suffix(".geojson").unwrap_or(output);
        Some(format!("{}.{}.geojson", base, tick))
    }
}

/// RFC 3339 or plain epoch milliseconds
fn parse_time(x: &str) -> Result<i64> {
    if let Ok(ms) = x.parse::<i64>() {
        return Ok(ms);
    }
    let dt = DateTime::parse_from_rfc3339(x).with_context(|| format!("bad start time {}", x))?;
    Ok(dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            start: None,
            speed: 60.0,
            ticks: None,
            output: Some("race.geojson".to_string()),
            every: None,
            course: None,
            traces: vec!["Hugo(85).json".to_string()],
        }
    }

    #[test]
    fn times() {
        assert_eq!(parse_time("2024-11-10T12:02:00Z").unwrap(), DEFAULT_START_TIME);
        assert_eq!(parse_time("2024-11-10T13:02:00+01:00").unwrap(), DEFAULT_START_TIME);
        assert_eq!(parse_time("1731240120000").unwrap(), DEFAULT_START_TIME);
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn defaults() {
        let config = ReplayConfig::from_args(&args()).unwrap();
        assert_eq!(config.start_time, DEFAULT_START_TIME);
        assert_eq!(config.increment, 60_000);
        assert_eq!(config.frame_path(3).unwrap(), "race.3.geojson");
    }

    #[test]
    fn tick_count() {
        let mut a = args();
        a.start = Some("0".to_string());
        a.speed = 1.0;
        let config = ReplayConfig::from_args(&a).unwrap();
        assert_eq!(config.ticks_until(Some(10_000)), 10);
        assert_eq!(config.ticks_until(Some(10_001)), 11);
        assert_eq!(config.ticks_until(Some(-5)), 0);
        assert_eq!(config.ticks_until(None), 0);
    }

    #[test]
    fn huge_spans() {
        let mut a = args();
        a.start = Some(i64::MIN.to_string());
        a.speed = 1e12;
        let config = ReplayConfig::from_args(&a).unwrap();
        assert_eq!(config.ticks_until(Some(i64::MAX)), 18_447);

        let mut a = args();
        a.speed = 1e300;
        assert!(ReplayConfig::from_args(&a).is_err());

        let mut a = args();
        a.speed = 9.2e15;
        let config = ReplayConfig::from_args(&a).unwrap();
        assert_eq!(config.ticks_until(Some(DEFAULT_START_TIME + 1)), 1);
    }

    #[test]
    fn bad_flags() {
        let mut a = args();
        a.speed = 0.0;
        assert!(ReplayConfig::from_args(&a).is_err());

        let mut a = args();
        a.every = Some(5);
        a.output = None;
        assert!(ReplayConfig::from_args(&a).is_err());
    }
}
