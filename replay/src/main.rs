#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod config;
mod output;

use abstutil::{prettyprint_usize, Timer};
use anyhow::{Context, Result};
use structopt::StructOpt;

use model::{CompetitorName, Race, Trace};

use self::config::ReplayConfig;

#[derive(StructOpt)]
struct Args {
    /// When the clock starts, as RFC 3339 or milliseconds since the epoch. Defaults to the
    /// 2024 start.
    #[structopt(long)]
    start: Option<String>,
    /// How many simulated seconds pass per tick
    #[structopt(long, default_value = "60")]
    speed: f64,
    /// Stop after this many ticks. By default, run until every trace is exhausted.
    #[structopt(long)]
    ticks: Option<usize>,
    /// Write the final frame as GeoJSON here, instead of to STDOUT
    #[structopt(long)]
    output: Option<String>,
    /// Also write every Nth frame next to the output
    #[structopt(long)]
    every: Option<usize>,
    /// Write every competitor's entire recorded course as GeoJSON here
    #[structopt(long)]
    course: Option<String>,
    /// One JSON or CSV trace per competitor. The file name is the competitor's name.
    #[structopt(required = true)]
    traces: Vec<String>,
}

fn main() {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    if let Err(err) = run(args) {
        error!("{:?}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = ReplayConfig::from_args(&args)?;
    let mut timer = Timer::new("replay race");

    timer.start("load traces");
    let mut race = Race::new(config.start_time);
    for path in &config.traces {
        let (name, trace) = load_trace(path)?;
        info!("{} has {} samples", name, prettyprint_usize(trace.len()));
        race.add_competitor(name, trace)?;
    }
    timer.stop("load traces");

    if let Some(ref path) = config.course {
        output::write_courses(&race, path)?;
    }

    let num_ticks = match config.max_ticks {
        Some(n) => n,
        None => config.ticks_until(race.finish_time()),
    };
    if race.finish_time().map(|t| t <= config.start_time).unwrap_or(true) {
        warn!("Every trace ends before the start time; nothing will be drawn");
    }

    if num_ticks > 0 {
        timer.start_iter("advance clock", num_ticks);
    }
    for tick in 1..=num_ticks {
        timer.next();
        race.tick(config.increment)?;
        if let Some(every) = config.every {
            if tick % every == 0 {
                output::write_frame(&race.frame(), config.frame_path(tick).as_deref())?;
            }
        }
    }

    let frame = race.frame();
    info!(
        "After {} ticks, {} of {} competitors are on the map, with {} trail points",
        prettyprint_usize(num_ticks),
        prettyprint_usize(frame.boats.len()),
        prettyprint_usize(race.competitors().len()),
        prettyprint_usize(frame.boats.iter().map(|b| b.trail.num_points()).sum())
    );
    output::write_frame(&frame, config.output.as_deref())
}

fn load_trace(path: &str) -> Result<(CompetitorName, Trace)> {
    let name = match std::path::Path::new(path).file_stem() {
        Some(stem) => stem.to_string_lossy().to_string(),
        None => bail!("Can't name a competitor after {}", path),
    };
    let file = fs_err::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let trace = if path.ends_with(".csv") {
        model::load_csv(reader)
    } else {
        model::load_json(reader)
    }
    .with_context(|| format!("loading trace {}", path))?;
    Ok((CompetitorName(name), trace))
}
