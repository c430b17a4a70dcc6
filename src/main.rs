//! Showdown headless driver
//!
//! Loads a level, steps the scene for a number of ticks and logs every event.
//! Usage: `showdown [level.json] [ticks] [seed]`

use std::error::Error;
use std::fs;

use showdown::LevelDescription;
use showdown::consts::TICK_RATE;
use showdown::sim::{Scene, SimEvent, TickInput, tick};

const DEMO_LEVEL: &str = include_str!("../assets/saloon.json");

/// Logs every event with the tick it happened on
struct LogSink<'a> {
    scene_names: &'a [String],
    tick: u64,
    count: usize,
}

impl LogSink<'_> {
    fn name(&self, id: showdown::sim::ActorId) -> &str {
        self.scene_names.get(id.0).map_or("?", String::as_str)
    }
}

impl showdown::sim::EventSink for LogSink<'_> {
    fn emit(&mut self, event: SimEvent) {
        self.count += 1;
        let t = self.tick;
        match event {
            SimEvent::DuelStarted { origin, target } => {
                log::info!("[{t}] duel: {} vs {}", self.name(origin), self.name(target))
            }
            SimEvent::DuelReleased { origin, target } => {
                log::info!("[{t}] released: {} / {}", self.name(origin), self.name(target))
            }
            SimEvent::Killed {
                aggressor,
                victim,
                covert,
            } => log::info!(
                "[{t}] {} killed {} ({})",
                self.name(aggressor),
                self.name(victim),
                if covert { "covert" } else { "overt" }
            ),
            SimEvent::Incapacitated { actor } => {
                log::info!("[{t}] {} is incapacitated", self.name(actor))
            }
            SimEvent::Collapsed { actor } => log::info!("[{t}] {} collapsed", self.name(actor)),
            SimEvent::ZoneEntered { actor, zone } => {
                log::debug!("[{t}] {} entered zone {zone}", self.name(actor))
            }
            SimEvent::ZoneExited { actor, zone } => {
                log::debug!("[{t}] {} left zone {zone}", self.name(actor))
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let level_text = match args.next() {
        Some(path) if path != "-" => fs::read_to_string(&path)?,
        _ => DEMO_LEVEL.to_string(),
    };
    let ticks: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => u64::from(TICK_RATE) * 60,
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 0x5EED,
    };

    let level = LevelDescription::from_json(&level_text)?;
    let mut scene = Scene::new(level, seed)?;
    let names: Vec<String> = scene.actors().iter().map(|a| a.name().to_string()).collect();
    log::info!("Showdown starting: {} ticks, seed {seed}", ticks);

    scene.post_message("High noon", None);
    scene.start_transition();

    let input = TickInput::default();
    let mut sink = LogSink {
        scene_names: &names,
        tick: 0,
        count: 0,
    };
    for t in 0..ticks {
        sink.tick = t;
        tick(&mut scene, &input, &mut sink);
    }

    log::info!(
        "Finished after {} ticks: {} events, {} of {} actors still standing",
        scene.time_ticks(),
        sink.count,
        scene.alive_count(),
        scene.actors().len()
    );
    println!("{}", serde_json::to_string_pretty(&scene.views())?);
    Ok(())
}
