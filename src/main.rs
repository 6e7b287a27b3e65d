//! Beat Flick headless runner
//!
//! Plays one song against virtual hardware with a simulated player and prints
//! how the run went. Useful for checking beat maps and tuning without a board.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use beat_flick::audio::HeadlessAudio;
use beat_flick::autoplay::AutoPlayer;
use beat_flick::highscores::{HighScoreFile, MAX_HIGH_SCORES};
use beat_flick::platform::{LogPixel, ScriptedRotary};
use beat_flick::renderer::HeadlessRenderer;
use beat_flick::sim::{Devices, GamePhase, GameStateMachine};
use beat_flick::{BeatEvent, BeatMap, Difficulty, NoteKind, Settings, consts};

/// Resting reading of the virtual accelerometer (1 g)
const REST_Z: f64 = 9.8;
/// Virtual clock resolution (seconds)
const STEP: f64 = 0.001;

#[derive(Parser, Debug)]
#[command(name = "beat-flick", about = "Run a headless Beat Flick session")]
struct Args {
    /// Beat map JSON; a random map is generated when omitted
    #[arg(long)]
    beatmap: Option<PathBuf>,

    /// Settings JSON
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Seed for the generated map and the simulated player
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Beats in a generated map
    #[arg(long, default_value_t = 60)]
    beats: usize,

    /// Tempo of a generated map
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Chance the player hits any given note (0-1)
    #[arg(long, default_value_t = 0.9)]
    skill: f64,

    /// easy, medium, hard or custom
    #[arg(long)]
    difficulty: Option<String>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Beat Flick (headless) starting...");

    let mut settings = Settings::load(&args.settings);
    if let Some(name) = &args.difficulty {
        settings.difficulty = Difficulty::from_str(name)
            .with_context(|| format!("unknown difficulty '{name}'"))?;
    }
    if args.save_settings {
        settings.save(&args.settings);
    }

    let beat_map = match &args.beatmap {
        Some(path) => BeatMap::load(path)
            .with_context(|| format!("loading beat map {}", path.display()))?,
        None => random_map(args.seed, args.beats, args.bpm),
    };
    log::info!("{} beats over {:.1}s", beat_map.len(), beat_map.duration());

    let mut player = AutoPlayer::new(args.seed, args.skill, settings.hit_y, 2.0, REST_Z);
    let mut machine = GameStateMachine::new(settings.clone(), &mut player.accel);
    machine.assign_beat_map(beat_map);

    let mut rotary = ScriptedRotary::default();
    let mut display = HeadlessRenderer::new();
    let mut audio = HeadlessAudio::new(settings.volume);
    let mut pixel = LogPixel::default();
    let mut scores = HighScoreFile::open(&settings.high_score_path);

    // Dial the menu to the chosen difficulty
    rotary.turn(settings.difficulty.index() as i32);

    let mut now = 0.0;
    let mut started = false;
    let limit = machine.beat_map().duration() + machine.settings().fall_time() + 10.0;

    {
        let mut io = Devices {
            buttons: &mut player.buttons,
            rotary: &mut rotary,
            accel: &mut player.accel,
            display: &mut display,
            audio: &mut audio,
            pixel: &mut pixel,
            scores: Some(&mut scores),
        };
        machine.boot(&mut io);
    }

    while now < limit {
        match machine.phase() {
            GamePhase::Menu if !started => {
                // Let the rotary settle on the menu before starting
                player.buttons.release_all();
                if now > 0.05 {
                    player.click(0);
                }
            }
            GamePhase::Playing => {
                if !started {
                    started = true;
                    player.set_note_height(machine.notes().note_height());
                }
                player.observe(&display);
            }
            _ => break,
        }

        now += STEP;
        let mut io = Devices {
            buttons: &mut player.buttons,
            rotary: &mut rotary,
            accel: &mut player.accel,
            display: &mut display,
            audio: &mut audio,
            pixel: &mut pixel,
            scores: Some(&mut scores),
        };
        machine.update(now, &mut io);
    }

    let session = machine.session();
    let result = session.result.map(|r| r.as_str()).unwrap_or("unfinished");
    println!(
        "{} on {}: score {}, misses {}, level {}",
        result,
        session.difficulty.as_str(),
        session.score,
        session.misses,
        session.current_level
    );
    for (rank, entry) in scores.scores().top(MAX_HIGH_SCORES).iter().enumerate() {
        println!(
            "{:>2}. {} {:>4} ({} misses)",
            rank + 1,
            entry.initials,
            entry.score,
            entry.misses
        );
    }
    Ok(())
}

/// Seeded random song: one beat per `60 / bpm` seconds, roughly one in five a flick
fn random_map(seed: u64, beats: usize, bpm: f64) -> BeatMap {
    let mut rng = Pcg32::seed_from_u64(seed);
    let spacing = 60.0 / bpm.max(1.0);
    let events = (0..beats)
        .map(|i| BeatEvent {
            time: 2.0 + spacing * i as f64,
            lane: rng.random_range(0..consts::LANES as u8),
            kind: if rng.random_bool(0.2) {
                NoteKind::Flick
            } else {
                NoteKind::Tap
            },
        })
        .collect();
    BeatMap::new(events)
}
