//! Crate Kicker headless runner
//!
//! Plays a short scripted session against the default level at the fixed
//! frame rate and logs what happened. Set `RUST_LOG=debug` for more.

use std::path::PathBuf;

use crate_kicker::audio::AudioEvent;
use crate_kicker::consts::SIM_DT;
use crate_kicker::sim::{LevelInput, LevelLayout};
use crate_kicker::{AudioQueue, Game, GameInput, Screen, Settings};

/// Frames to run before giving up on the script
const MAX_FRAMES: u32 = 60 * 60;

/// Scripted controls for a given frame of the level: run right, hop every
/// second and kick now and then.
fn scripted_input(frame: u32) -> LevelInput {
    LevelInput {
        move_left: false,
        move_right: true,
        jump: frame % 60 == 0,
        attack: frame % 90 == 45,
        pause: false,
    }
}

fn settings_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crate_kicker_settings.json"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Crate Kicker (headless) starting...");

    let settings = Settings::load_or_default(&settings_path());
    let mut game = match Game::new(&LevelLayout::default(), settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to build level: {}", e);
            std::process::exit(1);
        }
    };
    let mut audio = AudioQueue::new();

    let mut level_frame = 0u32;
    for frame in 0..MAX_FRAMES {
        let mut input = GameInput::default();
        match game.screen() {
            Screen::Menu => input.play = true,
            Screen::Level => {
                input.level = scripted_input(level_frame);
                level_frame += 1;
            }
            Screen::Win | Screen::Lose => break,
            Screen::Splash | Screen::Paused => {}
        }

        game.update(SIM_DT, &input, &mut audio);

        for event in audio.drain() {
            if let AudioEvent::Sample(effect) = event {
                log::trace!("frame {}: {}", frame, effect.as_str());
            }
        }
        if level_frame > 0 && level_frame % 60 == 0 {
            let hud = game.level().hud();
            log::debug!(
                "t={:.1}s lives={} coins={} player={:?}",
                hud.time,
                hud.lives,
                hud.coins,
                game.level().player().state()
            );
        }
    }

    let hud = game.level().hud();
    match game.last_run() {
        Some(run) => log::info!(
            "Session over ({}): {} coins, {:.1}s, {} lives left",
            if run.won { "won" } else { "lost" },
            run.score,
            run.time,
            run.lives
        ),
        None => log::info!(
            "Session stopped on {}: {} coins, {:.1}s, {} lives left",
            game.screen().as_str(),
            hud.coins,
            hud.time,
            hud.lives
        ),
    }
}
