//! Screen orchestration
//!
//! `Game` owns the level, the settings and the current screen. Screens are
//! plain states: everything one needs is handed to it per call, so nothing
//! holds a pointer back to the game.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::SPLASH_TIME;
use crate::settings::Settings;
use crate::sim::{Hud, LayoutError, Level, LevelInput, LevelLayout, LevelOutcome, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Splash,
    Menu,
    Level,
    Paused,
    Win,
    Lose,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Splash => "Splash",
            Screen::Menu => "Menu",
            Screen::Level => "Level",
            Screen::Paused => "Paused",
            Screen::Win => "Win",
            Screen::Lose => "Lose",
        }
    }
}

/// Input for one frame, across every screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInput {
    /// In-level controls
    pub level: LevelInput,
    /// Menu: start a run
    pub play: bool,
    /// Menu: volume +10
    pub volume_up: bool,
    /// Menu: volume -10
    pub volume_down: bool,
    /// Menu: next controller layout
    pub next_controller: bool,
    /// Menu: next lives choice
    pub next_lives: bool,
    /// Pause menu: back into the level
    pub resume: bool,
    /// Pause menu: abandon the run
    pub quit: bool,
    /// Win/Lose screens: back to the menu
    pub confirm: bool,
}

/// Result of a finished run, shown on the end screens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub won: bool,
    /// Coins collected
    pub score: u32,
    /// Level time in seconds
    pub time: f32,
    /// Lives left
    pub lives: u32,
}

impl RunSummary {
    fn from_hud(won: bool, hud: Hud) -> Self {
        Self {
            won,
            score: hud.coins,
            time: hud.time,
            lives: hud.lives,
        }
    }
}

pub struct Game {
    level: Level,
    settings: Settings,
    screen: Screen,
    splash_timer: f32,
    last_run: Option<RunSummary>,
}

impl Game {
    pub fn new(layout: &LevelLayout, settings: Settings) -> Result<Self, LayoutError> {
        Ok(Self {
            level: Level::new(layout)?,
            settings,
            screen: Screen::Splash,
            splash_timer: 0.0,
            last_run: None,
        })
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The most recent finished run
    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    /// Advance the current screen by one frame
    pub fn update(&mut self, frame_time: f32, input: &GameInput, audio: &mut dyn AudioSink) {
        match self.screen {
            Screen::Splash => {
                self.splash_timer += frame_time;
                if self.splash_timer >= SPLASH_TIME {
                    self.set_screen(Screen::Menu);
                }
            }
            Screen::Menu => self.update_menu(input, audio),
            Screen::Level => self.update_level(frame_time, input, audio),
            Screen::Paused => {
                if input.resume {
                    audio.play(SoundEffect::ButtonClick);
                    self.set_screen(Screen::Level);
                } else if input.quit {
                    audio.play(SoundEffect::ButtonClick);
                    audio.stop_music();
                    self.set_screen(Screen::Menu);
                }
            }
            Screen::Win | Screen::Lose => {
                if input.confirm {
                    audio.play(SoundEffect::ButtonClick);
                    self.set_screen(Screen::Menu);
                }
            }
        }
    }

    fn update_menu(&mut self, input: &GameInput, audio: &mut dyn AudioSink) {
        if input.volume_up || input.volume_down {
            if input.volume_up {
                self.settings.volume_up();
            } else {
                self.settings.volume_down();
            }
            audio.set_master_volume(self.settings.volume_fraction());
            audio.play(SoundEffect::ButtonClick);
        }
        if input.next_controller {
            self.settings.cycle_controller();
            audio.play(SoundEffect::ButtonClick);
        }
        if input.next_lives {
            self.settings.cycle_lives();
            audio.play(SoundEffect::ButtonClick);
        }

        if input.play {
            audio.play(SoundEffect::ButtonClick);
            self.level.reset(self.settings.starting_lives());
            self.set_screen(Screen::Level);
        }
    }

    fn update_level(&mut self, frame_time: f32, input: &GameInput, audio: &mut dyn AudioSink) {
        self.level.set_master_volume(self.settings.volume_fraction());
        match tick(&mut self.level, &input.level, frame_time, audio) {
            LevelOutcome::Playing => {}
            LevelOutcome::Paused => self.set_screen(Screen::Paused),
            LevelOutcome::Win => self.finish_run(true, audio),
            LevelOutcome::Lose => self.finish_run(false, audio),
        }
    }

    fn finish_run(&mut self, won: bool, audio: &mut dyn AudioSink) {
        let summary = RunSummary::from_hud(won, self.level.hud());
        log::info!(
            "Run {}: {} coins in {:.1}s, {} lives left",
            if won { "won" } else { "lost" },
            summary.score,
            summary.time,
            summary.lives
        );
        self.last_run = Some(summary);
        audio.stop_music();
        self.set_screen(if won { Screen::Win } else { Screen::Lose });
    }

    fn set_screen(&mut self, screen: Screen) {
        log::debug!("Screen {} -> {}", self.screen.as_str(), screen.as_str());
        self.screen = screen;
    }
}
