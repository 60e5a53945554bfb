//! Walkabout Demo
//!
//! Headless run of the free-movement system on a small walled map:
//! - The player walks a fixed route, sliding along walls it grazes
//! - Townsfolk wander in random directions and block each other
//! - A touch event starts when the player walks into it
//!
//! Usage: `walkabout [config.toml|config.ron] [frames]`

use free_move::config::{Config, ConfigError};
use free_move::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

// Map layout
const MAP_WIDTH: i32 = 20;
const MAP_HEIGHT: i32 = 12;
const PILLARS: [(i32, i32); 4] = [(6, 3), (7, 3), (12, 7), (13, 7)];

// Simulation
const DEFAULT_FRAMES: usize = 900;
const WANDER_INTERVAL: usize = 40;
const SCRIPT_FRAMES: usize = 60;
const NUM_TOWNSFOLK: usize = 4;
const RNG_SEED: u64 = 0x5EED;

/// Player route as (dx, dy) commands, issued whenever the previous one is spent
const ROUTE: [(f64, f64); 6] = [(5.0, 0.0), (0.0, 3.0), (4.5, 1.5), (0.0, -4.0), (3.0, 3.0), (-6.0, 0.0)];

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Invalid frame count: {0}")]
    Frames(String),
}

struct Walkabout {
    scene: MapScene,
    rng: StdRng,
    player: CharacterId,
    townsfolk: Vec<CharacterId>,
    route_step: usize,
    script_frames_left: usize,
}

impl Walkabout {
    fn new(config: FreeMoveConfig) -> Result<Self, DemoError> {
        let mut scene = MapScene::new(config);
        let mut rng = StdRng::seed_from_u64(RNG_SEED);

        for x in 0..MAP_WIDTH {
            scene.block_tile(x, 0);
            scene.block_tile(x, MAP_HEIGHT - 1);
        }
        for y in 1..MAP_HEIGHT - 1 {
            scene.block_tile(0, y);
            scene.block_tile(MAP_WIDTH - 1, y);
        }
        for (x, y) in PILLARS {
            scene.block_tile(x, y);
        }

        let player = scene.spawn(CharacterKind::Player, Vec2::new(2.0, 2.0))?;
        let greeter = Character::new(
            CharacterKind::Event(EventState::new(EventTrigger::PlayerTouch)),
            Vec2::new(17.0, 5.0),
            scene.config(),
        )
        .with_flags(CharacterFlags::FULL_TILE);
        scene.add_character(greeter)?;

        let mut townsfolk = Vec::with_capacity(NUM_TOWNSFOLK);
        for _ in 0..NUM_TOWNSFOLK {
            let position = Vec2::new(
                f64::from(rng.gen_range(2..MAP_WIDTH - 2)),
                f64::from(rng.gen_range(5..MAP_HEIGHT - 2)),
            );
            let npc = Character::new(
                CharacterKind::Event(EventState::new(EventTrigger::ActionButton)),
                position,
                scene.config(),
            )
            .with_move_speed(3);
            townsfolk.push(scene.add_character(npc)?);
        }

        log::info!(
            "Map {}x{} with {} characters, hitbox radius {}",
            MAP_WIDTH,
            MAP_HEIGHT,
            scene.characters().len(),
            scene.config().hitbox_radius()
        );

        Ok(Self {
            scene,
            rng,
            player,
            townsfolk,
            route_step: 0,
            script_frames_left: 0,
        })
    }

    fn run(&mut self, frames: usize) -> Result<(), DemoError> {
        for frame in 0..frames {
            self.drive_player();
            if frame % WANDER_INTERVAL == 0 {
                self.wander();
            }

            let reports = self.scene.update_frame()?;
            let blocked = reports.iter().filter(|r| r.requested != r.applied).count();
            if blocked > 0 {
                log::debug!("Frame {frame}: {blocked} character(s) blocked");
            }

            self.run_scripts(frame);

            if frame % 60 == 0 {
                if let Some(player) = self.scene.character(self.player) {
                    log::info!(
                        "Frame {frame}: player at ({:.4}, {:.4}) facing {:?}",
                        player.position().x,
                        player.position().y,
                        player.facing()
                    );
                }
            }
        }

        log::info!(
            "Done: {} steps ({:.4} tiles walked)",
            self.scene.party().steps(),
            self.scene.party().distance()
        );
        Ok(())
    }

    fn drive_player(&mut self) {
        if self.scene.is_event_running() || self.route_step >= ROUTE.len() {
            return;
        }
        let Some(player) = self.scene.character_mut(self.player) else {
            return;
        };
        if !player.is_moving() {
            let (dx, dy) = ROUTE[self.route_step];
            log::info!("Player route leg {}: ({dx}, {dy})", self.route_step + 1);
            player.move_by(dx, dy);
            self.route_step += 1;
        }
    }

    fn wander(&mut self) {
        for &id in &self.townsfolk {
            let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            if let Some(npc) = self.scene.character_mut(id) {
                npc.move_straight(direction);
            }
        }
    }

    fn run_scripts(&mut self, frame: usize) {
        for id in self.scene.take_starting_events() {
            log::info!("Frame {frame}: running script of event {id}");
            self.scene.set_event_running(true);
            self.script_frames_left = SCRIPT_FRAMES;
        }
        if self.script_frames_left > 0 {
            self.script_frames_left -= 1;
            if self.script_frames_left == 0 {
                self.scene.set_event_running(false);
                log::info!("Frame {frame}: script finished");
            }
        }
    }
}

fn main() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => FreeMoveConfig::load_from_file(&path)?,
        None => FreeMoveConfig::default(),
    };
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    let frames = match args.next() {
        Some(raw) => raw.parse().map_err(|_| DemoError::Frames(raw))?,
        None => DEFAULT_FRAMES,
    };

    println!("=== Walkabout Demo ===");
    println!("Set RUST_LOG=debug for collision details, trace for every frame");
    println!();

    let mut demo = Walkabout::new(config)?;
    demo.run(frames)
}
