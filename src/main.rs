/// Entry point and game loop.

mod cli;
mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use cli::Cli;
use config::GameConfig;
use sim::event::GameEvent;
use sim::generator::{HuntAndKill, MazeSource};
use sim::step;
use sim::world::WorldState;
use ui::canvas::PixelBuffer;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::palette::Palette;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use ui::view::View;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => match GameConfig::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::load(),
    };
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut source = HuntAndKill::from_config(&config.maze, cli.seed);
    let view = View::new(&config);
    let mut world = WorldState::new(source.generate(), view.lighting().levels());
    log::info!("{}", world.summary());

    let mut sound = if cli.no_sound { None } else { SoundEngine::new() };

    // Config warnings must print before the alternate screen takes over.
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }

    let mut renderer = Renderer::new(Palette::new(config.colors.palette));
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let result = game_loop(&mut world, &mut source, &view, &mut renderer, &mut gp, sound.as_mut(), &config);

    if let Some(sfx) = sound.as_mut() {
        sfx.stop();
    }
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
        return ExitCode::FAILURE;
    }

    println!("Thanks for playing aMAZEing!");
    println!("Mazes explored: {}", world.maze_count);
    ExitCode::SUCCESS
}

fn game_loop(
    world: &mut WorldState,
    source: &mut dyn MazeSource,
    view: &View,
    renderer: &mut Renderer,
    gp: &mut GamepadState,
    mut sound: Option<&mut SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.enable_release_events();

    if let Some(sfx) = sound.as_deref_mut() {
        sfx.play_music();
    }

    let result = run_frames(world, source, view, renderer, sound, config, &mut kb, gp);
    kb.restore();
    result
}

#[allow(clippy::too_many_arguments)]
fn run_frames(
    world: &mut WorldState,
    source: &mut dyn MazeSource,
    view: &View,
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundEngine>,
    config: &GameConfig,
    kb: &mut InputState,
    gp: &mut GamepadState,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = Duration::from_millis(config.display.frame_ms.max(1));
    let (w, h) = view.canvas_size(&world.maze.grid);
    let mut pixels = PixelBuffer::new(w, h);
    let mut frame_count: u64 = 0;

    loop {
        let started = Instant::now();

        kb.drain_events();
        gp.update();

        let mut inputs = kb.events(config.input);
        inputs.extend(gp.events(config.input));

        let events = step::step(world, &inputs, &mut *source);
        process_sound_events(sound.as_deref_mut(), &events);
        if events.contains(&GameEvent::QuitRequested) {
            break;
        }

        let size = view.canvas_size(&world.maze.grid);
        if size != (pixels.width(), pixels.height()) {
            pixels = PixelBuffer::new(size.0, size.1);
        }
        view.render(world, frame_count, &mut pixels);
        renderer.present(&pixels, world)?;

        frame_count += 1;
        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

fn process_sound_events(sound: Option<&mut SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::MusicStarted => sfx.play_music(),
            GameEvent::MusicStopped => sfx.stop(),
            GameEvent::Victory => sfx.play_victory(),
            GameEvent::QuitRequested => {}
        }
    }
}
