use clap::Parser;
use log::info;
use platformer::camera::Camera;
use platformer::clock::FixedTimestep;
use platformer::config::GameConfig;
use platformer::game::World;
use platformer::input_system::{self, GameAction, InputState};
use platformer::logging;
use platformer::render::render_world;
use std::path::PathBuf;
use std::time::Instant;

/// 2D platformer sandbox.
#[derive(Parser, Debug)]
#[command(name = "platformer", version, about)]
struct Args {
    /// Config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Write the default config to the config path and exit.
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config_path = args.config.or_else(GameConfig::default_path);

    if args.write_default_config {
        let path = config_path.ok_or("no config directory on this platform, pass --config")?;
        GameConfig::default().save(&path)?;
        info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match &config_path {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };

    run(&config)
}

fn run(config: &GameConfig) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(&config.window.title, config.window.width, config.window.height)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window
        .into_canvas()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut world = World::from_config(config);
    let mut camera = Camera::new(config.window.width, config.window.height, config.camera_zoom);
    let mut clock = FixedTimestep::new(config.time_step, config.max_steps_per_frame);

    info!(
        "Running at {:.1} updates/s, {} world units across",
        1.0 / config.time_step,
        config.camera_zoom
    );

    let mut last_frame = Instant::now();
    'running: loop {
        for action in input_system::poll_actions(&mut event_pump) {
            match action {
                GameAction::Quit => break 'running,
                GameAction::TogglePause => clock.toggle_pause(),
                GameAction::StepOnce => clock.single_step(),
                GameAction::RespawnPlayer => world.respawn_player(),
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        let steps = clock.advance(elapsed);
        if steps > 0 {
            let input = InputState::capture(&event_pump.keyboard_state());
            for _ in 0..steps {
                world.update(clock.step(), &input);
            }
        }

        let (width, height) = canvas.output_size()?;
        camera.on_resize(width, height);
        let player = world.position(world.player());
        camera.center(player.x, player.y);

        render_world(&mut canvas, &world, &camera)?;
        canvas.present();
    }

    info!("Shutting down");
    Ok(())
}
