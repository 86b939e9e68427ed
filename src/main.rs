use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scanraster::prelude::*;

const CAMERA_SPEED: f32 = 2.0;
const CUBE_SPIN: Vec3 = Vec3 {
    x: 0.01,
    y: 0.02,
    z: 0.0,
};

#[derive(Parser, Debug)]
#[command(name = "scanraster")]
#[command(about = "Scanline triangle rasterizer demo")]
struct Args {
    /// Draw white triangle edges only
    #[arg(long, conflicts_with = "filled_wireframe")]
    wireframe: bool,

    /// Fill triangles, then draw their edges on top
    #[arg(long)]
    filled_wireframe: bool,

    /// Use the plain z in the vertical perspective divide
    #[arg(long)]
    no_distortion: bool,

    /// Field-of-view scalar applied before centering on screen
    #[arg(long)]
    fov: Option<f32>,

    /// OBJ file to add to the scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Write frames as PNGs into this directory instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Number of frames to write in snapshot mode
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Seed for terrain heights and vertex colors
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if self.wireframe {
            config.render_mode = RenderMode::Wireframe;
        } else if self.filled_wireframe {
            config.render_mode = RenderMode::FilledWireframe;
        }
        if self.no_distortion {
            config.distortion = DistortionCorrection::None;
        }
        if let Some(fov) = self.fov {
            config.fov_scalar = fov;
        }
        config
    }
}

fn build_scene(engine: &mut Engine, args: &Args) -> Result<(), String> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut terrain = Object::terrain(20, 20, 10.0, &mut rng);
    terrain.position = Vec3::new(-100.0, -80.0, 40.0);
    engine.add_object(terrain);

    let mut cube = Object::cube(10.0, &mut rng);
    cube.position = Vec3::new(0.0, 0.0, 60.0);
    engine.add_object(cube);

    if let Some(path) = &args.obj {
        let mut model = Object::from_obj(path, Color::WHITE).map_err(|e| e.to_string())?;
        model.position = Vec3::new(0.0, 0.0, 30.0);
        engine.add_object(model);
    }

    log::info!("scene has {} polygons", engine.polygon_count());
    Ok(())
}

fn animate(engine: &mut Engine) {
    if let Some(cube) = engine.objects_mut().get_mut(1) {
        cube.rotate(CUBE_SPIN);
    }
}

fn run_snapshot(engine: &mut Engine, dir: PathBuf, frames: u32) -> Result<(), String> {
    let mut sink = PngSink::new(&dir).map_err(|e| e.to_string())?;
    for _ in 0..frames {
        animate(engine);
        engine.draw(&mut sink).map_err(|e| e.to_string())?;
    }
    log::info!("wrote {} frames to {}", sink.frames_written(), dir.display());
    Ok(())
}

fn run_window(engine: &mut Engine, config: &EngineConfig) -> Result<(), String> {
    let mut window = Window::new("scanraster", config.width, config.height)?;
    let mut timer = FrameTimer::new();

    loop {
        let frame_start = Instant::now();

        if window.poll_events() == WindowEvent::Quit {
            break;
        }

        let (x, y, z) = window.input().direction();
        engine
            .camera_mut()
            .translate(Vec3::new(x, y, z) * CAMERA_SPEED);

        animate(engine);
        let stats = engine.draw(&mut window)?;
        log::debug!("{} drawn, {} culled", stats.drawn, stats.culled);

        timer.record(frame_start.elapsed());
        window.set_title(&format!(
            "Objects: {}, Polygons: {}, FPS: {:.0}, Average: {}ms",
            engine.objects().len(),
            engine.polygon_count(),
            timer.fps(),
            timer.average().as_millis()
        ))?;
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();

    let args = Args::parse();
    let config = args.engine_config();
    let mut engine = Engine::new(config).map_err(|e| e.to_string())?;
    build_scene(&mut engine, &args)?;

    match args.snapshot.clone() {
        Some(dir) => run_snapshot(&mut engine, dir, args.frames),
        None => run_window(&mut engine, &config),
    }
}
