use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lumen_core::SceneFile;
use lumen_renderer::{build_scene, save_image, SceneSetup};

mod cli;
mod scenes;

use cli::{Args, SceneChoice};

fn main() -> Result<()> {
    let args = Args::parse();
    cli::init_logger(args.log_level.into());

    log::info!("Starting Lumen");

    // Scene generation and the serial render share one generator
    let mut rng = StdRng::seed_from_u64(args.seed);

    let SceneSetup { world, mut camera } = match &args.scene_file {
        Some(path) => {
            let desc = SceneFile::load(path)
                .with_context(|| format!("Failed to load scene file {}", path.display()))?;
            build_scene(&desc, path.parent())
                .with_context(|| format!("Failed to build scene {}", path.display()))?
        }
        None => {
            log::info!("Using built-in scene {:?}", args.scene);
            match args.scene {
                SceneChoice::BouncingSpheres => scenes::bouncing_spheres(&mut rng),
                SceneChoice::CheckeredSpheres => scenes::checkered_spheres(),
                SceneChoice::Earth => scenes::earth(&args.earth_texture),
                SceneChoice::Simple => scenes::simple(),
            }
        }
    };

    if let Some(width) = args.width {
        camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        camera.max_depth = max_depth;
    }

    let image = if args.threads == 1 {
        camera.render(&world, &mut rng)
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build()
            .context("Failed to start render threads")?;
        pool.install(|| camera.render_parallel(&world, args.seed))
    };

    save_image(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
