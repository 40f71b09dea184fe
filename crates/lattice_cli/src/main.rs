use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lattice_core::load_obj;
use lattice_math::Vec3;
use lattice_renderer::{
    render, Ambient, Camera, Color, Disk, Emissive, Grid, Instance, LatticeNoise, Matte,
    MeshShading, Phong, Plane, PointLight, Reflective, RenderConfig, Sphere, Tracer, World,
    WrappedTwoColors,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "lattice-cli")]
#[command(about = "Render the Lattice demo scene to a PNG", long_about = None)]
struct Cli {
    /// JSON render configuration; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tracer to use, overriding the configuration
    #[arg(long, value_enum)]
    tracer: Option<TracerArg>,

    /// OBJ mesh to add to the scene
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Output image path
    #[arg(long, default_value = "render.png")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TracerArg {
    #[value(alias = "ray_cast")]
    Raycast,
    Whitted,
    #[value(alias = "path_trace")]
    Path,
}

impl From<TracerArg> for Tracer {
    fn from(arg: TracerArg) -> Self {
        match arg {
            TracerArg::Raycast => Tracer::RayCast,
            TracerArg::Whitted => Tracer::Whitted,
            TracerArg::Path => Tracer::PathTrace,
        }
    }
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(tracer) = cli.tracer {
        config.tracer = tracer.into();
    }

    Ok(config)
}

/// Spheres on a jittered lattice over a noise-textured floor, with a mirror
/// sphere in the middle and an emissive disk overhead for path tracing.
fn build_scene(config: &RenderConfig, mesh: Option<&PathBuf>) -> Result<World> {
    let mut world = World::from_config(config);
    world.ambient = Ambient::new(0.5, Color::ONE);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut spheres = Grid::new();
    for i in -4..=4 {
        for k in -4..=4 {
            let center = Vec3::new(
                i as f32 * 2.5 + rng.gen_range(-0.5..0.5),
                0.6,
                k as f32 * 2.5 + rng.gen_range(-0.5..0.5),
            );
            let color = Color::new(rng.gen(), rng.gen(), rng.gen());
            let material = Arc::new(Phong::new(0.25, 0.6, 0.2, 20.0, color));
            spheres.add_object(Sphere::new(center, 0.6, material));
        }
    }
    spheres.setup_cells();
    world.add_object(spheres);

    let mirror = Reflective::new(
        Phong::new(0.1, 0.2, 0.4, 100.0, Color::splat(0.9)),
        0.75,
        Color::ONE,
    );
    world.add_object(Sphere::new(Vec3::new(0.0, 2.5, 0.0), 2.0, Arc::new(mirror)));

    let floor_texture = WrappedTwoColors::new(
        LatticeNoise::with_octaves(config.seed, 4, 2.0, 0.5),
        Color::new(0.85, 0.8, 0.7),
        Color::new(0.35, 0.3, 0.25),
    )
    .with_expansion(4.0);
    let floor = Matte::textured(0.3, 0.7, Arc::new(floor_texture));
    world.add_object(Plane::new(Vec3::ZERO, Vec3::Y, Arc::new(floor)));

    let mut sky = Disk::new(
        Vec3::new(0.0, 30.0, 0.0),
        Vec3::NEG_Y,
        25.0,
        Arc::new(Emissive::new(2.0, Color::ONE)),
    );
    sky.set_shadows(false);
    world.add_object(sky);

    if let Some(path) = mesh {
        let mesh =
            load_obj(path).with_context(|| format!("failed to load mesh {}", path.display()))?;

        let material = Arc::new(Matte::new(0.25, 0.75, Color::splat(0.8)));
        let mut grid = Grid::new();
        grid.add_mesh(mesh, material, MeshShading::Smooth);
        grid.setup_cells();

        let mut instance = Instance::new(grid);
        instance.translate(Vec3::new(0.0, 0.0, 6.0));
        instance.compute_bounding_box();
        world.add_object(instance);
    }

    world.add_light(PointLight::new(Vec3::new(15.0, 25.0, 20.0), 3.0, Color::ONE));

    Ok(world)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::info!(
        "Rendering {}x{} with {:?}",
        config.view_plane.hres,
        config.view_plane.vres,
        config.tracer
    );

    let world = build_scene(&config, cli.mesh.as_ref())?;
    let camera = Camera::new(Vec3::new(0.0, 8.0, 24.0), Vec3::new(0.0, 1.0, 0.0));

    let image = render(&world, &camera, &config);
    image
        .save_png(&cli.out, &world.view_plane)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    log::info!("Wrote {}", cli.out.display());
    Ok(())
}
