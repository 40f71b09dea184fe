// Inspect an OBJ mesh and the grid built over it
// Run with: cargo run --release --bin mesh_info -- <path_to.obj>

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lattice_core::load_obj;
use lattice_renderer::{Color, Grid, Matte, MeshShading};

#[derive(Parser)]
#[command(name = "mesh_info")]
#[command(about = "Print OBJ mesh statistics and grid cell counts", long_about = None)]
struct Cli {
    /// OBJ file to inspect
    file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    println!("Loading OBJ: {}", cli.file.display());

    let mesh = load_obj(&cli.file)
        .with_context(|| format!("failed to load mesh {}", cli.file.display()))?;

    println!("Vertices: {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    if let Some(ref normals) = mesh.normals {
        println!("Normals: {} (from file)", normals.len());
    } else {
        println!("Normals: None (will be computed)");
    }

    let b = mesh.bounds;
    println!(
        "Bounds: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
        b.x0, b.y0, b.z0, b.x1, b.y1, b.z1
    );

    let degenerate = mesh
        .faces()
        .filter(|&[i0, i1, i2]| {
            let p0 = mesh.positions[i0];
            let area = (mesh.positions[i1] - p0).cross(mesh.positions[i2] - p0).length();
            area < 0.0001
        })
        .count();
    println!("Degenerate triangles: {}", degenerate);

    let mut grid = Grid::new();
    grid.add_mesh(mesh, Arc::new(Matte::new(0.25, 0.75, Color::ONE)), MeshShading::Smooth);
    grid.setup_cells();

    let (nx, ny, nz) = grid.cell_counts();
    println!("\nGrid: {} x {} x {} cells ({} total)", nx, ny, nz, nx * ny * nz);

    Ok(())
}
