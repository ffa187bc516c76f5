//! Convert a Speckle commit object into an in-memory scene and print a summary.
//!
//! Run with: cargo run --bin spk_import -- <commit.json> [default-units]

use std::env;

use anyhow::{Context, Result};
use spk_core::{load_commit, ConversionSettings};
use spk_math::Units;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <commit.json> [default-units]", args[0]);
        eprintln!("\nDefault units: {} (one of mm, cm, m, km, in, ft, yd, mi)", Units::default());
        std::process::exit(1);
    }

    let path = &args[1];
    let settings = match args.get(2) {
        Some(tag) => ConversionSettings::with_units(
            tag.parse::<Units>()
                .with_context(|| format!("Invalid default units '{}'", tag))?,
        ),
        None => ConversionSettings::default(),
    };

    log::info!("Loading commit {} (default units: {})", path, settings.default_units);

    let scene = load_commit(path, &settings)
        .with_context(|| format!("Failed to convert commit '{}'", path))?;

    println!("\n=== Scene: {} ===", scene.name);
    println!("Edge chains: {}", scene.edge_chain_count());
    println!("Edges: {}", scene.edge_count());
    println!("Points: {}", scene.point_count());
    println!("Materials: {}", scene.material_count());

    if !scene.edges.is_empty() {
        println!("\n--- Edge chains ---");
        for (i, chain) in scene.edges.iter().enumerate() {
            match (chain.points.first(), chain.points.last()) {
                (Some(start), Some(end)) => println!(
                    "  [{}] {} points ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                    i,
                    chain.points.len(),
                    start.x,
                    start.y,
                    start.z,
                    end.x,
                    end.y,
                    end.z
                ),
                _ => println!("  [{}] empty", i),
            }
        }
    }

    if let Some((min, max)) = scene.bounds() {
        println!("\n--- Bounds (inches) ---");
        println!("  Min: ({:.2}, {:.2}, {:.2})", min.x, min.y, min.z);
        println!("  Max: ({:.2}, {:.2}, {:.2})", max.x, max.y, max.z);
    }

    Ok(())
}
