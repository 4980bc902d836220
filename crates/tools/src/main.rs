use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cryptgen_core::mapgen::{GenerationParams, RoamingClass};
use cryptgen_core::{
    CancelToken, ChunkView, DungeonGenerator, GeneratedDungeon, GeometryBuilder, MapFile,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a dungeon and write its map file
    Generate {
        /// Generation parameters (TOML)
        #[arg(short, long, default_value = "params/standard.toml")]
        params: PathBuf,
        /// Override the seed from the parameter file
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "crypt")]
        name: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Add roaming packs and props to an existing map file
    Populate {
        #[arg(short, long)]
        map: PathBuf,
        #[arg(short, long, default_value = "params/standard.toml")]
        params: PathBuf,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Defaults to overwriting the input map
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Load a map file, restore its walls, and print a summary
    Inspect {
        #[arg(short, long)]
        map: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a dungeon and report the chunk hand-off
    Chunks {
        #[arg(short, long, default_value = "params/standard.toml")]
        params: PathBuf,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Stop after this many chunks, as a host scheduler would
        #[arg(long)]
        cancel_after: Option<usize>,
    },
}

#[derive(Serialize)]
struct MapSummary {
    name: String,
    seed: u64,
    width: usize,
    depth: usize,
    walkable_cells: usize,
    wall_edges: usize,
    doors: usize,
    enemies: usize,
    roamers: usize,
    bosses: usize,
    props: usize,
    prop_kinds: BTreeMap<&'static str, usize>,
}

struct ChunkStats;

impl GeometryBuilder for ChunkStats {
    type Output = (usize, usize);

    fn build_chunk(&mut self, chunk: &ChunkView<'_>) -> (usize, usize) {
        (chunk.walkable_cells().count(), chunk.wall_edges().count())
    }
}

fn load_params(path: &Path, seed: Option<u64>) -> Result<GenerationParams> {
    let params = GenerationParams::load(path)
        .with_context(|| format!("Failed to load parameters: {}", path.display()))?;
    Ok(match seed {
        Some(seed) => params.with_seed(seed),
        None => params,
    })
}

fn generate(params: GenerationParams) -> Result<GeneratedDungeon> {
    let seed = params.seed;
    DungeonGenerator::new(params)
        .and_then(|generator| generator.generate())
        .with_context(|| format!("Generation failed for seed {seed}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Args::parse().command {
        Command::Generate { params, seed, name, out } => {
            let dungeon = generate(load_params(&params, seed)?)?;
            MapFile::from_dungeon(&dungeon, &name)
                .context("Failed to encode tile data")?
                .write_atomic(&out)
                .with_context(|| format!("Failed to write map file: {}", out.display()))?;
            info!(path = %out.display(), fingerprint = dungeon.fingerprint(), "map written");
            println!(
                "Wrote {} ({} rooms, seed {})",
                out.display(),
                dungeon.rooms.len(),
                dungeon.seed
            );
            for boss in dungeon.plan.bosses() {
                let room = boss.room.map_or(-1, |room| room.0 as i64);
                println!(
                    "Boss {} in room {} at ({},{})",
                    boss.monster.tag(),
                    room,
                    boss.pos.x,
                    boss.pos.z
                );
            }
        }
        Command::Populate { map, params, seed, out } => {
            let mut file = MapFile::load(&map)
                .with_context(|| format!("Failed to read map file: {}", map.display()))?;
            let params = load_params(&params, seed)?;
            let added = file.populate(&params).context("Failed to populate map")?;
            let out = out.unwrap_or(map);
            file.write_atomic(&out)
                .with_context(|| format!("Failed to write map file: {}", out.display()))?;
            info!(path = %out.display(), seed = params.seed, "populated map written");
            println!(
                "Added {} enemies and {} props to {}",
                added.enemies.len(),
                added.props.len(),
                out.display()
            );
        }
        Command::Inspect { map, json } => {
            let file = MapFile::load(&map)
                .with_context(|| format!("Failed to read map file: {}", map.display()))?;
            let level = file.restore_level().with_context(|| "Failed to decode tile data")?;
            let spawns = file.spawn_points();
            let mut prop_kinds = BTreeMap::new();
            for prop in &file.placed_props {
                *prop_kinds.entry(prop.kind.tag()).or_insert(0) += 1;
            }
            let summary = MapSummary {
                name: file.name.clone(),
                seed: file.seed,
                width: level.grid.width(),
                depth: level.grid.depth(),
                walkable_cells: level.grid.walkable_positions().len(),
                wall_edges: level.walls.len(),
                doors: file.doors.len(),
                enemies: spawns.len(),
                roamers: spawns
                    .iter()
                    .filter(|spawn| spawn.roaming == RoamingClass::Roamer)
                    .count(),
                bosses: spawns.iter().filter(|spawn| spawn.is_boss).count(),
                props: file.placed_props.len(),
                prop_kinds,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Map: {} (seed {})", summary.name, summary.seed);
                println!("Size: {}x{}", summary.width, summary.depth);
                println!("Walkable cells: {}", summary.walkable_cells);
                println!("Wall edges: {}", summary.wall_edges);
                println!("Doors: {}", summary.doors);
                println!(
                    "Enemies: {} ({} roaming, {} bosses)",
                    summary.enemies, summary.roamers, summary.bosses
                );
                println!("Props: {}", summary.props);
                for (kind, count) in &summary.prop_kinds {
                    println!("  {kind}: {count}");
                }
            }
        }
        Command::Chunks { params, seed, cancel_after } => {
            let dungeon = generate(load_params(&params, seed)?)?;
            let cancel = CancelToken::new();
            let mut build = dungeon.chunk_build(ChunkStats, cancel.clone());
            for chunk in build.by_ref() {
                let (walkable, edges) = chunk.output;
                let descriptor = chunk.descriptor;
                println!(
                    "chunk {:>3} ({},{}) origin ({},{}) {}x{}: {} walkable, {} wall edges",
                    descriptor.index,
                    descriptor.column,
                    descriptor.row,
                    descriptor.origin.x,
                    descriptor.origin.z,
                    descriptor.width,
                    descriptor.depth,
                    walkable,
                    edges
                );
                if cancel_after.is_some_and(|limit| descriptor.index + 1 >= limit) {
                    cancel.cancel();
                }
            }
            println!("Built {} of {} chunks", build.completed(), build.total());
            if build.was_cancelled() && cancel_after.is_none() {
                bail!("Chunk build cancelled unexpectedly");
            }
        }
    }

    Ok(())
}
