use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use cryptgen_core::codec::{decode, encode};
use cryptgen_core::mapgen::{GenerationParams, derive_walls};
use cryptgen_core::{CancelToken, ChunkView, GenerationError, GeometryBuilder, generate_dungeon};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    #[arg(short, long, default_value = "params/standard.toml")]
    params: PathBuf,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

struct CellCount;

impl GeometryBuilder for CellCount {
    type Output = usize;

    fn build_chunk(&mut self, chunk: &ChunkView<'_>) -> usize {
        chunk.descriptor().cell_count()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let base = GenerationParams::load(&args.params)
        .with_context(|| format!("Failed to load parameters: {}", args.params.display()))?;

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut exhausted = 0_u32;
    let safe_zone = base.spawns.safe_zone_radius;

    for run in 0..args.runs {
        let mut params = base.clone().with_seed(rng.next_u64());
        params.corridor_width = choose(&mut rng, &[1, 2, 3, 5]);
        params.chunk_edge = choose(&mut rng, &[7, 16, 33]);
        let seed = params.seed;

        let dungeon = match generate_dungeon(params) {
            Ok(dungeon) => dungeon,
            Err(GenerationError::PlacementExhausted { placed, required, .. }) => {
                warn!(seed, placed, required, "placement exhausted");
                exhausted += 1;
                continue;
            }
            Err(error) => return Err(error).with_context(|| format!("run {run} seed {seed}")),
        };

        // Assert invariants
        ensure!(dungeon.grid.is_fully_connected(), "Invariant failed: disconnected, seed {seed}");
        ensure!(
            derive_walls(&dungeon.grid) == dungeon.walls,
            "Invariant failed: walls unstable after promotion, seed {seed}"
        );
        let blob = encode(&dungeon.grid).with_context(|| format!("encode, seed {seed}"))?;
        let decoded = decode(&blob).with_context(|| format!("decode, seed {seed}"))?;
        ensure!(
            decoded
                .cells()
                .iter()
                .zip(dungeon.grid.cells())
                .all(|(decoded, original)| decoded.is_walkable() == original.is_walkable()),
            "Invariant failed: codec round trip, seed {seed}"
        );
        let covered: usize =
            dungeon.chunk_build(CellCount, CancelToken::new()).map(|chunk| chunk.output).sum();
        ensure!(
            covered == dungeon.grid.cells().len(),
            "Invariant failed: chunk coverage, seed {seed}"
        );
        for spawn in &dungeon.plan.enemies {
            ensure!(
                !dungeon.spawn_room().contains(spawn.pos) || spawn.room.is_none(),
                "Invariant failed: room spawn inside spawn room, seed {seed}"
            );
            ensure!(
                dungeon.spawn_position.distance_to(spawn.pos) >= safe_zone,
                "Invariant failed: enemy inside the spawn safe zone, seed {seed}"
            );
        }
        for boss in dungeon.plan.bosses() {
            ensure!(
                boss.monster.is_boss() && boss.room.is_some(),
                "Invariant failed: boss {} is not a room boss, seed {seed}",
                boss.monster.tag()
            );
        }
    }

    info!(runs = args.runs, exhausted, "fuzz sweep finished");
    println!("Fuzzing completed successfully ({exhausted} runs exhausted placement).");
    Ok(())
}
