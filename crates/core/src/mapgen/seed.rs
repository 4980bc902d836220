//! Deterministic seed mixing and per-subsystem random streams for map generation.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Each subsystem draws from its own stream so extra draws in one never shift another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subsystem {
    RoomPlacement,
    RoomSpawns,
    Roamers,
    Props,
    EnemyCosmetics,
    PropCosmetics,
}

impl Subsystem {
    fn stream_code(self) -> u64 {
        match self {
            Self::RoomPlacement => 1,
            Self::RoomSpawns => 2,
            Self::Roamers => 3,
            Self::Props => 4,
            Self::EnemyCosmetics => 5,
            Self::PropCosmetics => 6,
        }
    }
}

pub(super) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

pub(super) fn derive_subsystem_seed(run_seed: u64, subsystem: Subsystem) -> u64 {
    mix_seed_stream(run_seed ^ 0x9E37_79B9_7F4A_7C15, subsystem.stream_code())
}

pub struct SubStream {
    rng: ChaCha8Rng,
}

impl SubStream {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Inclusive on both ends.
    pub fn range_usize(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = (max_value - min_value) as u64 + 1;
        min_value + (self.next_u64() % range_size) as usize
    }

    /// Inclusive on both ends.
    pub fn range_i32(&mut self, min_value: i32, max_value: i32) -> i32 {
        debug_assert!(min_value <= max_value);
        let range_size = (i64::from(max_value) - i64::from(min_value)) as u64 + 1;
        (i64::from(min_value) + (self.next_u64() % range_size) as i64) as i32
    }

    /// Uniform in `[0, 1)`.
    pub fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    pub fn range_f32(&mut self, min_value: f32, max_value: f32) -> f32 {
        min_value + (max_value - min_value) * self.unit_f64() as f32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit_f64() < probability
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_with = self.range_usize(0, index);
            items.swap(index, swap_with);
        }
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.range_usize(0, items.len() - 1)]
    }
}
