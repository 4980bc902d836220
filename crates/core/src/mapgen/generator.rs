//! High-level generation entry point that validates parameters and runs the pipeline.

mod pipeline;

use super::GenerationError;
use super::context::GenerationContext;
use super::model::GeneratedDungeon;
use super::params::GenerationParams;

pub struct DungeonGenerator {
    params: GenerationParams,
}

impl DungeonGenerator {
    pub fn new(params: GenerationParams) -> Result<Self, GenerationError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Runs one full pass. A failed pass returns no partial dungeon.
    pub fn generate(&self) -> Result<GeneratedDungeon, GenerationError> {
        pipeline::generate_dungeon(&GenerationContext::new(&self.params))
    }
}
