//! Per-pass generation state threaded through every stage.

use super::params::GenerationParams;
use super::seed::{SubStream, Subsystem, derive_subsystem_seed};

/// Parameters plus seed-derived random streams for one generation pass.
///
/// Streams are derived from `(seed, subsystem)` on demand, so the order in
/// which stages ask for them never changes what they draw.
pub struct GenerationContext<'a> {
    params: &'a GenerationParams,
}

impl<'a> GenerationContext<'a> {
    pub fn new(params: &'a GenerationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &'a GenerationParams {
        self.params
    }

    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    pub fn stream(&self, subsystem: Subsystem) -> SubStream {
        SubStream::from_seed(derive_subsystem_seed(self.params.seed, subsystem))
    }
}
