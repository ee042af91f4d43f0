//! Run configuration for a single theory.

use std::fmt;
use std::rc::Rc;

use crate::reporter::{ConsoleReporter, Reporter};
use crate::rng::Prng;

/// How a theory is run: sample budget, shrink budget, seed and reporter
///
/// Strategies are immutable; every `with_*` method returns a new value.
#[derive(Clone)]
pub struct Strategy {
    seed: u64,
    examples: usize,
    shrink_cycles: usize,
    generate_attempts: Option<usize>,
    reporter: Rc<dyn Reporter>,
}

impl Strategy {
    /// Create a strategy. Until set explicitly, the generation retry ceiling
    /// is ten times the example count.
    pub fn new(seed: u64, examples: usize, shrink_cycles: usize, reporter: Rc<dyn Reporter>) -> Self {
        Self {
            seed,
            examples,
            shrink_cycles,
            generate_attempts: None,
            reporter,
        }
    }

    pub fn with_examples(&self, examples: usize) -> Self {
        Self {
            examples,
            ..self.clone()
        }
    }

    pub fn with_shrink_cycles(&self, shrink_cycles: usize) -> Self {
        Self {
            shrink_cycles,
            ..self.clone()
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Bound on assumption rejections during one run
    pub fn with_generate_attempts(&self, generate_attempts: usize) -> Self {
        Self {
            generate_attempts: Some(generate_attempts),
            ..self.clone()
        }
    }

    pub fn with_reporter(&self, reporter: Rc<dyn Reporter>) -> Self {
        Self {
            reporter,
            ..self.clone()
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn examples(&self) -> usize {
        self.examples
    }

    pub fn shrink_cycles(&self) -> usize {
        self.shrink_cycles
    }

    pub fn generate_attempts(&self) -> usize {
        self.generate_attempts
            .unwrap_or_else(|| self.examples.saturating_mul(10))
    }

    pub fn reporter(&self) -> &Rc<dyn Reporter> {
        &self.reporter
    }

    /// A fresh generator for this strategy's seed
    pub fn prng(&self) -> Prng {
        Prng::seeded(self.seed)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(crate::rng::fresh_seed(), 1000, 10000, Rc::new(ConsoleReporter::new()))
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("seed", &self.seed)
            .field("examples", &self.examples)
            .field("shrink_cycles", &self.shrink_cycles)
            .field("generate_attempts", &self.generate_attempts())
            .finish_non_exhaustive()
    }
}
