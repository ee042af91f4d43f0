//! Error types and fault capture for theory runs.

use std::any::Any;

use thiserror::Error;

/// A panic raised while evaluating a property, kept as the cause of a
/// falsification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Recover the message from a panic payload
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a theory did not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    /// A value satisfying the assumptions falsified the property
    #[error(
        "Property falsified after {examples_tried} examples (seed: {seed}): smallest failing value {smallest} found after {shrink_steps} shrink steps{}",
        cause_suffix(.cause)
    )]
    Falsified {
        seed: u64,
        examples_tried: usize,
        smallest: String,
        shrink_steps: usize,
        cause: Option<Fault>,
    },

    /// The assumptions rejected too many generated values
    #[error(
        "Gave up after {examples_tried} examples (seed: {seed}): assumptions rejected {rejected} generated values"
    )]
    AssumptionsTooStrict {
        seed: u64,
        examples_tried: usize,
        rejected: usize,
    },

    /// A Source panicked while generating a value
    #[error("Generation failed at example {examples_tried} (seed: {seed}): {message}")]
    GenerationPanicked {
        seed: u64,
        examples_tried: usize,
        message: String,
    },
}

fn cause_suffix(cause: &Option<Fault>) -> String {
    match cause {
        Some(fault) => format!(" (cause: {})", fault),
        None => String::new(),
    }
}

impl TheoryError {
    /// Create a falsification error
    pub fn falsified(
        seed: u64,
        examples_tried: usize,
        smallest: impl Into<String>,
        shrink_steps: usize,
        cause: Option<Fault>,
    ) -> Self {
        Self::Falsified {
            seed,
            examples_tried,
            smallest: smallest.into(),
            shrink_steps,
            cause,
        }
    }

    /// Create an error for assumptions that could not be satisfied
    pub fn assumptions_too_strict(seed: u64, examples_tried: usize, rejected: usize) -> Self {
        Self::AssumptionsTooStrict {
            seed,
            examples_tried,
            rejected,
        }
    }

    /// Create an error for a Source that panicked during generation
    pub fn generation_panicked(seed: u64, examples_tried: usize, fault: Fault) -> Self {
        Self::GenerationPanicked {
            seed,
            examples_tried,
            message: fault.message,
        }
    }

    pub fn is_falsified(&self) -> bool {
        matches!(self, Self::Falsified { .. })
    }

    /// Seed that reproduces this outcome
    pub fn seed(&self) -> u64 {
        match self {
            Self::Falsified { seed, .. }
            | Self::AssumptionsTooStrict { seed, .. }
            | Self::GenerationPanicked { seed, .. } => *seed,
        }
    }

    /// The fault behind a falsification, if the property panicked
    pub fn cause(&self) -> Option<&Fault> {
        match self {
            Self::Falsified { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }
}

/// Result of checking a theory
pub type TheoryResult = Result<(), TheoryError>;
