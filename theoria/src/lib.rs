//! # Theoria - Theory-Style Property Testing for Rust
//!
//! Theoria states theories over values drawn from one to four Sources, filters
//! them with assumptions, maps them to derived values while keeping the drawn
//! precursor, and shrinks falsifying values by walking every slot's shrink
//! stream in lockstep.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use theoria::sources::integers;
//! use theoria::{RecordingReporter, theory};
//!
//! let reporter = Rc::new(RecordingReporter::new());
//! let result = theory()
//!     .with_fixed_seed(2)
//!     .with_reporter(reporter.clone())
//!     .for_all3(integers(0i32, 100), integers(0i32, 100), integers(0i32, 100))
//!     .check(|a, b, c| !(*a > 50 && *b > 50 && *c > 50));
//!
//! assert!(result.is_err());
//! assert_eq!(
//!     reporter.smallest::<theoria::Tuple3<i32, i32, i32>>(),
//!     Some(theoria::Tuple3(51, 51, 51))
//! );
//! ```

// Public modules
pub mod config;
pub mod error;
#[cfg(feature = "persistence")]
pub mod persistence;
pub mod reporter;
pub mod rng;
pub mod runner;
pub mod shrink;
pub mod source;
pub mod sources;
pub mod strategy;
pub mod theory;
pub mod tuple;

// Re-export the main public API
pub use config::{ConfigError, Configuration};
pub use error::{Fault, TheoryError, TheoryResult};
#[cfg(feature = "persistence")]
pub use persistence::{FailureRecord, FailureStore, PersistingReporter};
pub use reporter::{ConsoleReporter, Falsification, RecordingReporter, Reported, Reporter};
pub use rng::Prng;
pub use runner::TheoryRunner;
pub use shrink::{ShrinkContext, Shrinks};
pub use source::{Source, from_fn};
pub use strategy::Strategy;
pub use theory::{
    PrecursorSubject1, PrecursorSubject2, PrecursorSubject3, PrecursorSubject4, Subject, Theories,
    TheoryBuilder1, TheoryBuilder2, TheoryBuilder3, TheoryBuilder4, theory,
};
pub use tuple::{Tuple2, Tuple3, Tuple4, Tuple5};
