//! Theory builders: the public entry point for stating and checking theories.
//!
//! ```rust
//! use theoria::sources::integers;
//!
//! let result = theoria::theory()
//!     .with_fixed_seed(7)
//!     .for_all2(integers(0i32, 100), integers(0i32, 100))
//!     .assuming(|a, b| a < b)
//!     .check(|a, b| b - a > 0);
//! assert!(result.is_ok());
//! ```

use std::rc::Rc;

use crate::config::Configuration;
use crate::reporter::Reporter;
use crate::source::Source;
use crate::strategy::Strategy;

// Shared by the multi-source builders: each holds a `strategy`, a `source`
// over the tuple form and an `assumption` over the slots.
macro_rules! theory_operations {
    ($name:ident => $tuple:ident; $($ty:ident . $slot:ident . $idx:tt),+) => {
        impl<$($ty: Clone + 'static),+> $name<$($ty),+> {
            /// Only consider values accepted by both the current assumption
            /// and `assumption`
            pub fn assuming<F>(self, assumption: F) -> Self
            where
                F: Fn($(&$ty),+) -> bool + 'static,
            {
                let previous = self.assumption;
                Self {
                    strategy: self.strategy,
                    source: self.source,
                    assumption: Rc::new(move |$($slot: &$ty),+| {
                        previous($($slot),+) && assumption($($slot),+)
                    }),
                }
            }

            /// Search for values falsifying `property`
            pub fn check<F>(self, property: F) -> $crate::error::TheoryResult
            where
                F: Fn($(&$ty),+) -> bool,
            {
                let Self {
                    strategy,
                    source,
                    assumption,
                } = self;
                $crate::runner::check_direct(
                    strategy,
                    &source,
                    &|values: &$tuple<$($ty),+>| assumption($(&values.$idx),+),
                    &|values: &$tuple<$($ty),+>| property($(&values.$idx),+),
                )
            }

            /// Like [`check`](Self::check) for a consumer that asserts instead
            /// of returning a verdict; a panic falsifies the theory
            pub fn check_assert<F>(self, consumer: F) -> $crate::error::TheoryResult
            where
                F: Fn($(&$ty),+),
            {
                self.check(move |$($slot: &$ty),+| {
                    consumer($($slot),+);
                    true
                })
            }
        }
    };
}

mod builder;
mod combined;
mod subject;

pub use builder::{TheoryBuilder1, TheoryBuilder2, TheoryBuilder3, TheoryBuilder4};
pub use combined::{
    Combined2, Combined3, Combined4, Precursor1, Precursor2, Precursor3, Precursor4,
};
pub use subject::{
    PrecursorSubject1, PrecursorSubject2, PrecursorSubject3, PrecursorSubject4, Subject,
};

/// Start stating theories with the configuration from the environment
pub fn theory() -> Theories {
    Theories::new(Configuration::from_env().strategy())
}

/// Holds the [`Strategy`] every theory started from it runs with
#[derive(Debug, Clone)]
pub struct Theories {
    strategy: Strategy,
}

impl Default for Theories {
    fn default() -> Self {
        theory()
    }
}

impl Theories {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn with_examples(self, examples: usize) -> Self {
        Self::new(self.strategy.with_examples(examples))
    }

    pub fn with_shrink_cycles(self, shrink_cycles: usize) -> Self {
        Self::new(self.strategy.with_shrink_cycles(shrink_cycles))
    }

    /// Run with a known seed, e.g. one taken from a failure report
    pub fn with_fixed_seed(self, seed: u64) -> Self {
        Self::new(self.strategy.with_seed(seed))
    }

    pub fn with_generate_attempts(self, generate_attempts: usize) -> Self {
        Self::new(self.strategy.with_generate_attempts(generate_attempts))
    }

    pub fn with_reporter(self, reporter: Rc<dyn Reporter>) -> Self {
        Self::new(self.strategy.with_reporter(reporter))
    }

    pub fn with_strategy(self, strategy: Strategy) -> Self {
        Self::new(strategy)
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn for_all<A, S>(&self, source: S) -> TheoryBuilder1<A>
    where
        A: Clone + 'static,
        S: Source<A> + 'static,
    {
        TheoryBuilder1::new(self.strategy.clone(), Rc::new(source))
    }

    pub fn for_all2<A, B, SA, SB>(&self, a: SA, b: SB) -> TheoryBuilder2<A, B>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        SA: Source<A> + 'static,
        SB: Source<B> + 'static,
    {
        TheoryBuilder2::new(self.strategy.clone(), Combined2::new(Rc::new(a), Rc::new(b)))
    }

    pub fn for_all3<A, B, C, SA, SB, SC>(&self, a: SA, b: SB, c: SC) -> TheoryBuilder3<A, B, C>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        SA: Source<A> + 'static,
        SB: Source<B> + 'static,
        SC: Source<C> + 'static,
    {
        TheoryBuilder3::new(
            self.strategy.clone(),
            Combined3::new(Rc::new(a), Rc::new(b), Rc::new(c)),
        )
    }

    pub fn for_all4<A, B, C, D, SA, SB, SC, SD>(
        &self,
        a: SA,
        b: SB,
        c: SC,
        d: SD,
    ) -> TheoryBuilder4<A, B, C, D>
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        SA: Source<A> + 'static,
        SB: Source<B> + 'static,
        SC: Source<C> + 'static,
        SD: Source<D> + 'static,
    {
        TheoryBuilder4::new(
            self.strategy.clone(),
            Combined4::new(Rc::new(a), Rc::new(b), Rc::new(c), Rc::new(d)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;
    use crate::sources::integers;

    #[test]
    fn test_with_methods_update_strategy() {
        let reporter = Rc::new(RecordingReporter::new());
        let theories = theory()
            .with_examples(12)
            .with_shrink_cycles(34)
            .with_fixed_seed(56)
            .with_generate_attempts(78)
            .with_reporter(reporter);

        let strategy = theories.strategy();
        assert_eq!(
            (
                strategy.examples(),
                strategy.shrink_cycles(),
                strategy.seed(),
                strategy.generate_attempts()
            ),
            (12, 34, 56, 78)
        );
    }

    #[test]
    fn test_with_strategy_replaces_everything() {
        let strategy = Strategy::new(9, 3, 4, Rc::new(RecordingReporter::new()));
        let theories = theory().with_fixed_seed(1).with_strategy(strategy);
        assert_eq!(theories.strategy().seed(), 9);
        assert_eq!(theories.strategy().examples(), 3);
    }

    #[test]
    fn test_theories_can_start_several_theories() {
        let reporter = Rc::new(RecordingReporter::new());
        let theories = theory().with_fixed_seed(4).with_reporter(reporter.clone());

        assert!(theories.for_all(integers(0u8, 9)).check(|n| *n < 10).is_ok());
        assert!(theories.for_all(integers(0u8, 9)).check(|n| *n < 5).is_err());
        assert_eq!(reporter.call_count(), 1);
    }
}
