//! The falsification search: sample, shrink, report.
//!
//! A run moves through `Sampling -> Falsified -> Shrinking -> Reported -> Done`,
//! or straight from `Sampling` to `Done` when every example holds. Values are
//! generated as precursors of type `P` and converted to the type `T` the
//! property sees; shrinking always operates on precursors.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, trace, warn};

use crate::error::{Fault, TheoryError, TheoryResult};
use crate::reporter::{Falsification, Reported, Reporter};
use crate::shrink::ShrinkContext;
use crate::source::Source;
use crate::strategy::Strategy;

/// Outcome of judging one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// An assumption turned the candidate down
    Rejected,
    Holds,
    /// The property returned false (`None`) or something panicked (`Some`)
    Fails(Option<Fault>),
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fails(_))
    }
}

/// First failing sample found while sampling
#[derive(Debug, Clone)]
pub struct Falsified<P> {
    pub value: P,
    pub cause: Option<Fault>,
    pub examples_tried: usize,
}

/// Result of the shrink search
#[derive(Debug, Clone)]
pub struct ShrinkOutcome<P> {
    /// Original failure first, smallest failure last
    pub path: Vec<P>,
    pub cause: Option<Fault>,
    pub cycles_used: usize,
    /// False when the shrink budget ran out before a local minimum was reached
    pub completed: bool,
}

impl<P> ShrinkOutcome<P> {
    pub fn smallest(&self) -> &P {
        self.path
            .last()
            .expect("shrink path always holds the original failure")
    }
}

/// Drives one theory to completion
///
/// Each candidate is judged by the precursor assumption, then converted, then
/// judged by the value assumption (if any) and finally by the property. A
/// panic anywhere in that chain falsifies the candidate.
pub struct TheoryRunner<'a, P, T> {
    strategy: Strategy,
    source: &'a dyn Source<P>,
    assumption: &'a dyn Fn(&P) -> bool,
    to_value: &'a dyn Fn(&P) -> T,
    describe: &'a dyn Fn(&T) -> String,
    value_assumption: Option<&'a dyn Fn(&T) -> bool>,
}

impl<'a, P, T> TheoryRunner<'a, P, T>
where
    P: Clone + 'static,
    T: 'static,
{
    pub fn new(
        strategy: Strategy,
        source: &'a dyn Source<P>,
        assumption: &'a dyn Fn(&P) -> bool,
        to_value: &'a dyn Fn(&P) -> T,
        describe: &'a dyn Fn(&T) -> String,
    ) -> Self {
        Self {
            strategy,
            source,
            assumption,
            to_value,
            describe,
            value_assumption: None,
        }
    }

    /// Also require `assumption` of every converted value
    pub fn assuming_value(mut self, assumption: &'a dyn Fn(&T) -> bool) -> Self {
        self.value_assumption = Some(assumption);
        self
    }

    /// Run the whole state machine
    pub fn check(&self, property: &dyn Fn(&T) -> bool) -> TheoryResult {
        let Some(falsified) = self.sample(property)? else {
            debug!(
                seed = self.strategy.seed(),
                examples = self.strategy.examples(),
                "theory held"
            );
            return Ok(());
        };

        debug!(
            seed = self.strategy.seed(),
            examples_tried = falsified.examples_tried,
            "falsified, shrinking"
        );
        let examples_tried = falsified.examples_tried;
        let outcome = self.shrink(property, falsified);
        Err(self.report(examples_tried, outcome))
    }

    /// Draw examples until one falsifies the property or the budget runs out
    pub fn sample(&self, property: &dyn Fn(&T) -> bool) -> Result<Option<Falsified<P>>, TheoryError> {
        let seed = self.strategy.seed();
        let mut rng = self.strategy.prng();
        let mut examples_tried = 0;
        let mut rejected = 0;

        while examples_tried < self.strategy.examples() {
            let size = examples_tried + 1;
            let candidate = catch_unwind(AssertUnwindSafe(|| self.source.generate(&mut rng, size)))
                .map_err(|payload| {
                    TheoryError::generation_panicked(seed, examples_tried, Fault::from_panic(payload))
                })?;

            match self.evaluate(property, &candidate) {
                Verdict::Rejected => {
                    rejected += 1;
                    trace!(rejected, "assumption rejected sample");
                    if rejected > self.strategy.generate_attempts() {
                        warn!(
                            seed,
                            examples_tried, rejected, "assumptions rejected too many samples"
                        );
                        return Err(TheoryError::assumptions_too_strict(seed, examples_tried, rejected));
                    }
                }
                Verdict::Holds => examples_tried += 1,
                Verdict::Fails(cause) => {
                    return Ok(Some(Falsified {
                        value: candidate,
                        cause,
                        examples_tried: examples_tried + 1,
                    }));
                }
            }
        }

        Ok(None)
    }

    /// Greedy descent: the first still-failing candidate of a pass becomes the
    /// new smallest value and the next pass starts from it. A shrink stream
    /// that panics ends its pass.
    pub fn shrink(&self, property: &dyn Fn(&T) -> bool, falsified: Falsified<P>) -> ShrinkOutcome<P> {
        let budget = self.strategy.shrink_cycles();
        let mut remaining = budget;
        let mut cause = falsified.cause;
        let mut smallest = falsified.value;
        let mut path = vec![smallest.clone()];
        let mut completed = true;

        'search: loop {
            let context = ShrinkContext::new(remaining, falsified.examples_tried);
            let mut improved = false;

            let stream = catch_unwind(AssertUnwindSafe(|| self.source.shrink(&smallest, &context)));
            let mut candidates = match stream {
                Ok(candidates) => candidates,
                Err(payload) => {
                    warn!(fault = %Fault::from_panic(payload), "shrinker panicked");
                    break;
                }
            };

            loop {
                let candidate = match catch_unwind(AssertUnwindSafe(|| candidates.next())) {
                    Ok(Some(candidate)) => candidate,
                    Ok(None) => break,
                    Err(payload) => {
                        warn!(fault = %Fault::from_panic(payload), "shrink stream panicked");
                        break;
                    }
                };
                if remaining == 0 {
                    warn!(budget, steps = path.len() - 1, "shrink budget exhausted");
                    completed = false;
                    break 'search;
                }
                remaining -= 1;

                match self.evaluate(property, &candidate) {
                    Verdict::Rejected => trace!("assumption rejected shrink candidate"),
                    Verdict::Holds => {}
                    Verdict::Fails(fault) => {
                        debug!(
                            step = path.len(),
                            candidate = %self.source.describe(&candidate),
                            "found smaller failing value"
                        );
                        path.push(candidate.clone());
                        smallest = candidate;
                        cause = fault;
                        improved = true;
                        break;
                    }
                }
            }

            if !improved {
                debug!(steps = path.len() - 1, "local minimum reached");
                break;
            }
        }

        ShrinkOutcome {
            path,
            cause,
            cycles_used: budget - remaining,
            completed,
        }
    }

    /// Judge one candidate, converting it once
    pub fn evaluate(&self, property: &dyn Fn(&T) -> bool, precursor: &P) -> Verdict {
        let judged = catch_unwind(AssertUnwindSafe(|| {
            if !(self.assumption)(precursor) {
                return Verdict::Rejected;
            }
            let value = (self.to_value)(precursor);
            if self.value_assumption.is_some_and(|assumption| !assumption(&value)) {
                return Verdict::Rejected;
            }
            if property(&value) {
                Verdict::Holds
            } else {
                Verdict::Fails(None)
            }
        }));
        judged.unwrap_or_else(|payload| Verdict::Fails(Some(Fault::from_panic(payload))))
    }

    fn report(&self, examples_tried: usize, outcome: ShrinkOutcome<P>) -> TheoryError {
        let shrink_path: Vec<Reported> = outcome.path.iter().map(|p| self.reported(p)).collect();
        let smallest = self.reported(outcome.smallest());
        let falsification = Falsification {
            seed: self.strategy.seed(),
            examples_tried,
            smallest,
            shrink_path,
            cause: outcome.cause,
        };

        self.strategy.reporter().falsification(&falsification);

        TheoryError::falsified(
            falsification.seed,
            examples_tried,
            falsification.smallest.description(),
            falsification.shrink_steps(),
            falsification.cause,
        )
    }

    // A failure may stem from the conversion itself panicking, in which case
    // the precursor is reported instead.
    fn reported(&self, precursor: &P) -> Reported {
        match catch_unwind(AssertUnwindSafe(|| (self.to_value)(precursor))) {
            Ok(value) => {
                let description = (self.describe)(&value);
                Reported::new(value, description)
            }
            Err(_) => Reported::new(precursor.clone(), self.source.describe(precursor)),
        }
    }
}

/// Run a theory whose property sees the generated values directly
pub fn check_direct<P>(
    strategy: Strategy,
    source: &dyn Source<P>,
    assumption: &dyn Fn(&P) -> bool,
    property: &dyn Fn(&P) -> bool,
) -> TheoryResult
where
    P: Clone + 'static,
{
    let to_value = |p: &P| p.clone();
    let describe = |p: &P| source.describe(p);
    TheoryRunner::new(strategy, source, assumption, &to_value, &describe).check(property)
}
