//! Falsification reports and the reporters that receive them.
//!
//! The runner calls a [`Reporter`] exactly once per falsified run and never on
//! success. Values are handed over type-erased so a single reporter can serve
//! theories over any type; [`Reported::downcast_ref`] recovers them.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Fault;

/// A falsifying value together with its description
#[derive(Clone)]
pub struct Reported {
    value: Rc<dyn Any>,
    description: String,
}

impl Reported {
    pub fn new<T: 'static>(value: T, description: impl Into<String>) -> Self {
        Self {
            value: Rc::new(value),
            description: description.into(),
        }
    }

    /// The value, if it has type `T`
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Everything known about a falsified theory once shrinking has finished
#[derive(Debug, Clone)]
pub struct Falsification {
    /// Seed that reproduces the run
    pub seed: u64,
    /// Examples sampled up to and including the first failure
    pub examples_tried: usize,
    /// The smallest failing value found
    pub smallest: Reported,
    /// Every failing value visited, starting with the original failure and
    /// ending with `smallest`
    pub shrink_path: Vec<Reported>,
    /// The fault raised by `smallest`, if it panicked instead of returning false
    pub cause: Option<Fault>,
}

impl Falsification {
    /// Number of accepted shrinks
    pub fn shrink_steps(&self) -> usize {
        self.shrink_path.len().saturating_sub(1)
    }

    /// Multi-line, human readable description of the failure
    pub fn summary(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Property falsified after {} example(s)\n",
            self.examples_tried
        ));
        output.push_str(&format!(
            "Smallest found falsifying value: {}\n",
            self.smallest.description()
        ));
        if let Some(cause) = &self.cause {
            output.push_str(&format!("Cause: {}\n", cause));
        }
        output.push_str(&format!(
            "Shrink steps: {} (from {})\n",
            self.shrink_steps(),
            self.shrink_path
                .first()
                .map(Reported::description)
                .unwrap_or_else(|| self.smallest.description())
        ));
        output.push_str(&format!(
            "Seed: {} (use this to reproduce the failure)",
            self.seed
        ));

        output
    }
}

/// Receives falsifications
pub trait Reporter {
    fn falsification(&self, falsification: &Falsification);
}

impl<R: Reporter + ?Sized> Reporter for Rc<R> {
    fn falsification(&self, falsification: &Falsification) {
        (**self).falsification(falsification)
    }
}

/// Prints falsifications to stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Also list every value on the shrink path
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn format(&self, falsification: &Falsification) -> String {
        let mut output = falsification.summary();
        if self.verbose && !falsification.shrink_path.is_empty() {
            output.push_str("\nShrink path:");
            for (step, value) in falsification.shrink_path.iter().enumerate() {
                output.push_str(&format!("\n  {}: {}", step, value.description()));
            }
        }
        output
    }
}

impl Reporter for ConsoleReporter {
    fn falsification(&self, falsification: &Falsification) {
        eprintln!("{}", self.format(falsification));
    }
}

/// Keeps every falsification in memory for later inspection
#[derive(Debug, Default)]
pub struct RecordingReporter {
    calls: RefCell<Vec<Falsification>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Falsification> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last(&self) -> Option<Falsification> {
        self.calls.borrow().last().cloned()
    }

    /// Smallest value of the most recent falsification
    pub fn smallest<T: Clone + 'static>(&self) -> Option<T> {
        self.calls
            .borrow()
            .last()
            .and_then(|call| call.smallest.downcast_ref::<T>().cloned())
    }

    /// Shrink path of the most recent falsification
    pub fn shrink_path<T: Clone + 'static>(&self) -> Vec<T> {
        self.calls
            .borrow()
            .last()
            .map(|call| {
                call.shrink_path
                    .iter()
                    .filter_map(|value| value.downcast_ref::<T>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cause of the most recent falsification
    pub fn cause(&self) -> Option<Fault> {
        self.calls.borrow().last().and_then(|call| call.cause.clone())
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Reporter for RecordingReporter {
    fn falsification(&self, falsification: &Falsification) {
        self.calls.borrow_mut().push(falsification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Falsification {
        Falsification {
            seed: 99,
            examples_tried: 4,
            smallest: Reported::new(3i32, "3"),
            shrink_path: vec![
                Reported::new(40i32, "40"),
                Reported::new(7i32, "7"),
                Reported::new(3i32, "3"),
            ],
            cause: Some(Fault::new("assertion failed")),
        }
    }

    #[test]
    fn test_reported_downcast() {
        let reported = Reported::new(vec![1u8, 2], "[1, 2]");
        assert_eq!(reported.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2]));
        assert!(reported.downcast_ref::<String>().is_none());
        assert_eq!(format!("{:?}", reported), "[1, 2]");
    }

    #[test]
    fn test_summary_mentions_everything() {
        let summary = sample().summary();
        assert!(summary.contains("after 4 example(s)"));
        assert!(summary.contains("Smallest found falsifying value: 3"));
        assert!(summary.contains("Cause: assertion failed"));
        assert!(summary.contains("Shrink steps: 2 (from 40)"));
        assert!(summary.contains("Seed: 99"));
    }

    #[test]
    fn test_console_reporter_verbose_lists_path() {
        let plain = ConsoleReporter::new().format(&sample());
        assert!(!plain.contains("Shrink path:"));

        let verbose = ConsoleReporter::new().verbose().format(&sample());
        assert!(verbose.contains("Shrink path:\n  0: 40\n  1: 7\n  2: 3"));
    }

    #[test]
    fn test_recording_reporter() {
        let reporter = RecordingReporter::new();
        assert_eq!(reporter.call_count(), 0);
        assert_eq!(reporter.smallest::<i32>(), None);
        assert!(reporter.shrink_path::<i32>().is_empty());

        reporter.falsification(&sample());
        assert_eq!(reporter.call_count(), 1);
        assert_eq!(reporter.smallest::<i32>(), Some(3));
        assert_eq!(reporter.shrink_path::<i32>(), vec![40, 7, 3]);
        assert_eq!(reporter.cause(), Some(Fault::new("assertion failed")));
        assert_eq!(reporter.last().map(|call| call.shrink_steps()), Some(2));

        reporter.clear();
        assert_eq!(reporter.call_count(), 0);
    }

    #[test]
    fn test_shared_reporter_records_through_rc() {
        let reporter = Rc::new(RecordingReporter::new());
        let shared: Rc<dyn Reporter> = reporter.clone();
        shared.falsification(&sample());
        assert_eq!(reporter.call_count(), 1);
    }
}
