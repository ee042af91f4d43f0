//! Saving falsifications to disk so they can be replayed.
//!
//! Each failure is written as JSON to `<root>/<theory>/failure_seed_<seed>.json`.
//! Replaying a stored failure is a matter of feeding its seed back through
//! [`Theories::with_fixed_seed`](crate::theory::Theories::with_fixed_seed).

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::reporter::{Falsification, Reported, Reporter};

/// A falsification in described form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Name the failure is stored under
    pub theory: String,
    /// Seed that reproduces the failure
    pub seed: u64,
    pub examples_tried: usize,
    /// Description of the smallest failing value
    pub smallest: String,
    /// Descriptions of every value on the shrink path
    pub shrink_path: Vec<String>,
    /// Message of the panic behind the failure, if any
    pub cause: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl FailureRecord {
    pub fn from_falsification(theory: impl Into<String>, falsification: &Falsification) -> Self {
        Self {
            theory: theory.into(),
            seed: falsification.seed,
            examples_tried: falsification.examples_tried,
            smallest: falsification.smallest.description().to_string(),
            shrink_path: falsification
                .shrink_path
                .iter()
                .map(Reported::description)
                .map(str::to_string)
                .collect(),
            cause: falsification
                .cause
                .as_ref()
                .map(|fault| fault.message().to_string()),
            recorded_at: Utc::now(),
        }
    }

    /// Number of accepted shrinks
    pub fn shrink_steps(&self) -> usize {
        self.shrink_path.len().saturating_sub(1)
    }
}

/// Directory of stored failures, one subdirectory per theory
#[derive(Debug, Clone)]
pub struct FailureStore {
    root_dir: PathBuf,
}

impl FailureStore {
    /// Open a store rooted at `path`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let root_dir = path.as_ref().to_path_buf();
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Write a record, replacing any earlier one with the same seed
    pub fn save(&self, record: &FailureRecord) -> io::Result<PathBuf> {
        let theory_dir = self.root_dir.join(&record.theory);
        fs::create_dir_all(&theory_dir)?;

        let path = theory_dir.join(format!("failure_seed_{}.json", record.seed));
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = File::create(&path)?;
        file.write_all(json.as_bytes())?;

        debug!(theory = %record.theory, seed = record.seed, path = %path.display(), "saved failure");
        Ok(path)
    }

    /// All readable records for `theory`, oldest first
    pub fn load(&self, theory: &str) -> io::Result<Vec<FailureRecord>> {
        let theory_dir = self.root_dir.join(theory);
        if !theory_dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&theory_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let mut contents = String::new();
            File::open(&path)?.read_to_string(&mut contents)?;
            match serde_json::from_str::<FailureRecord>(&contents) {
                Ok(record) => records.push(record),
                Err(error) => warn!(path = %path.display(), %error, "skipping unreadable failure record"),
            }
        }

        records.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.seed.cmp(&b.seed)));
        Ok(records)
    }

    /// Seed of the most recently recorded failure of `theory`
    pub fn latest_seed(&self, theory: &str) -> io::Result<Option<u64>> {
        Ok(self.load(theory)?.last().map(|record| record.seed))
    }

    /// Remove every stored failure of `theory`
    pub fn clear(&self, theory: &str) -> io::Result<()> {
        let theory_dir = self.root_dir.join(theory);
        if theory_dir.exists() {
            fs::remove_dir_all(theory_dir)?;
        }
        Ok(())
    }

    /// Names of the theories with stored failures
    pub fn theories(&self) -> io::Result<Vec<String>> {
        let mut theories = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.is_dir()
                && let Some(name) = path.file_name().and_then(|s| s.to_str())
            {
                theories.push(name.to_string());
            }
        }
        theories.sort();
        Ok(theories)
    }
}

/// Stores every falsification, then forwards it to another reporter
pub struct PersistingReporter {
    store: FailureStore,
    theory: String,
    inner: Rc<dyn Reporter>,
}

impl PersistingReporter {
    pub fn new(store: FailureStore, theory: impl Into<String>, inner: Rc<dyn Reporter>) -> Self {
        Self {
            store,
            theory: theory.into(),
            inner,
        }
    }

    pub fn store(&self) -> &FailureStore {
        &self.store
    }
}

impl Reporter for PersistingReporter {
    fn falsification(&self, falsification: &Falsification) {
        let record = FailureRecord::from_falsification(self.theory.clone(), falsification);
        if let Err(error) = self.store.save(&record) {
            warn!(theory = %self.theory, %error, "could not persist failure");
        }
        self.inner.falsification(falsification);
    }
}
