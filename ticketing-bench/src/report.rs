use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use ticketing_core::RegistryResult;
use ticketing_store::app_config::WorkloadKind;

/// Outcome counts for one worker or a whole round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    /// Failures keyed by `RegistryError::kind`
    pub failures: BTreeMap<&'static str, usize>,
}

impl Tally {
    pub fn record<T>(&mut self, result: &RegistryResult<T>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(e) => *self.failures.entry(e.kind()).or_insert(0) += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn merge(&mut self, other: Tally) {
        self.succeeded += other.succeeded;
        for (kind, count) in other.failures {
            *self.failures.entry(kind).or_insert(0) += count;
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub kind: WorkloadKind,
    pub succeeded: usize,
    pub failures: BTreeMap<&'static str, usize>,
    pub elapsed: Duration,
}

impl RoundReport {
    pub fn new(kind: WorkloadKind, tally: Tally, elapsed: Duration) -> Self {
        Self {
            kind,
            succeeded: tally.succeeded,
            failures: tally.failures,
            elapsed,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn submitted(&self) -> usize {
        self.succeeded + self.failed()
    }

    /// Successful transactions per second
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            0.0
        } else {
            self.succeeded as f64 / seconds
        }
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} submitted, {} ok, {} failed",
            self.kind,
            self.submitted(),
            self.succeeded,
            self.failed()
        )?;
        if !self.failures.is_empty() {
            let detail: Vec<String> = self
                .failures
                .iter()
                .map(|(kind, count)| format!("{}={}", kind, count))
                .collect();
            write!(f, " ({})", detail.join(", "))?;
        }
        write!(f, " in {:.1} ms, {:.1} tps", self.elapsed.as_secs_f64() * 1000.0, self.throughput())
    }
}
