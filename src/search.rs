//! Exhaustive search of one target.

use tracing::{debug, info};

use crate::error::Result;
use crate::keyspace::{CandidateFormat, Keyspace};
use crate::oracle::HashOracle;
use crate::progress::{ProgressSink, Step};
use crate::target::TargetRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Keep every (candidate, digest, matched) step in the outcome.
    pub trace: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstMatch {
    pub candidate: String,
    /// 1-based position of the candidate in enumeration order.
    pub index: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep {
    pub candidate: String,
    pub digest: String,
    pub matched: bool,
}

/// Result of walking a whole keyspace for one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Candidates hashed and compared.
    pub examined: u64,
    pub keyspace_len: u64,
    /// Set at most once, by the earliest matching candidate.
    pub first_match: Option<FirstMatch>,
    /// Empty unless tracing was requested.
    pub trace: Vec<TraceStep>,
}

impl SearchOutcome {
    pub(crate) fn empty(keyspace_len: u64) -> Self {
        Self {
            examined: 0,
            keyspace_len,
            first_match: None,
            trace: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.first_match.is_some()
    }
}

/// Drives the odometer for one target, hashing and comparing every candidate.
///
/// A match never stops the walk: the outcome always reports the full
/// keyspace as examined.
pub struct SearchController<'a, O: ?Sized> {
    format: &'a CandidateFormat,
    oracle: &'a O,
    options: SearchOptions,
}

impl<'a, O: HashOracle + ?Sized> SearchController<'a, O> {
    pub fn new(format: &'a CandidateFormat, oracle: &'a O, options: SearchOptions) -> Self {
        Self {
            format,
            oracle,
            options,
        }
    }

    pub fn format(&self) -> &'a CandidateFormat {
        self.format
    }

    pub fn run<S>(&self, target: &TargetRecord, sink: &mut S) -> Result<SearchOutcome>
    where
        S: ProgressSink + ?Sized,
    {
        let mut keyspace = self.format.keyspace();
        self.search(target, &mut keyspace, sink)
    }

    /// Searches with a caller-owned odometer, which is rewound first.
    ///
    /// An oracle or sink error aborts the walk and no outcome is returned.
    pub fn search<S>(
        &self,
        target: &TargetRecord,
        keyspace: &mut Keyspace<'_>,
        sink: &mut S,
    ) -> Result<SearchOutcome>
    where
        S: ProgressSink + ?Sized,
    {
        keyspace.reset();
        let salt = target.salt();
        let mut outcome = SearchOutcome::empty(keyspace.format().len());

        debug!(salt, keyspace = outcome.keyspace_len, "search started");

        while let Some(candidate) = keyspace.advance() {
            let digest = self.oracle.hash(candidate, salt)?;
            outcome.examined += 1;

            let matched = digest == target.expected();
            if matched && outcome.first_match.is_none() {
                info!(salt, candidate, index = outcome.examined, "match found");
                outcome.first_match = Some(FirstMatch {
                    candidate: candidate.to_owned(),
                    index: outcome.examined,
                });
            }

            sink.observe(&Step {
                index: outcome.examined,
                candidate,
                digest: &digest,
                matched,
            })?;

            if self.options.trace {
                outcome.trace.push(TraceStep {
                    candidate: candidate.to_owned(),
                    digest,
                    matched,
                });
            }
        }

        sink.target_done(&outcome)?;
        debug!(
            salt,
            examined = outcome.examined,
            matched = outcome.is_match(),
            "search finished"
        );

        Ok(outcome)
    }
}
