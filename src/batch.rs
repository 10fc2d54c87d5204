use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::keyspace::CandidateFormat;
use crate::oracle::HashOracle;
use crate::progress::ProgressSink;
use crate::search::{SearchController, SearchOptions, SearchOutcome};
use crate::target::TargetRecord;
use crate::timing::Stopwatch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// One outcome per target, in target order.
    pub outcomes: Vec<SearchOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn examined(&self) -> u64 {
        self.outcomes.iter().map(|o| o.examined).sum()
    }

    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            self.examined() as f64
        } else {
            self.examined() as f64 / secs
        }
    }
}

/// Runs every target to completion, one after another, under one stopwatch.
///
/// The first oracle, sink or I/O failure aborts the whole batch; targets after
/// it are not searched and no report is produced.
pub struct BatchDriver<O> {
    format: CandidateFormat,
    oracle: O,
    options: SearchOptions,
}

impl<O: HashOracle> BatchDriver<O> {
    pub fn new(format: CandidateFormat, oracle: O, options: SearchOptions) -> Self {
        Self {
            format,
            oracle,
            options,
        }
    }

    pub fn format(&self) -> &CandidateFormat {
        &self.format
    }

    pub fn run<S>(&self, targets: &[TargetRecord], sink: &mut S) -> Result<BatchReport>
    where
        S: ProgressSink + ?Sized,
    {
        info!(
            targets = targets.len(),
            format = %self.format,
            keyspace = self.format.len(),
            "batch started"
        );

        let controller = SearchController::new(&self.format, &self.oracle, self.options);
        let mut keyspace = self.format.keyspace();
        let watch = Stopwatch::start();

        let outcomes = targets
            .iter()
            .map(|target| controller.search(target, &mut keyspace, &mut *sink))
            .collect::<Result<Vec<_>>>()?;

        let report = BatchReport {
            outcomes,
            elapsed: watch.stop(),
        };

        info!(
            targets = targets.len(),
            matched = report.outcomes.iter().filter(|o| o.is_match()).count(),
            examined = report.examined(),
            elapsed_ns = report.elapsed.as_nanos() as u64,
            "batch finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::BatchDriver;
    use crate::error::{CrackError, Result};
    use crate::keyspace::CandidateFormat;
    use crate::progress::{LineSink, NullSink};
    use crate::search::SearchOptions;
    use crate::target::TargetRecord;

    fn concat(plain: &str, salt: &str) -> Result<String> {
        Ok(format!("{salt}{plain}"))
    }

    fn targets(stored: &[&str]) -> Vec<TargetRecord> {
        stored
            .iter()
            .map(|s| TargetRecord::parse(*s, 3).unwrap())
            .collect()
    }

    #[test]
    fn every_target_walks_the_full_keyspace() {
        let format = CandidateFormat::parse_mask("?u?d").unwrap();
        let driver = BatchDriver::new(format, concat, SearchOptions::default());

        let report = driver
            .run(&targets(&["$a$Q7", "$b$zz", "$c$A0"]), &mut NullSink)
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes.iter().all(|o| o.examined == 260));
        assert_eq!(report.examined(), 780);

        let matches = report
            .outcomes
            .iter()
            .map(|o| o.first_match.as_ref().map(|m| (m.candidate.as_str(), m.index)))
            .collect::<Vec<_>>();
        assert_eq!(matches, [Some(("Q7", 16 * 10 + 8)), None, Some(("A0", 1))]);
    }

    #[test]
    fn output_follows_target_then_candidate_order() {
        let format = CandidateFormat::parse_mask("?d").unwrap();
        let driver = BatchDriver::new(format, concat, SearchOptions::default());
        let mut sink = LineSink::new(Vec::new());

        driver.run(&targets(&["$a$1", "$b$x"]), &mut sink).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 22);
        assert_eq!(lines[0], " 1       0 $a$0");
        assert_eq!(lines[1], "#2       1 $a$1");
        assert_eq!(lines[10], "10 solutions explored");
        assert_eq!(lines[11], " 1       0 $b$0");
        assert_eq!(lines[21], "10 solutions explored");
    }

    #[test]
    fn oracle_failure_aborts_the_batch() {
        let format = CandidateFormat::parse_mask("?d").unwrap();
        let seen = RefCell::new(Vec::new());
        let oracle = |plain: &str, salt: &str| -> Result<String> {
            seen.borrow_mut().push(salt.to_owned());
            if salt == "$b$" {
                return Err(CrackError::Oracle {
                    salt: salt.to_owned(),
                    reason: "malformed".to_owned(),
                });
            }
            Ok(format!("{salt}{plain}"))
        };
        let driver = BatchDriver::new(format, oracle, SearchOptions::default());

        let result = driver.run(&targets(&["$a$1", "$b$2", "$c$3"]), &mut NullSink);

        assert!(matches!(result, Err(CrackError::Oracle { .. })));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 11);
        assert!(!seen.iter().any(|s| s == "$c$"));
    }

    #[test]
    fn throughput_is_finite() {
        let format = CandidateFormat::parse_mask("?l?l").unwrap();
        let driver = BatchDriver::new(format, concat, SearchOptions::default());

        let report = driver.run(&targets(&["$a$zz"]), &mut NullSink).unwrap();

        assert!(report.candidates_per_second().is_finite());
        assert!(report.candidates_per_second() > 0.0);
    }
}
