//! Observation hooks for per-candidate progress. Nothing here is read back by the search.

use std::io::{self, Write};

use crate::search::SearchOutcome;

/// One hashed candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step<'a> {
    /// 1-based position in enumeration order.
    pub index: u64,
    pub candidate: &'a str,
    pub digest: &'a str,
    pub matched: bool,
}

pub trait ProgressSink {
    fn observe(&mut self, step: &Step<'_>) -> io::Result<()>;

    /// Called once a target's keyspace has been fully walked.
    fn target_done(&mut self, _outcome: &SearchOutcome) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn observe(&mut self, step: &Step<'_>) -> io::Result<()> {
        (**self).observe(step)
    }

    fn target_done(&mut self, outcome: &SearchOutcome) -> io::Result<()> {
        (**self).target_done(outcome)
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn observe(&mut self, _step: &Step<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one line per candidate, `#` marking the matching line, and a
/// candidate count after each target.
pub struct LineSink<W: Write> {
    out: W,
    /// Skip per-candidate lines and only write the per-target count.
    quiet: bool,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, quiet: false }
    }

    pub fn quiet(out: W) -> Self {
        Self { out, quiet: true }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for LineSink<W> {
    fn observe(&mut self, step: &Step<'_>) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let marker = if step.matched { '#' } else { ' ' };
        writeln!(
            self.out,
            "{marker}{:<8}{} {}",
            step.index, step.candidate, step.digest
        )
    }

    fn target_done(&mut self, outcome: &SearchOutcome) -> io::Result<()> {
        writeln!(self.out, "{} solutions explored", outcome.examined)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod test {
    use super::{LineSink, ProgressSink, Step};
    use crate::search::SearchOutcome;

    #[test]
    fn line_format() {
        let mut sink = LineSink::new(Vec::new());

        sink.observe(&Step {
            index: 7,
            candidate: "AAA06",
            digest: "$6$KB$abc",
            matched: false,
        })
        .unwrap();
        sink.observe(&Step {
            index: 12345678,
            candidate: "KEV42",
            digest: "$6$KB$def",
            matched: true,
        })
        .unwrap();
        sink.target_done(&SearchOutcome::empty(12345678)).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            " 7       AAA06 $6$KB$abc\n#12345678KEV42 $6$KB$def\n0 solutions explored\n"
        );
    }

    #[test]
    fn quiet_keeps_summary() {
        let mut sink = LineSink::quiet(Vec::new());

        sink.observe(&Step {
            index: 1,
            candidate: "A",
            digest: "d",
            matched: true,
        })
        .unwrap();
        let mut outcome = SearchOutcome::empty(1);
        outcome.examined = 1;
        sink.target_done(&outcome).unwrap();

        assert_eq!(sink.into_inner(), b"1 solutions explored\n");
    }
}
