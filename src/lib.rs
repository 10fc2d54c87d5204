//! Exhaustive search of a fixed-shape keyspace against salted one-way digests.
//!
//! A [`CandidateFormat`] lists one [`CharacterClass`] per position and is walked
//! in odometer order. For every stored digest the [`SearchController`] hashes
//! each candidate with the digest's salt and compares the result with the
//! stored string, always walking the whole keyspace. The [`BatchDriver`] runs
//! the targets one after another under a monotonic stopwatch.
//!
//! The [`fit`] module holds the unrelated compass-search line fit that ships
//! alongside the cracker.

pub mod batch;
pub mod config;
pub mod error;
pub mod fit;
pub mod keyspace;
pub mod oracle;
pub mod progress;
pub mod search;
pub mod target;
pub mod timing;

pub use batch::{BatchDriver, BatchReport};
pub use config::{CrackConfig, FitConfig};
pub use error::{CrackError, Result};
pub use keyspace::{CandidateFormat, Candidates, CharacterClass, Keyspace};
pub use oracle::{HashOracle, Sha512Crypt};
pub use progress::{LineSink, NullSink, ProgressSink, Step};
pub use search::{FirstMatch, SearchController, SearchOptions, SearchOutcome, TraceStep};
pub use target::{TargetRecord, DEFAULT_SALT_LEN};
pub use timing::{time_difference, MonotonicStamp, Stopwatch};
