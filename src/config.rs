//! In-process configuration. The reference data ships with the crate; callers
//! override individual fields.

use crate::batch::BatchDriver;
use crate::error::Result;
use crate::fit::{parse_points, CompassSearch, LinearModel, Point};
use crate::keyspace::CandidateFormat;
use crate::oracle::{HashOracle, Sha512Crypt};
use crate::search::SearchOptions;
use crate::target::{TargetRecord, DEFAULT_SALT_LEN};

/// Stored SHA-512-crypt digests of four `AAA00`..`ZZZ99` passwords.
pub const REFERENCE_DIGESTS: [&str; 4] = [
    "$6$KB$UE9sg8u7cP9yh3ORqxHTSSrZ1wvMBSOtd/OxPUvutk5/GZ4qC0AltwXOriV9Cz/NysJj6GI//TVL/9G0U4dpW.",
    "$6$KB$GSJvSzTyFUUl2mPpo4AIDsWy81FCcazkxDasWfFoAuOSRsgT2d8/VKBex9k1BZgEoDwM.FdErrjoSnAssBIoj0",
    "$6$KB$MCp2sCzujTTZybX1rkcaW5Fz5cfOhu0GfSLk/hbwWtzU835ddUagNQ0Jmq9BYpusCP.N34KBfdMm13n8MnHBw/",
    "$6$KB$pgXJO0tr54wjce0bcMvQMHEllvi0vbMlyYI7liEdaZTE6Mwg/Eglk0PJxhQEDJ0bbOkg0J1/XSRliAmA6gTUT0",
];

/// `x,y` per line, 1000 rows.
pub const REFERENCE_POINTS: &str = include_str!("../data/points.csv");

#[derive(Clone, Debug)]
pub struct CrackConfig {
    pub format: CandidateFormat,
    /// Stored digest strings, searched in order.
    pub targets: Vec<String>,
    /// Length of the salt prefix inside each stored digest.
    pub salt_len: usize,
    pub options: SearchOptions,
}

impl CrackConfig {
    /// The `[A-Z]x3 + [00-99]` keyspace against [`REFERENCE_DIGESTS`].
    pub fn reference() -> Result<Self> {
        Ok(Self {
            format: CandidateFormat::az99()?,
            targets: REFERENCE_DIGESTS.iter().map(|s| s.to_string()).collect(),
            salt_len: DEFAULT_SALT_LEN,
            options: SearchOptions::default(),
        })
    }

    /// Parses every target up front so a bad entry fails before any hashing.
    pub fn target_records(&self) -> Result<Vec<TargetRecord>> {
        self.targets
            .iter()
            .map(|stored| TargetRecord::parse(stored.as_str(), self.salt_len))
            .collect()
    }

    pub fn driver(&self) -> BatchDriver<Sha512Crypt> {
        self.driver_with(Sha512Crypt)
    }

    pub fn driver_with<O: HashOracle>(&self, oracle: O) -> BatchDriver<O> {
        BatchDriver::new(self.format.clone(), oracle, self.options)
    }
}

#[derive(Clone, Debug)]
pub struct FitConfig {
    pub start: LinearModel,
    pub step: f64,
    pub points: Vec<Point>,
}

impl FitConfig {
    /// Start at m = 1.3, c = 10 with a 0.01 step over [`REFERENCE_POINTS`].
    pub fn reference() -> Result<Self> {
        Ok(Self {
            start: LinearModel::new(1.3, 10.0),
            step: 0.01,
            points: parse_points(REFERENCE_POINTS)?,
        })
    }

    pub fn search(&self) -> Result<CompassSearch<'_>> {
        CompassSearch::new(&self.points, self.start, self.step)
    }
}
