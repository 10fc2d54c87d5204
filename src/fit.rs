//! Compass search for the slope and intercept of a straight line through a point cloud.
//!
//! Starting from an estimate, the eight neighbours one step away in m-c space
//! are scored by RMS error. The best one becomes the new base while it beats
//! the current base; the search stops as soon as none does.

use rayon::prelude::*;

use crate::error::{CrackError, Result};

/// Unit offsets in (m, c), clockwise from +c.
pub const DIRECTIONS: [(f64, f64); 8] = [
    (0.0, 1.0),
    (1.0, 1.0),
    (1.0, 0.0),
    (1.0, -1.0),
    (0.0, -1.0),
    (-1.0, -1.0),
    (-1.0, 0.0),
    (-1.0, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// `y = m * x + c`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearModel {
    pub m: f64,
    pub c: f64,
}

impl LinearModel {
    pub fn new(m: f64, c: f64) -> Self {
        Self { m, c }
    }

    fn offset(self, (dm, dc): (f64, f64), step: f64) -> Self {
        Self {
            m: self.m + dm * step,
            c: self.c + dc * step,
        }
    }
}

pub fn rms_error(points: &[Point], model: LinearModel) -> f64 {
    let sum: f64 = points
        .iter()
        .map(|p| {
            let e = model.m * p.x + model.c - p.y;
            e * e
        })
        .sum();
    (sum / points.len() as f64).sqrt()
}

/// Parses `x,y` lines. Blank lines are skipped.
pub fn parse_points(text: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = line.split_once(',').and_then(|(x, y)| {
            Some(Point {
                x: x.trim().parse().ok()?,
                y: y.trim().parse().ok()?,
            })
        });
        match parsed {
            Some(point) => points.push(point),
            None => {
                return Err(CrackError::config(format!(
                    "line {}: expected 'x,y', got '{line}'",
                    number + 1
                )))
            }
        }
    }

    if points.is_empty() {
        return Err(CrackError::config("point table is empty"));
    }
    Ok(points)
}

/// The best neighbour of one sampling pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitStep {
    /// Index into [`DIRECTIONS`].
    pub direction: usize,
    pub model: LinearModel,
    pub error: f64,
    /// Whether it beat the base and was accepted.
    pub improved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitState {
    Sampling,
    Improved {
        direction: usize,
        model: LinearModel,
        error: f64,
    },
    Converged,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FitOutcome {
    pub model: LinearModel,
    pub error: f64,
    /// Sampling passes, including the final one that found no improvement.
    pub iterations: usize,
    pub path: Vec<FitStep>,
}

pub struct CompassSearch<'p> {
    points: &'p [Point],
    base: LinearModel,
    base_error: f64,
    step: f64,
    state: FitState,
    iterations: usize,
    path: Vec<FitStep>,
}

impl<'p> CompassSearch<'p> {
    pub fn new(points: &'p [Point], start: LinearModel, step: f64) -> Result<Self> {
        if points.is_empty() {
            return Err(CrackError::config("point table is empty"));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(CrackError::config(format!(
                "step must be a positive number, got {step}"
            )));
        }

        Ok(Self {
            points,
            base: start,
            base_error: rms_error(points, start),
            step,
            state: FitState::Sampling,
            iterations: 0,
            path: Vec::new(),
        })
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    pub fn base(&self) -> (LinearModel, f64) {
        (self.base, self.base_error)
    }

    /// Performs one transition and returns the new state.
    pub fn step(&mut self) -> FitState {
        self.state = match self.state {
            FitState::Sampling => self.sample(),
            FitState::Improved { model, error, .. } => {
                self.base = model;
                self.base_error = error;
                FitState::Sampling
            }
            FitState::Converged => FitState::Converged,
        };
        self.state
    }

    pub fn run(mut self) -> FitOutcome {
        while self.step() != FitState::Converged {}

        FitOutcome {
            model: self.base,
            error: self.base_error,
            iterations: self.iterations,
            path: self.path,
        }
    }

    fn sample(&mut self) -> FitState {
        let points = self.points;
        let base = self.base;
        let step = self.step;

        let scored = (0..DIRECTIONS.len())
            .into_par_iter()
            .map(|direction| {
                let model = base.offset(DIRECTIONS[direction], step);
                (direction, model, rms_error(points, model))
            })
            .collect::<Vec<_>>();

        // Strictly smaller wins, so ties keep the lowest direction.
        let (direction, model, error) = scored
            .into_iter()
            .reduce(|best, next| if next.2 < best.2 { next } else { best })
            .unwrap_or((0, base, f64::INFINITY));

        let improved = error < self.base_error;
        self.iterations += 1;
        self.path.push(FitStep {
            direction,
            model,
            error,
            improved,
        });

        if improved {
            FitState::Improved {
                direction,
                model,
                error,
            }
        } else {
            FitState::Converged
        }
    }
}
