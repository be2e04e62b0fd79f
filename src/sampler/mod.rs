// This file is part of the open-source port of SeetaFace engine, which originally includes three modules:
//      SeetaFace Detection, SeetaFace Alignment, and SeetaFace Identification.
//
// This file is part of the SeetaFace Detection module, containing codes implementing the face detection method described in the following paper:
//
//      Funnel-structured cascade for multi-view face detection with alignment awareness,
//      Shuzhe Wu, Meina Kan, Zhenliang He, Shiguang Shan, Xilin Chen.
//      In Neurocomputing (under review)
//
// Copyright (C) 2016, Visual Information Processing and Learning (VIPL) group,
// Institute of Computing Technology, Chinese Academy of Sciences, Beijing, China.
//
// As an open-source face recognition engine: you can redistribute SeetaFace source codes
// and/or modify it under the terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

//! Candidate rectangles for a feature shape.
//!
//! | Policy | Sequence |
//! |--------|----------|
//! | [`SamplingPolicy::Exhaustive`] | every legal rectangle, width, height, y, x ascending |
//! | [`SamplingPolicy::BoundedByCount`] | `n` uniform draws, duplicates allowed |
//! | [`SamplingPolicy::BoundedByTime`] | uniform draws until the time budget is spent |
//!
//! The random policies share one generator per sampler, so a fixed seed
//! reproduces the same candidates round after round.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::common::Rectangle;
use crate::config::MAX_IMAGE_SIDE;
use crate::error::{Error, Result};
use crate::feat::HaarFeature;

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u64 = 1;

/// Which configurations are evaluated for every feature type in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingPolicy {
    Exhaustive,
    /// This many random configurations per feature type per round.
    BoundedByCount(usize),
    /// Random configurations until this much time has passed, per feature
    /// type per round.
    BoundedByTime(Duration),
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy::Exhaustive
    }
}

impl SamplingPolicy {
    /// Parses a `num <count>` or `time <seconds>` pair.
    pub fn from_option(kind: &str, value: &str) -> Result<Self> {
        match kind.trim() {
            "num" => value
                .trim()
                .parse::<usize>()
                .map(SamplingPolicy::BoundedByCount)
                .map_err(|e| {
                    Error::InvalidConfiguration(format!("illegal sample count '{}': {}", value, e))
                }),
            "time" => {
                let seconds = value.trim().parse::<f64>().map_err(|e| {
                    Error::InvalidConfiguration(format!("illegal sample time '{}': {}", value, e))
                })?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "illegal sample time '{}': must be a non-negative number of seconds",
                        value
                    )));
                }
                Duration::try_from_secs_f64(seconds)
                    .map(SamplingPolicy::BoundedByTime)
                    .map_err(|e| {
                        Error::InvalidConfiguration(format!("illegal sample time '{}': {}", value, e))
                    })
            }
            other => Err(Error::InvalidConfiguration(format!(
                "unknown sampling option '{}', expected 'num' or 'time'",
                other
            ))),
        }
    }
}

/// Legal (offset, extent) pairs along one axis: extents are positive
/// multiples of `step` no larger than `size`.
#[derive(Debug, Clone, Copy)]
struct AxisSpace {
    size: u32,
    step: u32,
}

impl AxisSpace {
    fn new(size: u32, step: u16) -> Self {
        AxisSpace {
            size,
            step: u32::from(step.max(1)),
        }
    }

    fn count(&self) -> u64 {
        let size = u64::from(self.size);
        let step = u64::from(self.step);
        let n = size / step;
        // sum over k = 1..=n of (size - k * step + 1)
        n * (size + 1) - step * n * (n + 1) / 2
    }

    /// Maps an index in `0..count()` to its (offset, extent) pair.
    fn decode(&self, mut index: u64) -> (u32, u32) {
        let mut extent = self.step;
        loop {
            let positions = u64::from(self.size - extent + 1);
            if index < positions {
                return (index as u32, extent);
            }
            index -= positions;
            extent += self.step;
        }
    }
}

/// Number of legal rectangles for `feature` inside a `width` x `height` image.
pub fn count_legal_configurations(feature: &dyn HaarFeature, width: u32, height: u32) -> u64 {
    let (cols, rows) = feature.grid();
    AxisSpace::new(width, cols).count() * AxisSpace::new(height, rows).count()
}

/// Every legal rectangle, ordered by width, height, y and x.
#[derive(Debug, Clone)]
pub struct ExhaustiveConfigurations {
    x_axis: AxisSpace,
    y_axis: AxisSpace,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

impl ExhaustiveConfigurations {
    fn new(x_axis: AxisSpace, y_axis: AxisSpace) -> Self {
        ExhaustiveConfigurations {
            x_axis,
            y_axis,
            width: x_axis.step,
            height: y_axis.step,
            x: 0,
            y: 0,
        }
    }
}

impl Iterator for ExhaustiveConfigurations {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.width > self.x_axis.size || self.height > self.y_axis.size {
            return None;
        }

        let rect = Rectangle::new(
            self.x as i16,
            self.y as i16,
            self.width as i16,
            self.height as i16,
        );

        self.x += 1;
        if self.x + self.width > self.x_axis.size {
            self.x = 0;
            self.y += 1;
            if self.y + self.height > self.y_axis.size {
                self.y = 0;
                self.height += self.y_axis.step;
                if self.height > self.y_axis.size {
                    self.height = self.y_axis.step;
                    self.width += self.x_axis.step;
                }
            }
        }

        Some(rect)
    }
}

#[derive(Debug, Clone, Copy)]
enum Budget {
    Remaining(usize),
    Until { start: Instant, limit: Duration },
}

/// Uniform random draws over the legal rectangles, bounded by a count or a
/// time budget.
#[derive(Debug)]
pub struct RandomConfigurations<'a> {
    x_axis: AxisSpace,
    y_axis: AxisSpace,
    x_count: u64,
    y_count: u64,
    budget: Budget,
    rng: &'a mut Xoshiro256PlusPlus,
}

impl<'a> RandomConfigurations<'a> {
    fn new(
        x_axis: AxisSpace,
        y_axis: AxisSpace,
        budget: Budget,
        rng: &'a mut Xoshiro256PlusPlus,
    ) -> Self {
        RandomConfigurations {
            x_axis,
            y_axis,
            x_count: x_axis.count(),
            y_count: y_axis.count(),
            budget,
            rng,
        }
    }
}

impl<'a> Iterator for RandomConfigurations<'a> {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.x_count == 0 || self.y_count == 0 {
            return None;
        }

        match self.budget {
            Budget::Remaining(0) => return None,
            Budget::Remaining(ref mut n) => *n -= 1,
            // polled once per candidate, so the budget is overrun by at most
            // one evaluation
            Budget::Until { start, limit } => {
                if start.elapsed() >= limit {
                    return None;
                }
            }
        }

        let (x, width) = self.x_axis.decode(self.rng.gen_range(0..self.x_count));
        let (y, height) = self.y_axis.decode(self.rng.gen_range(0..self.y_count));
        Some(Rectangle::new(x as i16, y as i16, width as i16, height as i16))
    }
}

/// Candidate sequence for one feature type.
#[derive(Debug)]
pub enum Candidates<'a> {
    Exhaustive(ExhaustiveConfigurations),
    Random(RandomConfigurations<'a>),
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Rectangle;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Candidates::Exhaustive(configs) => configs.next(),
            Candidates::Random(configs) => configs.next(),
        }
    }
}

/// Produces candidate rectangles under a fixed policy for a fixed
/// integral image size.
#[derive(Debug, Clone)]
pub struct ConfigurationSampler {
    policy: SamplingPolicy,
    width: u32,
    height: u32,
    rng: Xoshiro256PlusPlus,
}

impl ConfigurationSampler {
    /// Fails with `InvalidConfiguration` unless both sides are in
    /// `1..=MAX_IMAGE_SIDE`, the range every rectangle field can hold.
    pub fn new(policy: SamplingPolicy, seed: Option<u64>, width: u32, height: u32) -> Result<Self> {
        for &(name, side) in &[("width", width), ("height", height)] {
            if side == 0 || side > MAX_IMAGE_SIDE {
                return Err(Error::InvalidConfiguration(format!(
                    "illegal integral image {} {}: must be in 1..={}",
                    name, side, MAX_IMAGE_SIDE
                )));
            }
        }

        Ok(ConfigurationSampler {
            policy,
            width,
            height,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or(DEFAULT_SEED)),
        })
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Starts the candidate sequence for `feature`.
    ///
    /// For [`SamplingPolicy::BoundedByTime`] the clock starts here.
    pub fn candidates(&mut self, feature: &dyn HaarFeature) -> Candidates<'_> {
        let (cols, rows) = feature.grid();
        let x_axis = AxisSpace::new(self.width, cols);
        let y_axis = AxisSpace::new(self.height, rows);

        match self.policy {
            SamplingPolicy::Exhaustive => {
                Candidates::Exhaustive(ExhaustiveConfigurations::new(x_axis, y_axis))
            }
            SamplingPolicy::BoundedByCount(n) => Candidates::Random(RandomConfigurations::new(
                x_axis,
                y_axis,
                Budget::Remaining(n),
                &mut self.rng,
            )),
            SamplingPolicy::BoundedByTime(limit) => Candidates::Random(RandomConfigurations::new(
                x_axis,
                y_axis,
                Budget::Until {
                    start: Instant::now(),
                    limit,
                },
                &mut self.rng,
            )),
        }
    }

    /// Upper bound of candidates a round evaluates for `feature`; `None` for
    /// time budgets.
    pub fn planned_count(&self, feature: &dyn HaarFeature) -> Option<u64> {
        let legal = count_legal_configurations(feature, self.width, self.height);
        match self.policy {
            SamplingPolicy::Exhaustive => Some(legal),
            SamplingPolicy::BoundedByCount(_) if legal == 0 => Some(0),
            SamplingPolicy::BoundedByCount(n) => Some(n as u64),
            SamplingPolicy::BoundedByTime(_) => None,
        }
    }
}
