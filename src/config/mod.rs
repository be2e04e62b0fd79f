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

use crate::error::{Error, Result};
use crate::feat::{FeatureRegistry, HaarFeatureKind};
use crate::sampler::SamplingPolicy;

/// Largest integral image side; rectangles are stored as 16-bit values.
pub const MAX_IMAGE_SIDE: u32 = i16::MAX as u32;

/// Run configuration of the learner, fixed for the whole training run.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerConfig {
    feature_types: Vec<String>,
    sampling_policy: SamplingPolicy,
    seed: Option<u64>,
    image_width: u32,
    image_height: u32,
}

impl LearnerConfig {
    /// Every built-in feature type, exhaustive search, default seed.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        LearnerConfig {
            feature_types: HaarFeatureKind::ALL
                .iter()
                .map(|kind| kind.code().to_owned())
                .collect(),
            sampling_policy: SamplingPolicy::Exhaustive,
            seed: None,
            image_width,
            image_height,
        }
    }

    pub fn feature_types(&self) -> &[String] {
        &self.feature_types
    }

    pub fn set_feature_types(&mut self, feature_types: Vec<String>) {
        self.feature_types = feature_types;
    }

    pub fn sampling_policy(&self) -> SamplingPolicy {
        self.sampling_policy
    }

    pub fn set_sampling_policy(&mut self, sampling_policy: SamplingPolicy) {
        self.sampling_policy = sampling_policy;
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
    }

    /// Checks the configuration against the registered feature types.
    pub fn validate(&self, registry: &FeatureRegistry) -> Result<()> {
        if self.feature_types.is_empty() {
            return Err(Error::InvalidConfiguration(
                "at least one feature type is required".to_owned(),
            ));
        }
        for code in self.feature_types.iter() {
            registry.get_feature(code)?;
        }
        for &(name, side) in &[("width", self.image_width), ("height", self.image_height)] {
            if side == 0 || side > MAX_IMAGE_SIDE {
                return Err(Error::InvalidConfiguration(format!(
                    "illegal integral image {} {}: must be in 1..={}",
                    name, side, MAX_IMAGE_SIDE
                )));
            }
        }
        Ok(())
    }
}

/// Splits a feature type list such as `2v2h3v` into its two-character codes.
///
/// Commas and whitespace between codes are ignored and repeated codes are
/// kept once.
pub fn parse_feature_types(list: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = list
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if chars.is_empty() || chars.len() % 2 != 0 {
        return Err(Error::InvalidConfiguration(format!(
            "illegal feature type list '{}'",
            list
        )));
    }

    let mut codes: Vec<String> = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let code: String = pair.iter().collect::<String>().to_lowercase();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    Ok(codes)
}

/// Parses an integral image size written as `<width>x<height>`.
pub fn parse_image_size(size: &str) -> Result<(u32, u32)> {
    let illegal = |reason: &str| {
        Error::InvalidConfiguration(format!("illegal integral image size '{}': {}", size, reason))
    };

    let lower = size.trim().to_lowercase();
    let (width, height) = lower
        .split_once('x')
        .ok_or_else(|| illegal("expected <width>x<height>"))?;
    let width = width.trim().parse::<u32>().map_err(|e| illegal(&e.to_string()))?;
    let height = height.trim().parse::<u32>().map_err(|e| illegal(&e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(illegal("sides must be positive"));
    }
    Ok((width, height))
}
