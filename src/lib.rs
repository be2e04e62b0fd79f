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

//! Search and selection of Haar-like features for boosted cascades.
//!
//! Each boosting round hands the learner a set of weighted, labelled
//! integral images. The learner enumerates or samples feature placements,
//! scores the responses of every candidate and returns the best one, which
//! can then be saved as tagged text or as a binary record.

mod common;
mod math;
pub mod config;
pub mod error;
pub mod feat;
pub mod learner;
pub mod model;
pub mod sampler;

pub use crate::common::{ImageData, IntegralImage, IntegralImageBuffer, Rectangle};
pub use crate::config::LearnerConfig;
pub use crate::error::{Error, Result};
pub use crate::feat::{FeatureRegistry, HaarFeature, HaarFeatureKind, SelectedFeature};
pub use crate::learner::{
    CorrelationScorer, Example, FnScorer, HaarLearner, ScoreOrder, Scorer, StumpErrorScorer,
};
pub use crate::model::{load_features, read_feature, read_features};
pub use crate::sampler::{ConfigurationSampler, SamplingPolicy};

/// Create a learner for the feature types registered in `registry`.
///
/// Fails if `config` names an unknown feature type or an illegal image size.
pub fn create_learner<'r>(
    registry: &'r FeatureRegistry,
    config: LearnerConfig,
) -> Result<Box<dyn WeakLearner + 'r>> {
    Ok(Box::new(HaarLearner::new(registry, config)?))
}

/// Weak learner of one boosting round.
///
/// # Examples
///
/// ```rust
/// use haarlearn::{Example, FeatureRegistry, ImageData, IntegralImageBuffer, LearnerConfig, StumpErrorScorer};
///
/// let registry = FeatureRegistry::with_default_features();
/// let mut config = LearnerConfig::new(4, 4);
/// config.set_feature_types(vec!["2v".to_owned()]);
/// let mut learner = haarlearn::create_learner(&registry, config).unwrap();
///
/// let bright_left: Vec<u8> = (0..16).map(|i| if i % 4 < 2 { 255 } else { 0 }).collect();
/// let bright_right: Vec<u8> = bright_left.iter().map(|p| 255 - p).collect();
/// let examples = vec![
///     Example::new(IntegralImageBuffer::new(&ImageData::new(&bright_left, 4, 4)), 1, 0.5),
///     Example::new(IntegralImageBuffer::new(&ImageData::new(&bright_right, 4, 4)), -1, 0.5),
/// ];
///
/// let selected = learner.select(&examples, &StumpErrorScorer).unwrap();
/// let mut text = Vec::new();
/// selected.save(&mut text, 0).unwrap();
/// println!("{}", String::from_utf8(text).unwrap());
/// ```
pub trait WeakLearner {
    /// Search the configured feature types and return the best candidate.
    ///
    /// Every example must share the image size of the configuration, and
    /// labels are `+1` or `-1`.
    ///
    /// # Errors
    ///
    /// `NoCandidateAvailable` if no requested type has a legal placement;
    /// `NoScorableCandidate` if candidates were drawn but every score was NaN;
    /// `InvalidConfiguration` if the example set is empty or an image has
    /// the wrong size.
    fn select(&mut self, examples: &[Example], scorer: &dyn Scorer) -> Result<SelectedFeature>;

    /// The configuration the learner was created with.
    fn config(&self) -> &LearnerConfig;
}
