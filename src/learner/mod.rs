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

mod scorer;

pub use self::scorer::{CorrelationScorer, FnScorer, ScoreOrder, Scorer, StumpErrorScorer};

use std::sync::Arc;

use log::{debug, info, warn};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::common::{IntegralImage, IntegralImageBuffer, Rectangle};
use crate::config::LearnerConfig;
use crate::error::{Error, Result};
use crate::feat::{self, FeatureRegistry, HaarFeature, SelectedFeature};
use crate::sampler::ConfigurationSampler;
use crate::WeakLearner;

/// Below this many examples the response column is computed on the
/// calling thread.
#[cfg(feature = "rayon")]
const PARALLEL_MIN_EXAMPLES: usize = 256;

/// One weighted training example.
#[derive(Debug, Clone)]
pub struct Example<I = IntegralImageBuffer> {
    image: I,
    label: i8,
    weight: f64,
}

impl<I: IntegralImage> Example<I> {
    /// # Panics
    ///
    /// Panics if `label` is not `1` or `-1`, or if `weight` is negative or NaN.
    pub fn new(image: I, label: i8, weight: f64) -> Self {
        if label != 1 && label != -1 {
            panic!("Illegal label: {}", label);
        }
        if !(weight >= 0.0) {
            panic!("Illegal weight: {}", weight);
        }
        Example {
            image,
            label,
            weight,
        }
    }

    pub fn image(&self) -> &I {
        &self.image
    }

    pub fn label(&self) -> i8 {
        self.label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Weights are owned by the boosting loop and change every round.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

/// Searches the Haar-like feature space for the configuration that best
/// separates the weighted examples of a boosting round.
pub struct HaarLearner<'r> {
    registry: &'r FeatureRegistry,
    config: LearnerConfig,
    feature_types: Vec<Arc<dyn HaarFeature>>,
    sampler: ConfigurationSampler,
}

struct Best {
    score: f64,
    feature: Arc<dyn HaarFeature>,
    rect: Rectangle,
}

impl<'r> HaarLearner<'r> {
    /// Resolves the requested feature types and seeds the sampler.
    pub fn new(registry: &'r FeatureRegistry, config: LearnerConfig) -> Result<Self> {
        config.validate(registry)?;

        let feature_types = config
            .feature_types()
            .iter()
            .map(|code| registry.get_feature(code))
            .collect::<Result<Vec<_>>>()?;
        let sampler = ConfigurationSampler::new(
            config.sampling_policy(),
            config.seed(),
            config.image_width(),
            config.image_height(),
        )?;

        Ok(HaarLearner {
            registry,
            config,
            feature_types,
            sampler,
        })
    }

    pub fn registry(&self) -> &'r FeatureRegistry {
        self.registry
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Runs the search of one boosting round.
    ///
    /// Candidates are visited per feature type in request order; a candidate
    /// replaces the current best only with a strictly better score, so the
    /// first one found wins ties.
    pub fn select<I>(&mut self, examples: &[Example<I>], scorer: &dyn Scorer) -> Result<SelectedFeature>
    where
        I: IntegralImage + Sync,
    {
        self.check_examples(examples)?;

        let weights: Vec<f64> = examples.iter().map(|e| e.weight).collect();
        let labels: Vec<i8> = examples.iter().map(|e| e.label).collect();
        let mut responses: Vec<i64> = Vec::with_capacity(examples.len());
        let order = scorer.order();

        let mut best: Option<Best> = None;
        let mut unscored: Vec<String> = Vec::new();
        for feature in self.feature_types.iter() {
            let mut evaluated = 0u64;
            let mut type_best: Option<(f64, Rectangle)> = None;

            for rect in self.sampler.candidates(feature.as_ref()) {
                response_column(feature.as_ref(), &rect, examples, &mut responses);
                let score = scorer.score(&responses, &weights, &labels);
                evaluated += 1;

                if type_best.map_or(!score.is_nan(), |(s, _)| order.is_better(score, s)) {
                    type_best = Some((score, rect));
                }
            }

            match type_best {
                Some((score, rect)) => {
                    debug!(
                        "Feature type {}: {} candidates, best score {} at {:?}",
                        feature.short_name(),
                        evaluated,
                        score,
                        rect
                    );
                    if best.as_ref().map_or(true, |b| order.is_better(score, b.score)) {
                        best = Some(Best {
                            score,
                            feature: Arc::clone(feature),
                            rect,
                        });
                    }
                }
                None if evaluated == 0 => {
                    warn!("Feature type {}: no legal candidate", feature.short_name())
                }
                None => {
                    warn!(
                        "Feature type {}: all {} candidates scored NaN",
                        feature.short_name(),
                        evaluated
                    );
                    unscored.push(feature.short_name().to_owned());
                }
            }
        }

        match best {
            Some(best) => {
                info!(
                    "Selected {} feature at {:?} with score {}",
                    best.feature.short_name(),
                    best.rect,
                    best.score
                );
                Ok(SelectedFeature::new(best.feature, best.rect))
            }
            None if !unscored.is_empty() => Err(Error::NoScorableCandidate {
                feature_types: unscored,
            }),
            None => Err(Error::NoCandidateAvailable {
                feature_types: self.config.feature_types().to_vec(),
            }),
        }
    }

    fn check_examples<I: IntegralImage>(&self, examples: &[Example<I>]) -> Result<()> {
        if examples.is_empty() {
            return Err(Error::InvalidConfiguration(
                "search: the example set is empty".to_owned(),
            ));
        }
        let (width, height) = (self.config.image_width(), self.config.image_height());
        for (i, example) in examples.iter().enumerate() {
            if example.image.width() != width || example.image.height() != height {
                return Err(Error::InvalidConfiguration(format!(
                    "search: example {} has a {}x{} integral image, expected {}x{}",
                    i,
                    example.image.width(),
                    example.image.height(),
                    width,
                    height
                )));
            }
        }
        Ok(())
    }
}

impl<'r> WeakLearner for HaarLearner<'r> {
    fn select(&mut self, examples: &[Example], scorer: &dyn Scorer) -> Result<SelectedFeature> {
        HaarLearner::select(self, examples, scorer)
    }

    fn config(&self) -> &LearnerConfig {
        &self.config
    }
}

/// Responses of one candidate for every example, in example order.
fn response_column<I>(feature: &dyn HaarFeature, rect: &Rectangle, examples: &[Example<I>], out: &mut Vec<i64>)
where
    I: IntegralImage + Sync,
{
    #[cfg(feature = "rayon")]
    {
        if examples.len() >= PARALLEL_MIN_EXAMPLES {
            examples
                .par_iter()
                .map(|e| feat::evaluate(feature, rect, &e.image))
                .collect_into_vec(out);
            return;
        }
    }

    out.clear();
    out.extend(examples.iter().map(|e| feat::evaluate(feature, rect, &e.image)));
}
