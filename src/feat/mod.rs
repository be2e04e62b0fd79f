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

mod haar_features;
mod registry;

pub use self::haar_features::HaarFeatureKind;
pub use self::registry::FeatureRegistry;

use std::fmt::Debug;
use std::sync::Arc;

use crate::common::{IntegralImage, Rectangle};

/// A Haar-like feature shape: a grid of equally sized blocks whose pixel
/// sums are combined with alternating signs.
pub trait HaarFeature: Debug + Send + Sync {
    /// Type code carried by the registry and the serialized record, e.g. `2v`.
    fn short_name(&self) -> &str;

    /// Number of block columns and rows. A zero axis is treated as one block.
    fn grid(&self) -> (u16, u16);

    /// Signed response of the feature laid over `rect`.
    ///
    /// `rect` must be legal for this shape (see [`HaarFeature::is_legal_rect`]).
    fn response(&self, ii: &dyn IntegralImage, rect: &Rectangle) -> i64;

    /// Whether `rect` splits into whole blocks and lies inside a
    /// `width` x `height` integral image.
    fn is_legal_rect(&self, rect: &Rectangle, width: u32, height: u32) -> bool {
        let (cols, rows) = self.grid();
        let (cols, rows) = (cols.max(1), rows.max(1));
        rect.width() > 0
            && rect.height() > 0
            && rect.width() as u16 % cols == 0
            && rect.height() as u16 % rows == 0
            && rect.fits_within(width, height)
    }
}

/// A feature shape together with the rectangle it was placed on.
///
/// This is what a boosting round keeps once the search is over: it can be
/// evaluated on new images and saved without running the search again.
#[derive(Debug, Clone)]
pub struct SelectedFeature {
    feature: Arc<dyn HaarFeature>,
    rect: Rectangle,
}

impl SelectedFeature {
    pub fn new(feature: Arc<dyn HaarFeature>, rect: Rectangle) -> Self {
        SelectedFeature { feature, rect }
    }

    pub fn feature(&self) -> &Arc<dyn HaarFeature> {
        &self.feature
    }

    pub fn short_name(&self) -> &str {
        self.feature.short_name()
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn evaluate(&self, ii: &dyn IntegralImage) -> i64 {
        self.feature.response(ii, &self.rect)
    }
}

/// Evaluates a feature shape placed on `rect` for one example.
#[inline]
pub fn evaluate(feature: &dyn HaarFeature, rect: &Rectangle, example: &dyn IntegralImage) -> i64 {
    debug_assert!(
        feature.is_legal_rect(rect, example.width(), example.height()),
        "Illegal {} rectangle: {:?}",
        feature.short_name(),
        rect
    );
    feature.response(example, rect)
}
