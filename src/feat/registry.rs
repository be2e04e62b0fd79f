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

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use super::{HaarFeature, HaarFeatureKind, SelectedFeature};
use crate::common::Rectangle;
use crate::error::{Error, Result};

/// Catalog of feature shapes keyed by their type code.
///
/// Built once during start-up and then passed by reference to the learner
/// and to the model loaders. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: BTreeMap<String, Arc<dyn HaarFeature>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        FeatureRegistry::default()
    }

    /// A registry holding every [`HaarFeatureKind`].
    pub fn with_default_features() -> Self {
        let mut registry = FeatureRegistry::new();
        for kind in HaarFeatureKind::ALL.iter() {
            registry.register(Arc::new(*kind));
        }
        registry
    }

    /// Registers `feature` under its short name.
    ///
    /// Registering a code again replaces the previous entry, so registering
    /// the same feature twice leaves the registry unchanged.
    pub fn register(&mut self, feature: Arc<dyn HaarFeature>) {
        let code = feature.short_name().to_owned();
        if self.features.insert(code.clone(), feature).is_some() {
            debug!("Feature type '{}' registered again", code);
        }
    }

    pub fn get_feature(&self, code: &str) -> Result<Arc<dyn HaarFeature>> {
        self.features
            .get(code)
            .cloned()
            .ok_or_else(|| Error::unknown_type(code))
    }

    /// Rebuilds a configured feature from its type code and rectangle.
    pub fn configure(&self, code: &str, rect: Rectangle) -> Result<SelectedFeature> {
        Ok(SelectedFeature::new(self.get_feature(code)?, rect))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.features.contains_key(code)
    }

    /// Registered codes in ascending order.
    pub fn codes(&self) -> Vec<&str> {
        self.features.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IntegralImage;

    #[derive(Debug)]
    struct Flat;

    impl HaarFeature for Flat {
        fn short_name(&self) -> &str {
            "1f"
        }

        fn grid(&self) -> (u16, u16) {
            (1, 1)
        }

        fn response(&self, ii: &dyn IntegralImage, rect: &Rectangle) -> i64 {
            ii.rect_sum(
                rect.x() as u32,
                rect.y() as u32,
                rect.width() as u32,
                rect.height() as u32,
            )
        }
    }

    #[test]
    fn test_default_features() {
        let registry = FeatureRegistry::with_default_features();
        assert_eq!(vec!["2h", "2v", "3h", "3v", "4q"], registry.codes());
        for kind in HaarFeatureKind::ALL.iter() {
            let feature = registry.get_feature(kind.code()).unwrap();
            assert_eq!(kind.code(), feature.short_name());
            assert_eq!(kind.grid(), feature.grid());
        }
    }

    #[test]
    fn test_unknown_feature_type() {
        let registry = FeatureRegistry::with_default_features();
        match registry.get_feature("9z") {
            Err(Error::UnknownFeatureType { code }) => assert_eq!("9z", code),
            other => panic!("unexpected lookup result: {:?}", other),
        }
        assert!(FeatureRegistry::new().get_feature("2v").is_err());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = FeatureRegistry::with_default_features();
        registry.register(Arc::new(HaarFeatureKind::TwoVertical));
        assert_eq!(5, registry.len());

        registry.register(Arc::new(Flat));
        registry.register(Arc::new(Flat));
        assert_eq!(6, registry.len());
        assert!(registry.contains("1f"));
    }

    #[test]
    fn test_configure() {
        let registry = FeatureRegistry::with_default_features();
        let selected = registry.configure("4q", Rectangle::new(1, 2, 4, 6)).unwrap();
        assert_eq!("4q", selected.short_name());
        assert_eq!(Rectangle::new(1, 2, 4, 6), selected.rect());
    }
}
