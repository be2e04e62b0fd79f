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

use std::io;

/// Errors raised while searching, saving or loading Haar-like features.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A feature type code was never registered.
    #[error("unknown feature type: '{code}'")]
    UnknownFeatureType { code: String },

    /// Every requested feature type produced an empty candidate sequence.
    #[error("search: no candidate available for feature types [{}]", .feature_types.join(", "))]
    NoCandidateAvailable { feature_types: Vec<String> },

    /// Candidates were drawn but the scorer returned NaN for every one.
    #[error("search: every candidate scored NaN for feature types [{}]", .feature_types.join(", "))]
    NoScorableCandidate { feature_types: Vec<String> },

    #[error("load: malformed serialized feature at <{tag}>: {reason}")]
    MalformedSerializedFeature { tag: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        Error::MalformedSerializedFeature {
            tag: tag.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_type(code: &str) -> Self {
        Error::UnknownFeatureType {
            code: code.to_owned(),
        }
    }
}
