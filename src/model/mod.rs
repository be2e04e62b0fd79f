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

//! Persistence of selected features.
//!
//! The tagged text form is what training tools exchange; the binary record is
//! a compact alternative for embedding.

mod binary;
mod text;
mod tokenizer;

pub use self::binary::{
    read_binary_feature, read_binary_features, write_binary_feature, BINARY_MAGIC, BINARY_VERSION,
};
pub use self::text::{load_features, read_feature, read_features};
pub use self::tokenizer::{tokenize, TagReader, Token};
