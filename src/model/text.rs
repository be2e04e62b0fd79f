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

use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::tokenizer::TagReader;
use crate::common::Rectangle;
use crate::config::MAX_IMAGE_SIDE;
use crate::error::{Error, Result};
use crate::feat::{FeatureRegistry, SelectedFeature};

const INDENT: &str = "  ";

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn standard_tag<T: Display>(name: &str, value: T, depth: usize) -> String {
    format!("{}<{}>{}</{}>", indent(depth), name, value, name)
}

impl SelectedFeature {
    /// Writes the feature type and its rectangle as tagged text, indented
    /// by `depth` levels.
    pub fn save<W: Write>(&self, out: &mut W, depth: usize) -> Result<()> {
        let rect = self.rect();

        writeln!(out, "{}", standard_tag("type", self.short_name(), depth))?;
        writeln!(out, "{}<rect>", indent(depth))?;
        writeln!(out, "{}", standard_tag("x", rect.x(), depth + 1))?;
        writeln!(out, "{}", standard_tag("y", rect.y(), depth + 1))?;
        writeln!(out, "{}", standard_tag("width", rect.width(), depth + 1))?;
        writeln!(out, "{}", standard_tag("height", rect.height(), depth + 1))?;
        writeln!(out, "{}</rect>", indent(depth))?;

        Ok(())
    }

    /// Reads the next record from `reader`: `type` first, then `x`, `y`,
    /// `width` and `height`, in this order.
    pub fn load(reader: &mut TagReader, registry: &FeatureRegistry) -> Result<SelectedFeature> {
        let code: String = reader.seek_enclosed("type")?;
        let feature = registry.get_feature(&code)?;

        let rect = Rectangle::new(
            reader.seek_enclosed("x")?,
            reader.seek_enclosed("y")?,
            reader.seek_enclosed("width")?,
            reader.seek_enclosed("height")?,
        );
        if !feature.is_legal_rect(&rect, MAX_IMAGE_SIDE, MAX_IMAGE_SIDE) {
            return Err(Error::malformed(
                "rect",
                format!("{:?} is not a legal {} rectangle", rect, code),
            ));
        }

        Ok(SelectedFeature::new(feature, rect))
    }
}

/// Parses one feature record.
pub fn read_feature(input: &str, registry: &FeatureRegistry) -> Result<SelectedFeature> {
    let mut reader: TagReader = input.parse()?;
    SelectedFeature::load(&mut reader, registry)
}

/// Parses every feature record in `input`, in order.
pub fn read_features(input: &str, registry: &FeatureRegistry) -> Result<Vec<SelectedFeature>> {
    let mut reader: TagReader = input.parse()?;
    let mut features = Vec::new();
    while reader.has_tag_ahead("type") {
        features.push(SelectedFeature::load(&mut reader, registry)?);
    }
    Ok(features)
}

/// Reads every feature record stored in the file at `path`.
pub fn load_features<P: AsRef<Path>>(path: P, registry: &FeatureRegistry) -> Result<Vec<SelectedFeature>> {
    let input = fs::read_to_string(path)?;
    read_features(&input, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::feat::HaarFeatureKind;

    const RECORD: &str = "<type>2v</type>\n\
                          <rect>\n  \
                          <x>12</x>\n  \
                          <y>4</y>\n  \
                          <width>8</width>\n  \
                          <height>16</height>\n\
                          </rect>\n";

    fn registry() -> FeatureRegistry {
        FeatureRegistry::with_default_features()
    }

    #[test]
    fn test_save() {
        let selected = SelectedFeature::new(Arc::new(HaarFeatureKind::TwoVertical), Rectangle::new(12, 4, 8, 16));
        let mut out = Vec::new();
        selected.save(&mut out, 0).unwrap();
        assert_eq!(RECORD, String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_save_nested() {
        let selected = SelectedFeature::new(Arc::new(HaarFeatureKind::FourSquare), Rectangle::new(0, 2, 4, 6));
        let mut out = Vec::new();
        selected.save(&mut out, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("    <type>4q</type>\n    <rect>\n      <x>0</x>\n"));
    }

    #[test]
    fn test_round_trip() {
        let registry = registry();
        for (i, kind) in HaarFeatureKind::ALL.iter().enumerate() {
            let (cols, rows) = match kind.code() {
                "2v" => (2, 1),
                "2h" => (1, 2),
                "3v" => (3, 1),
                "3h" => (1, 3),
                _ => (2, 2),
            };
            let rect = Rectangle::new(i as i16, 7, 6 * cols, 4 * rows);
            let selected = registry.configure(kind.code(), rect).unwrap();

            let mut out = Vec::new();
            selected.save(&mut out, i).unwrap();
            let loaded = read_feature(&String::from_utf8(out).unwrap(), &registry).unwrap();

            assert_eq!(rect, loaded.rect());
            assert_eq!(kind.code(), loaded.short_name());
        }
    }

    #[test]
    fn test_read_features() {
        let input = format!("<model>\n{}{}</model>\n", RECORD, RECORD.replace("2v", "2h").replace("<height>16", "<height>4"));
        let features = read_features(&input, &registry()).unwrap();
        assert_eq!(2, features.len());
        assert_eq!("2v", features[0].short_name());
        assert_eq!("2h", features[1].short_name());
        assert_eq!(Rectangle::new(12, 4, 8, 4), features[1].rect());
    }

    #[test]
    fn test_out_of_order_tags() {
        let input = RECORD.replace("<x>12</x>\n  <y>4</y>", "<y>4</y>\n  <x>12</x>");
        assert!(matches!(
            read_feature(&input, &registry()),
            Err(Error::MalformedSerializedFeature { ref tag, .. }) if tag == "y"
        ));
    }

    #[test]
    fn test_missing_x() {
        let input = RECORD.replace("<x>12</x>\n", "");
        assert!(matches!(
            read_feature(&input, &registry()),
            Err(Error::MalformedSerializedFeature { ref tag, .. }) if tag == "x"
        ));
    }

    #[test]
    fn test_unknown_feature_type() {
        let input = RECORD.replace("2v", "9z");
        assert!(matches!(
            read_feature(&input, &registry()),
            Err(Error::UnknownFeatureType { ref code }) if code == "9z"
        ));
    }

    #[test]
    fn test_illegal_rectangle() {
        let input = RECORD.replace("<width>8", "<width>7");
        assert!(matches!(
            read_feature(&input, &registry()),
            Err(Error::MalformedSerializedFeature { ref tag, .. }) if tag == "rect"
        ));

        let input = RECORD.replace("<x>12", "<x>-12");
        assert!(read_feature(&input, &registry()).is_err());
    }

    #[test]
    fn test_load_features_from_missing_file() {
        assert!(matches!(
            load_features("/nonexistent/haarlearn/model.txt", &registry()),
            Err(Error::Io(_))
        ));
    }
}
