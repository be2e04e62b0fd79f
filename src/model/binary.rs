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

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::common::Rectangle;
use crate::config::MAX_IMAGE_SIDE;
use crate::error::{Error, Result};
use crate::feat::{FeatureRegistry, SelectedFeature};

pub const BINARY_MAGIC: &[u8; 4] = b"HAAR";
pub const BINARY_VERSION: u16 = 1;

/// Writes `feature` as a compact little-endian record.
pub fn write_binary_feature<W: Write>(out: &mut W, feature: &SelectedFeature) -> Result<()> {
    let code = feature.short_name().as_bytes();
    if code.len() > u8::MAX as usize {
        return Err(Error::InvalidConfiguration(format!(
            "feature type code '{}' is longer than {} bytes",
            feature.short_name(),
            u8::MAX
        )));
    }

    let rect = feature.rect();
    out.write_all(BINARY_MAGIC)?;
    out.write_u16::<LittleEndian>(BINARY_VERSION)?;
    out.write_u8(code.len() as u8)?;
    out.write_all(code)?;
    for value in [rect.x(), rect.y(), rect.width(), rect.height()].iter() {
        out.write_i16::<LittleEndian>(*value)?;
    }
    Ok(())
}

/// Reads one record written by [`write_binary_feature`].
pub fn read_binary_feature<R: Read>(input: R, registry: &FeatureRegistry) -> Result<SelectedFeature> {
    FeatureReader::new(input).read(registry)
}

/// Reads every record in `buf`, back to back.
pub fn read_binary_features(buf: &[u8], registry: &FeatureRegistry) -> Result<Vec<SelectedFeature>> {
    let mut cursor = Cursor::new(buf);
    let mut features = Vec::new();
    while (cursor.position() as usize) < buf.len() {
        features.push(FeatureReader::new(&mut cursor).read(registry)?);
    }
    Ok(features)
}

struct FeatureReader<R> {
    reader: R,
}

impl<R: Read> FeatureReader<R> {
    fn new(reader: R) -> Self {
        FeatureReader { reader }
    }

    fn read(mut self, registry: &FeatureRegistry) -> Result<SelectedFeature> {
        let mut magic = [0u8; 4];
        self.reader
            .read_exact(&mut magic)
            .map_err(|e| truncated("magic", e))?;
        if &magic != BINARY_MAGIC {
            return Err(Error::malformed("magic", format!("unexpected bytes {:?}", magic)));
        }

        let version = self.read_u16("version")?;
        if version != BINARY_VERSION {
            return Err(Error::malformed(
                "version",
                format!("unsupported version {}", version),
            ));
        }

        let code_len = self.read_u8("type")? as usize;
        let mut code = vec![0u8; code_len];
        self.reader
            .read_exact(&mut code)
            .map_err(|e| truncated("type", e))?;
        let code = String::from_utf8(code).map_err(|e| Error::malformed("type", e.to_string()))?;
        let feature = registry.get_feature(&code)?;

        let rect = Rectangle::new(
            self.read_i16("x")?,
            self.read_i16("y")?,
            self.read_i16("width")?,
            self.read_i16("height")?,
        );
        if !feature.is_legal_rect(&rect, MAX_IMAGE_SIDE, MAX_IMAGE_SIDE) {
            return Err(Error::malformed(
                "rect",
                format!("{:?} is not a legal {} rectangle", rect, code),
            ));
        }

        Ok(SelectedFeature::new(feature, rect))
    }

    fn read_u8(&mut self, tag: &str) -> Result<u8> {
        self.reader.read_u8().map_err(|e| truncated(tag, e))
    }

    fn read_u16(&mut self, tag: &str) -> Result<u16> {
        self.reader.read_u16::<LittleEndian>().map_err(|e| truncated(tag, e))
    }

    fn read_i16(&mut self, tag: &str) -> Result<i16> {
        self.reader.read_i16::<LittleEndian>().map_err(|e| truncated(tag, e))
    }
}

fn truncated(tag: &str, error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::UnexpectedEof => Error::malformed(tag, "truncated record"),
        _ => Error::Io(error),
    }
}
