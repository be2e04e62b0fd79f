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

mod integral_image;

pub use self::integral_image::{ImageData, IntegralImage, IntegralImageBuffer};

/// Position and size of a feature inside the integral image window.
///
/// All four fields fit the 16-bit signed range used by the serialized
/// record. A legal rectangle has non-negative fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    x: i16,
    y: i16,
    width: i16,
    height: i16,
}

impl Rectangle {
    pub fn new(x: i16, y: i16, width: i16, height: i16) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn set_x(&mut self, x: i16) {
        self.x = x;
    }

    #[inline]
    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn set_y(&mut self, y: i16) {
        self.y = y;
    }

    #[inline]
    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn set_width(&mut self, width: i16) {
        self.width = width;
    }

    #[inline]
    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn set_height(&mut self, height: i16) {
        self.height = height;
    }

    pub fn is_legal(&self) -> bool {
        self.x >= 0 && self.y >= 0 && self.width >= 0 && self.height >= 0
    }

    /// Whether the rectangle lies entirely inside a `width` x `height` window.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.is_legal()
            && i64::from(self.x) + i64::from(self.width) <= i64::from(width)
            && i64::from(self.y) + i64::from(self.height) <= i64::from(height)
    }
}
