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

use std::fmt;
use std::str::FromStr;

use super::HaarFeature;
use crate::common::{IntegralImage, Rectangle};
use crate::error::Error;

/// The built-in feature shapes.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum HaarFeatureKind {
    /// `2v`: left block minus right block.
    TwoVertical,
    /// `2h`: top block minus bottom block.
    TwoHorizontal,
    /// `3v`: outer columns minus the middle column.
    ThreeVertical,
    /// `3h`: outer rows minus the middle row.
    ThreeHorizontal,
    /// `4q`: main diagonal blocks minus anti-diagonal blocks.
    FourSquare,
}

impl HaarFeatureKind {
    pub const ALL: [HaarFeatureKind; 5] = [
        HaarFeatureKind::TwoVertical,
        HaarFeatureKind::TwoHorizontal,
        HaarFeatureKind::ThreeVertical,
        HaarFeatureKind::ThreeHorizontal,
        HaarFeatureKind::FourSquare,
    ];

    #[inline]
    pub fn code(self) -> &'static str {
        match self {
            HaarFeatureKind::TwoVertical => "2v",
            HaarFeatureKind::TwoHorizontal => "2h",
            HaarFeatureKind::ThreeVertical => "3v",
            HaarFeatureKind::ThreeHorizontal => "3h",
            HaarFeatureKind::FourSquare => "4q",
        }
    }

    pub fn from(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
}

impl FromStr for HaarFeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HaarFeatureKind::from(s).ok_or_else(|| Error::unknown_type(s))
    }
}

impl fmt::Display for HaarFeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl HaarFeature for HaarFeatureKind {
    fn short_name(&self) -> &str {
        self.code()
    }

    fn grid(&self) -> (u16, u16) {
        match self {
            HaarFeatureKind::TwoVertical => (2, 1),
            HaarFeatureKind::TwoHorizontal => (1, 2),
            HaarFeatureKind::ThreeVertical => (3, 1),
            HaarFeatureKind::ThreeHorizontal => (1, 3),
            HaarFeatureKind::FourSquare => (2, 2),
        }
    }

    fn response(&self, ii: &dyn IntegralImage, rect: &Rectangle) -> i64 {
        let (cols, rows) = self.grid();
        let blocks = Blocks::new(ii, rect, cols, rows);

        match self {
            HaarFeatureKind::TwoVertical => blocks.sum(0, 0) - blocks.sum(1, 0),
            HaarFeatureKind::TwoHorizontal => blocks.sum(0, 0) - blocks.sum(0, 1),
            HaarFeatureKind::ThreeVertical => {
                blocks.sum(0, 0) - blocks.sum(1, 0) + blocks.sum(2, 0)
            }
            HaarFeatureKind::ThreeHorizontal => {
                blocks.sum(0, 0) - blocks.sum(0, 1) + blocks.sum(0, 2)
            }
            HaarFeatureKind::FourSquare => {
                blocks.sum(0, 0) - blocks.sum(1, 0) - blocks.sum(0, 1) + blocks.sum(1, 1)
            }
        }
    }
}

/// Equal-size block grid laid over a rectangle.
struct Blocks<'a> {
    ii: &'a dyn IntegralImage,
    x: u32,
    y: u32,
    block_width: u32,
    block_height: u32,
}

impl<'a> Blocks<'a> {
    #[inline]
    fn new(ii: &'a dyn IntegralImage, rect: &Rectangle, cols: u16, rows: u16) -> Self {
        Blocks {
            ii,
            x: rect.x() as u32,
            y: rect.y() as u32,
            block_width: rect.width() as u32 / u32::from(cols),
            block_height: rect.height() as u32 / u32::from(rows),
        }
    }

    #[inline]
    fn sum(&self, col: u32, row: u32) -> i64 {
        self.ii.rect_sum(
            self.x + col * self.block_width,
            self.y + row * self.block_height,
            self.block_width,
            self.block_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ImageData, IntegralImageBuffer};
    use image::{GrayImage, Luma};

    fn integral(img: &GrayImage) -> IntegralImageBuffer {
        IntegralImageBuffer::new(&ImageData::new(img.as_raw(), img.width(), img.height()))
    }

    #[test]
    fn test_codes_round_trip() {
        for kind in HaarFeatureKind::ALL.iter() {
            assert_eq!(Some(*kind), HaarFeatureKind::from(kind.code()));
            assert_eq!(kind.code(), kind.to_string());
        }
        assert!(HaarFeatureKind::from("9z").is_none());
        assert!(matches!(
            "9z".parse::<HaarFeatureKind>(),
            Err(Error::UnknownFeatureType { .. })
        ));
    }

    #[test]
    fn test_two_block_responses() {
        // columns 0..2 hold 10, columns 2..4 hold 0
        let img = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 10 } else { 0 }]));
        let ii = integral(&img);
        let rect = Rectangle::new(0, 0, 4, 4);

        assert_eq!(80, HaarFeatureKind::TwoVertical.response(&ii, &rect));
        assert_eq!(0, HaarFeatureKind::TwoHorizontal.response(&ii, &rect));
    }

    #[test]
    fn test_three_block_responses() {
        // rows 2..4 are bright, the rest dark
        let img = GrayImage::from_fn(6, 6, |_, y| Luma([if (2..4).contains(&y) { 9 } else { 1 }]));
        let ii = integral(&img);
        let rect = Rectangle::new(0, 0, 6, 6);

        // outer blocks hold 12 each, the middle block 108
        assert_eq!(12 - 108 + 12, HaarFeatureKind::ThreeHorizontal.response(&ii, &rect));
        // every column sums to 22
        assert_eq!(44, HaarFeatureKind::ThreeVertical.response(&ii, &rect));
    }

    #[test]
    fn test_four_square_response() {
        // checkerboard of 2x2 blocks: bright top-left and bottom-right
        let img = GrayImage::from_fn(4, 4, |x, y| Luma([if (x < 2) == (y < 2) { 5 } else { 0 }]));
        let ii = integral(&img);

        assert_eq!(40, HaarFeatureKind::FourSquare.response(&ii, &Rectangle::new(0, 0, 4, 4)));
        assert_eq!(0, HaarFeatureKind::FourSquare.response(&ii, &Rectangle::new(1, 0, 2, 2)));
    }

    #[test]
    fn test_response_respects_offset() {
        let img = GrayImage::from_fn(8, 8, |x, y| Luma([(x + 8 * y) as u8]));
        let ii = integral(&img);
        let rect = Rectangle::new(3, 2, 4, 2);

        let left = ii.rect_sum(3, 2, 2, 2);
        let right = ii.rect_sum(5, 2, 2, 2);
        assert_eq!(left - right, HaarFeatureKind::TwoVertical.response(&ii, &rect));
    }
}
