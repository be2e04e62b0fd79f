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

use num::integer::Integer;

/// Borrowed view of an 8-bit gray-scale image.
#[derive(Debug, Clone, Copy)]
pub struct ImageData<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageData<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        ImageData {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Constant-time block sums over an image.
///
/// Implementors must return the exact pixel sum of any block lying inside
/// `width()` x `height()`; the feature evaluator never asks for anything else.
pub trait IntegralImage {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn rect_sum(&self, x: u32, y: u32, width: u32, height: u32) -> i64;
}

/// Integral image with a leading row and column of zeros, so every block
/// sum is exactly four lookups.
#[derive(Debug, Clone)]
pub struct IntegralImageBuffer {
    width: u32,
    height: u32,
    stride: usize,
    sums: Vec<i64>,
}

impl IntegralImageBuffer {
    /// # Panics
    ///
    /// Panics if the length of the pixel data is not `width * height`.
    pub fn new(image: &ImageData) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        assert_eq!(
            image.data().len(),
            width * height,
            "Illegal image: {}x{} with {} bytes",
            width,
            height,
            image.data().len()
        );

        let stride = width + 1;
        let mut sums = vec![0i64; stride * (height + 1)];
        compute_integral(image.data(), width, height, &mut sums);

        IntegralImageBuffer {
            width: image.width(),
            height: image.height(),
            stride,
            sums,
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> i64 {
        self.sums[y * self.stride + x]
    }
}

impl IntegralImage for IntegralImageBuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn rect_sum(&self, x: u32, y: u32, width: u32, height: u32) -> i64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + width as usize, y0 + height as usize);
        self.at(x1, y1) - self.at(x1, y0) - self.at(x0, y1) + self.at(x0, y0)
    }
}

/// Fills `dest`, laid out with a stride of `width + 1` and a zero first row
/// and column, with the running sums of `src`.
fn compute_integral<T>(src: &[u8], width: usize, height: usize, dest: &mut [T])
where
    T: Integer + Copy + From<u8>,
{
    let stride = width + 1;
    for y in 0..height {
        let mut row_sum: T = num::zero();
        for x in 0..width {
            row_sum = row_sum + T::from(src[y * width + x]);
            dest[(y + 1) * stride + x + 1] = dest[y * stride + x + 1] + row_sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn brute_force_sum(img: &GrayImage, x: u32, y: u32, width: u32, height: u32) -> i64 {
        let mut sum = 0;
        for yy in y..(y + height) {
            for xx in x..(x + width) {
                sum += i64::from(img.get_pixel(xx, yy)[0]);
            }
        }
        sum
    }

    #[test]
    fn test_rect_sum_matches_brute_force() {
        let img = GrayImage::from_fn(7, 5, |x, y| Luma([(x * 31 + y * 17) as u8]));
        let ii = IntegralImageBuffer::new(&ImageData::new(img.as_raw(), 7, 5));

        for y in 0..5 {
            for x in 0..7 {
                for h in 1..=(5 - y) {
                    for w in 1..=(7 - x) {
                        assert_eq!(brute_force_sum(&img, x, y, w, h), ii.rect_sum(x, y, w, h));
                    }
                }
            }
        }
    }

    #[test]
    fn test_full_white_image() {
        let data = vec![255u8; 64 * 64];
        let ii = IntegralImageBuffer::new(&ImageData::new(&data, 64, 64));
        assert_eq!(64, ii.width());
        assert_eq!(64, ii.height());
        assert_eq!(255 * 64 * 64, ii.rect_sum(0, 0, 64, 64));
        assert_eq!(0, ii.rect_sum(10, 10, 0, 5));
    }

    #[test]
    #[should_panic]
    fn test_rejects_short_buffer() {
        let data = vec![0u8; 10];
        IntegralImageBuffer::new(&ImageData::new(&data, 4, 4));
    }
}
