use image::{RgbImage, RgbaImage};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SuperResError};

/// An 8-bit RGB raster with implicit full-opacity alpha.
///
/// Pixel data is stored row-major with shape `(height, width, 3)`. Both sides
/// are always non-zero. A raster is never modified after construction;
/// transforms build new rasters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Array3<u8>,
}

impl Raster {
    /// Wrap an `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT {
            return Err(SuperResError::Pipeline(format!(
                "Raster must have {} channels, got {}",
                COLOR_CHANNEL_COUNT, c
            )));
        }
        if h == 0 || w == 0 {
            return Err(SuperResError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { data })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    ///
    /// Fails with [`SuperResError::InvalidDimensions`] when either side is zero.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> [u8; COLOR_CHANNEL_COUNT],
    {
        if width == 0 || height == 0 {
            return Err(SuperResError::InvalidDimensions { width, height });
        }
        let mut data = Array3::<u8>::zeros((height, width, COLOR_CHANNEL_COUNT));
        for y in 0..height {
            for x in 0..width {
                let px = f(x, y);
                for (ch, &v) in px.iter().enumerate() {
                    data[[y, x, ch]] = v;
                }
            }
        }
        Ok(Self { data })
    }

    /// A raster where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: [u8; COLOR_CHANNEL_COUNT]) -> Result<Self> {
        Self::from_fn(width, height, |_, _| color)
    }

    pub(crate) fn from_array_unchecked(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, COLOR_CHANNEL_COUNT);
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Channel samples at `(x, y)`. Panics if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_CHANNEL_COUNT] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Convert a decoded 8-bit RGB image.
    pub fn from_rgb_image(img: RgbImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        let data = Array3::from_shape_vec(
            (h as usize, w as usize, COLOR_CHANNEL_COUNT),
            img.into_raw(),
        )
        .map_err(|e| SuperResError::Pipeline(format!("Raster layout error: {e}")))?;
        Self::from_array(data)
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let raw: Vec<u8> = self.data.iter().copied().collect();
        RgbImage::from_raw(self.width() as u32, self.height() as u32, raw).ok_or(
            SuperResError::InvalidDimensions {
                width: self.width(),
                height: self.height(),
            },
        )
    }

    /// Convert to RGBA with every alpha sample at 255.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let [r, g, b] = self.pixel(x as usize, y as usize);
            image::Rgba([r, g, b, 255])
        })
    }
}

/// Integer translation of a frame relative to the reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Ordered, non-empty frames sharing one size. Frame 0 is the reference.
#[derive(Clone, Debug)]
pub struct FrameSet {
    frames: Vec<Raster>,
}

impl FrameSet {
    /// Validate and wrap a frame sequence.
    ///
    /// Fails on an empty sequence or any frame whose size differs from the
    /// reference.
    pub fn new(frames: Vec<Raster>) -> Result<Self> {
        let Some(reference) = frames.first() else {
            return Err(SuperResError::EmptySequence);
        };
        let expected = reference.dimensions();
        for (index, frame) in frames.iter().enumerate().skip(1) {
            if frame.dimensions() != expected {
                return Err(SuperResError::DimensionMismatch {
                    index,
                    expected,
                    actual: frame.dimensions(),
                });
            }
        }
        Ok(Self { frames })
    }

    pub fn reference(&self) -> &Raster {
        &self.frames[0]
    }

    pub fn frames(&self) -> &[Raster] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn width(&self) -> usize {
        self.reference().width()
    }

    pub fn height(&self) -> usize {
        self.reference().height()
    }
}
