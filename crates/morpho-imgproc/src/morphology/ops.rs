use num_traits::{Bounded, PrimInt};

use morpho_image::Image;

use super::{Kernel, MorphologyError};
use crate::arithmetic::subtract_saturating;
use crate::padding::PaddingMode;
use crate::parallel::{self, ExecutionStrategy};

/// The morphological operations supported by [`morphology_ex`].
///
/// The variant also names the operation that produced a result image, e.g. when
/// writing results to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphOp {
    /// Local minimum over the kernel.
    Erode,
    /// Local maximum over the kernel.
    Dilate,
    /// Erosion followed by dilation.
    Open,
    /// Dilation followed by erosion.
    Close,
    /// Dilation minus erosion.
    Gradient,
    /// Source minus opening.
    TopHat,
    /// Closing minus source.
    BlackHat,
}

impl MorphOp {
    /// All operations, in the order they are usually presented.
    pub const ALL: [MorphOp; 7] = [
        MorphOp::Erode,
        MorphOp::Dilate,
        MorphOp::Open,
        MorphOp::Close,
        MorphOp::Gradient,
        MorphOp::TopHat,
        MorphOp::BlackHat,
    ];

    /// A lowercase name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            MorphOp::Erode => "erode",
            MorphOp::Dilate => "dilate",
            MorphOp::Open => "open",
            MorphOp::Close => "close",
            MorphOp::Gradient => "gradient",
            MorphOp::TopHat => "tophat",
            MorphOp::BlackHat => "blackhat",
        }
    }
}

impl std::fmt::Display for MorphOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MorphOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "erode" | "erosion" => Ok(MorphOp::Erode),
            "dilate" | "dilation" => Ok(MorphOp::Dilate),
            "open" | "opening" => Ok(MorphOp::Open),
            "close" | "closing" => Ok(MorphOp::Close),
            "gradient" => Ok(MorphOp::Gradient),
            "tophat" | "top-hat" | "top_hat" => Ok(MorphOp::TopHat),
            "blackhat" | "black-hat" | "black_hat" => Ok(MorphOp::BlackHat),
            other => Err(format!("unknown morphological operation: {other}")),
        }
    }
}

/// Options shared by all morphological operations.
///
/// The default runs a single iteration with a constant border of zero, so reads
/// outside the image count as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphOptions<T, const C: usize> {
    /// How many times the erosion/dilation primitives are applied (must be >= 1).
    pub iterations: usize,
    /// How reads outside the image are resolved.
    pub padding_mode: PaddingMode,
    /// The value used for out-of-bounds reads with [`PaddingMode::Constant`].
    pub border_value: [T; C],
    /// How rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl<T: Copy + Default, const C: usize> Default for MorphOptions<T, C> {
    fn default() -> Self {
        Self {
            iterations: 1,
            padding_mode: PaddingMode::Constant,
            border_value: [T::default(); C],
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl<T: Copy + Default, const C: usize> MorphOptions<T, C> {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the border mode and the constant border value.
    pub fn with_padding(mut self, padding_mode: PaddingMode, border_value: [T; C]) -> Self {
        self.padding_mode = padding_mode;
        self.border_value = border_value;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

fn validate_inputs<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), MorphologyError> {
    kernel.validate()?;

    if src.is_empty() {
        return Err(MorphologyError::EmptyImage);
    }

    if iterations < 1 {
        return Err(MorphologyError::InvalidIterationCount(iterations));
    }

    Ok(())
}

// one erosion or dilation pass
fn rank_pass<T, const C: usize>(
    src: &Image<T, C>,
    offsets: &[(isize, isize)],
    extremum: Extremum,
    options: &MorphOptions<T, C>,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    let width = src.width();
    let height = src.height();
    let [row_stride, col_stride, _] = src.strides();
    let src_data = src.as_slice();
    let padding_mode = options.padding_mode;
    let border_value = options.border_value;

    let init = match extremum {
        Extremum::Min => T::max_value(),
        Extremum::Max => T::min_value(),
    };

    let mut dst_data = vec![init; src_data.len()];

    parallel::for_each_row(&mut dst_data, width * C, options.strategy, |y, dst_row| {
        for x in 0..width {
            for c in 0..C {
                let mut acc = init;
                for &(dy, dx) in offsets {
                    let sy = padding_mode.map_index(y as isize + dy, height);
                    let sx = padding_mode.map_index(x as isize + dx, width);
                    let value = match (sy, sx) {
                        (Some(sy), Some(sx)) => src_data[sy * row_stride + sx * col_stride + c],
                        _ => border_value[c],
                    };
                    acc = match extremum {
                        Extremum::Min => acc.min(value),
                        Extremum::Max => acc.max(value),
                    };
                }
                dst_row[x * C + c] = acc;
            }
        }
    })?;

    Ok(Image::new(src.size(), dst_data)?)
}

fn rank_filter<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    extremum: Extremum,
    options: &MorphOptions<T, C>,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    validate_inputs(src, kernel, options.iterations)?;

    let offsets = kernel.active_offsets();

    let mut dst = rank_pass(src, &offsets, extremum, options)?;
    for _ in 1..options.iterations {
        dst = rank_pass(&dst, &offsets, extremum, options)?;
    }

    Ok(dst)
}

/// Erode an image using a [`Kernel`] and explicit [`MorphOptions`].
///
/// Each output pixel is the minimum over the input pixels covered by the active
/// kernel cells when the kernel anchor sits on that pixel. The pass is repeated
/// `options.iterations` times, each pass reading the previous output.
///
/// # Errors
///
/// [`MorphologyError::InvalidKernel`], [`MorphologyError::EmptyImage`] or
/// [`MorphologyError::InvalidIterationCount`] when the inputs are rejected.
pub fn erode_with_options<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    options: &MorphOptions<T, C>,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    log::debug!(
        "erode {}x{} kernel over {} ({} iterations, {:?})",
        kernel.width(),
        kernel.height(),
        src.size(),
        options.iterations,
        options.padding_mode
    );
    rank_filter(src, kernel, Extremum::Min, options)
}

/// Dilate an image using a [`Kernel`] and explicit [`MorphOptions`].
///
/// Each output pixel is the maximum over the input pixels covered by the active
/// kernel cells when the kernel anchor sits on that pixel.
///
/// # Errors
///
/// Same as [`erode_with_options`].
pub fn dilate_with_options<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    options: &MorphOptions<T, C>,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    log::debug!(
        "dilate {}x{} kernel over {} ({} iterations, {:?})",
        kernel.width(),
        kernel.height(),
        src.size(),
        options.iterations,
        options.padding_mode
    );
    rank_filter(src, kernel, Extremum::Max, options)
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks bright regions in the image. Pixels outside the image are
/// read as zero, so foreground touching the border is eroded away there.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `iterations` - How many times to apply the erosion (>= 1).
///
/// # Examples
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::morphology::{erode, Kernel, KernelShape};
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 3, height: 3 }, 255).unwrap();
/// let kernel = Kernel::new(KernelShape::Box { size: 3 });
///
/// let eroded = erode(&image, &kernel, 1).unwrap();
/// assert_eq!(eroded.as_slice(), &[0, 0, 0, 0, 255, 0, 0, 0, 0]);
/// ```
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Default + Ord + Bounded + Send + Sync,
{
    erode_with_options(
        src,
        kernel,
        &MorphOptions::default().with_iterations(iterations),
    )
}

/// Dilate an image using a [`Kernel`].
///
/// Dilation grows bright regions in the image. Pixels outside the image are
/// read as zero, so no foreground is created from beyond the border.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `iterations` - How many times to apply the dilation (>= 1).
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<Image<T, C>, MorphologyError>
where
    T: Copy + Default + Ord + Bounded + Send + Sync,
{
    dilate_with_options(
        src,
        kernel,
        &MorphOptions::default().with_iterations(iterations),
    )
}

/// Opening: erosion followed by dilation.
///
/// Removes bright features smaller than the kernel while keeping the size of
/// larger shapes.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    morphology_ex(src, MorphOp::Open, kernel, &MorphOptions::default())
}

/// Closing: dilation followed by erosion.
///
/// Fills dark holes smaller than the kernel inside bright regions.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    morphology_ex(src, MorphOp::Close, kernel, &MorphOptions::default())
}

/// Morphological gradient: dilation minus erosion, clamped at zero.
///
/// Zero on flat regions, positive along the outline of objects.
pub fn gradient<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    morphology_ex(src, MorphOp::Gradient, kernel, &MorphOptions::default())
}

/// Top-hat: source minus its opening, clamped at zero.
///
/// Keeps bright features narrower than the kernel.
pub fn top_hat<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    morphology_ex(src, MorphOp::TopHat, kernel, &MorphOptions::default())
}

/// Black-hat: closing minus source, clamped at zero.
///
/// Keeps dark features narrower than the kernel.
pub fn black_hat<T, const C: usize>(
    src: &Image<T, C>,
    kernel: &Kernel,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    morphology_ex(src, MorphOp::BlackHat, kernel, &MorphOptions::default())
}

/// Apply any [`MorphOp`] to an image.
///
/// `options.iterations` applies to the erosion/dilation primitives: an opening
/// with `n` iterations erodes `n` times and then dilates `n` times, and the
/// residual operations are built on those n-fold primitives.
///
/// All inputs are validated before any work is done, so an error never leaves a
/// partial result behind.
///
/// # Examples
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::morphology::{morphology_ex, Kernel, KernelShape, MorphOp, MorphOptions};
///
/// // a single bright speck on a dark background
/// let mut data = vec![0u8; 25];
/// data[12] = 255;
/// let image = Image::<u8, 1>::new(ImageSize { width: 5, height: 5 }, data).unwrap();
/// let kernel = Kernel::new(KernelShape::Box { size: 3 });
///
/// let opened = morphology_ex(&image, MorphOp::Open, &kernel, &MorphOptions::default()).unwrap();
/// assert!(opened.as_slice().iter().all(|&v| v == 0));
///
/// let tophat = morphology_ex(&image, MorphOp::TopHat, &kernel, &MorphOptions::default()).unwrap();
/// assert_eq!(tophat, image);
/// ```
pub fn morphology_ex<T, const C: usize>(
    src: &Image<T, C>,
    op: MorphOp,
    kernel: &Kernel,
    options: &MorphOptions<T, C>,
) -> Result<Image<T, C>, MorphologyError>
where
    T: PrimInt + Default + Send + Sync,
{
    validate_inputs(src, kernel, options.iterations)?;

    log::debug!("morphology_ex {op} over {}", src.size());

    let dst = match op {
        MorphOp::Erode => erode_with_options(src, kernel, options)?,
        MorphOp::Dilate => dilate_with_options(src, kernel, options)?,
        MorphOp::Open => {
            let eroded = erode_with_options(src, kernel, options)?;
            dilate_with_options(&eroded, kernel, options)?
        }
        MorphOp::Close => {
            let dilated = dilate_with_options(src, kernel, options)?;
            erode_with_options(&dilated, kernel, options)?
        }
        MorphOp::Gradient => {
            let dilated = dilate_with_options(src, kernel, options)?;
            let eroded = erode_with_options(src, kernel, options)?;
            subtract_saturating(&dilated, &eroded)?
        }
        MorphOp::TopHat => {
            let opened = morphology_ex(src, MorphOp::Open, kernel, options)?;
            subtract_saturating(src, &opened)?
        }
        MorphOp::BlackHat => {
            let closed = morphology_ex(src, MorphOp::Close, kernel, options)?;
            subtract_saturating(&closed, src)?
        }
    };

    Ok(dst)
}
