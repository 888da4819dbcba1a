use morpho_image::{Image, ImageError};
use num_traits::PrimInt;

use crate::parallel;

// difference through an i64 accumulator, clamped into the range of `T`
#[inline]
fn sub_clamped<T: PrimInt>(a: T, b: T) -> T {
    match (a.to_i64(), b.to_i64()) {
        (Some(a), Some(b)) => {
            let diff = a.saturating_sub(b);
            num_traits::cast::<i64, T>(diff).unwrap_or(if diff < 0 {
                T::min_value()
            } else {
                T::max_value()
            })
        }
        _ => a.saturating_sub(b),
    }
}

/// Subtract two images pixel-wise, clamping the result into the range of `T`.
///
/// For unsigned images this means negative differences become 0.
///
/// # Arguments
///
/// * `src1` - The minuend image.
/// * `src2` - The subtrahend image, with the same size as `src1`.
///
/// # Returns
///
/// A new image holding `clamp(src1 - src2)`.
///
/// # Examples
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::arithmetic::subtract_saturating;
///
/// let size = ImageSize { width: 3, height: 1 };
/// let a = Image::<u8, 1>::new(size, vec![10, 200, 0]).unwrap();
/// let b = Image::<u8, 1>::new(size, vec![20, 100, 0]).unwrap();
///
/// let diff = subtract_saturating(&a, &b).unwrap();
/// assert_eq!(diff.as_slice(), &[0, 100, 0]);
/// ```
pub fn subtract_saturating<T, const C: usize>(
    src1: &Image<T, C>,
    src2: &Image<T, C>,
) -> Result<Image<T, C>, ImageError>
where
    T: PrimInt + Send + Sync,
{
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            src2.cols(),
            src2.rows(),
        ));
    }

    let mut dst = Image::from_size_val(src1.size(), T::zero())?;

    parallel::par_iter_rows_val_two(src1, src2, &mut dst, |a, b, d| {
        *d = sub_clamped(*a, *b);
    });

    Ok(dst)
}

/// Compute the bitwise complement of an image.
///
/// For a binary `u8` raster this swaps foreground (255) and background (0).
///
/// # Examples
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::arithmetic::bitwise_not;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 255, 15]).unwrap();
/// let inverted = bitwise_not(&image).unwrap();
/// assert_eq!(inverted.as_slice(), &[255, 0, 240]);
/// ```
pub fn bitwise_not<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: PrimInt + Send + Sync,
{
    let mut dst = Image::from_size_val(src.size(), T::zero())?;
    parallel::par_iter_rows_val(src, &mut dst, |s, d| *d = !*s);
    Ok(dst)
}
