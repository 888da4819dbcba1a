use num_traits::Zero;

use morpho_image::{Image, ImageError};

use crate::parallel;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The value to use when the input value is greater than the threshold.
///
/// # Returns
///
/// A new image where every sample is either `max_value` or zero.
///
/// # Examples
///
/// ```
/// use morpho_image::{Image, ImageSize};
/// use morpho_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let thresholded = threshold_binary(&image, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    let mut dst = Image::from_size_val(src.size(), T::zero())?;

    parallel::par_iter_rows_val(src, &mut dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(dst)
}
