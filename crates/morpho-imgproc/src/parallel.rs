use rayon::prelude::*;
use thiserror::Error;

use morpho_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row length must be a positive divisor of the buffer length.
    #[error("row length {0} does not evenly split a buffer of length {1}")]
    InvalidRowStride(usize, usize),
}

/// Controls how the per-row work of an operation is executed.
///
/// Every strategy produces the same output; only the scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Run `f(row_index, row)` over every `row_len`-sized chunk of `dst`.
///
/// # Arguments
///
/// * `dst` - The destination buffer, split into rows.
/// * `row_len` - The number of elements in a row (width * channels).
/// * `strategy` - How rows are scheduled.
/// * `f` - Fills one destination row given its index.
///
/// # Errors
///
/// Fails when `row_len` does not split `dst` or when a fixed pool cannot be built.
pub fn for_each_row<T, F>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 || dst.len() % row_len != 0 {
        return Err(ParallelError::InvalidRowStride(row_len, dst.len()));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
            });
        }
    }

    Ok(())
}

/// Apply a function to each pair of samples of two images in parallel.
///
/// The caller is responsible for checking that the three images share a size.
pub fn par_iter_rows_val_two<T, const C: usize>(
    src1: &Image<T, C>,
    src2: &Image<T, C>,
    dst: &mut Image<T, C>,
    f: impl Fn(&T, &T, &mut T) + Send + Sync,
) where
    T: Send + Sync,
{
    let row_len = C * src1.cols();
    if row_len == 0 {
        return;
    }

    src1.as_slice()
        .par_chunks_exact(row_len)
        .zip(src2.as_slice().par_chunks_exact(row_len))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(row_len))
        .for_each(|((src1_row, src2_row), dst_row)| {
            src1_row
                .iter()
                .zip(src2_row.iter())
                .zip(dst_row.iter_mut())
                .for_each(|((a, b), d)| f(a, b, d));
        });
}

/// Apply a function to each sample of an image in parallel.
pub fn par_iter_rows_val<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    f: impl Fn(&T, &mut T) + Send + Sync,
) where
    T: Send + Sync,
{
    let row_len = C * src.cols();
    if row_len == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(row_len)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(row_len))
        .for_each(|(src_row, dst_row)| {
            src_row
                .iter()
                .zip(dst_row.iter_mut())
                .for_each(|(s, d)| f(s, d));
        });
}
