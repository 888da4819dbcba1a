use super::MorphologyError;

/// Shapes of morphological [`Kernel`]s.
///
/// Defines the geometry of the structuring element used in morphological operations.
/// Kernels built from a shape are anchored at their geometric center.
///
/// Parsing a shape from a string (`"box"`, `"cross"`, `"ellipse"`) only selects
/// the geometry: every dimension is 0, which [`Kernel::validate`] rejects as
/// [`MorphologyError::InvalidKernel`]. Call [`KernelShape::with_size`] before
/// building the kernel.
///
/// ```
/// use morpho_imgproc::morphology::{Kernel, KernelShape};
///
/// let shape: KernelShape = "cross".parse().unwrap();
/// assert!(Kernel::new(shape).validate().is_err());
///
/// let kernel = Kernel::new(shape.with_size(3));
/// assert!(kernel.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A square box structuring element.
    ///
    /// All pixels within the box are included in the morphological operation.
    Box {
        /// The side length of the square kernel (size x size).
        size: usize,
    },

    /// A rectangular structuring element with independent sides.
    Rect {
        /// The number of columns of the kernel.
        width: usize,
        /// The number of rows of the kernel.
        height: usize,
    },

    /// A cross (plus) shaped structuring element.
    ///
    /// Only pixels along the horizontal and vertical center lines are included,
    /// forming a plus/cross pattern.
    Cross {
        /// The side length of the square cross kernel (size x size).
        size: usize,
    },

    /// An ellipse (or circle) shaped structuring element inscribed in the kernel box.
    Ellipse {
        /// The width of the ellipse.
        width: usize,
        /// The height of the ellipse.
        height: usize,
    },
}

impl std::str::FromStr for KernelShape {
    type Err = String;

    /// Parse `box`, `cross` or `ellipse` into a shape of size 0.
    ///
    /// The result is not a usable kernel until [`KernelShape::with_size`] sets its size.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "box" | "rect" => Ok(KernelShape::Box { size: 0 }),
            "cross" => Ok(KernelShape::Cross { size: 0 }),
            "ellipse" => Ok(KernelShape::Ellipse {
                width: 0,
                height: 0,
            }),
            other => Err(format!("unknown kernel shape: {other}")),
        }
    }
}

impl KernelShape {
    /// Returns the same shape resized to a square of side `size`.
    pub fn with_size(self, size: usize) -> Self {
        match self {
            KernelShape::Box { .. } | KernelShape::Rect { .. } => KernelShape::Box { size },
            KernelShape::Cross { .. } => KernelShape::Cross { size },
            KernelShape::Ellipse { .. } => KernelShape::Ellipse {
                width: size,
                height: size,
            },
        }
    }
}

/// A morphological structuring element.
///
/// The kernel stores a binary mask where 1 marks pixels included in the
/// neighbourhood and 0 marks excluded pixels, plus the anchor cell that is
/// placed over the output pixel.
///
/// Construction never fails. The invariants (non-zero dimensions, matching
/// data length, anchor inside the kernel) are checked by [`Kernel::validate`],
/// which every morphological operation calls before doing any work.
///
/// # Example
///
/// ```rust
/// use morpho_imgproc::morphology::{Kernel, KernelShape};
///
/// // Create a 3x3 box kernel
/// let kernel = Kernel::new(KernelShape::Box { size: 3 });
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.anchor(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    width: usize,
    height: usize,
    anchor: (usize, usize),
}

impl Kernel {
    /// Create a morphological kernel from a shape.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the kernel.
    ///
    /// # Returns
    ///
    /// A [`Kernel`] anchored at `(height / 2, width / 2)`.
    pub fn new(shape: KernelShape) -> Self {
        match shape {
            KernelShape::Box { size } => rect_kernel(size, size),
            KernelShape::Rect { width, height } => rect_kernel(width, height),
            KernelShape::Cross { size } => cross_kernel(size),
            KernelShape::Ellipse { width, height } => ellipse_kernel(width, height),
        }
    }

    /// Create a kernel from a row-major mask; any non-zero value marks an active cell.
    ///
    /// # Example
    ///
    /// ```rust
    /// use morpho_imgproc::morphology::Kernel;
    ///
    /// let kernel = Kernel::from_data(2, 1, vec![1, 1]);
    /// assert_eq!(kernel.anchor(), (0, 1));
    /// assert!(kernel.validate().is_ok());
    /// ```
    pub fn from_data(width: usize, height: usize, data: Vec<u8>) -> Self {
        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();
        Kernel {
            data,
            width,
            height,
            anchor: (height / 2, width / 2),
        }
    }

    /// Move the anchor to `(row, col)`.
    pub fn with_anchor(mut self, row: usize, col: usize) -> Self {
        self.anchor = (row, col);
        self
    }

    /// Get a reference to the kernel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the anchor as `(row, col)`.
    pub fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    /// Returns true if the cell under the anchor takes part in the neighbourhood.
    pub fn contains_anchor(&self) -> bool {
        let (ay, ax) = self.anchor;
        ay < self.height && ax < self.width && self.data.get(ay * self.width + ax) == Some(&1)
    }

    /// Check the kernel invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidKernel`] when a dimension is zero, the data
    /// length does not match the dimensions, or the anchor lies outside the kernel.
    pub fn validate(&self) -> Result<(), MorphologyError> {
        if self.width == 0 || self.height == 0 {
            return Err(MorphologyError::InvalidKernel(format!(
                "kernel dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.data.len() != self.width * self.height {
            return Err(MorphologyError::InvalidKernel(format!(
                "kernel data has {} elements, expected {}",
                self.data.len(),
                self.width * self.height
            )));
        }

        let (ay, ax) = self.anchor;
        if ay >= self.height || ax >= self.width {
            return Err(MorphologyError::InvalidKernel(format!(
                "anchor ({ay}, {ax}) is outside a {}x{} kernel",
                self.width, self.height
            )));
        }

        Ok(())
    }

    /// Returns the kernel reflected through its anchor.
    ///
    /// Both the mask and the anchor are rotated by 180 degrees, so an offset
    /// `(dy, dx)` of this kernel becomes `(-dy, -dx)` in the result.
    pub fn reflected(&self) -> Self {
        let data = self.data.iter().rev().copied().collect();
        let (ay, ax) = self.anchor;
        Kernel {
            data,
            width: self.width,
            height: self.height,
            anchor: (
                self.height.saturating_sub(1 + ay),
                self.width.saturating_sub(1 + ax),
            ),
        }
    }

    /// Offsets `(dy, dx)` of the active cells relative to the anchor.
    pub(crate) fn active_offsets(&self) -> Vec<(isize, isize)> {
        let (ay, ax) = (self.anchor.0 as isize, self.anchor.1 as isize);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1)
            .map(|(i, _)| {
                let kh = (i / self.width) as isize;
                let kw = (i % self.width) as isize;
                (kh - ay, kw - ax)
            })
            .collect()
    }
}

fn rect_kernel(width: usize, height: usize) -> Kernel {
    Kernel {
        data: vec![1u8; width * height],
        width,
        height,
        anchor: (height / 2, width / 2),
    }
}

fn cross_kernel(size: usize) -> Kernel {
    let mut data = vec![0u8; size * size];
    let mid = size / 2;

    for i in 0..size {
        data[mid * size + i] = 1;
        data[i * size + mid] = 1;
    }

    Kernel {
        data,
        width: size,
        height: size,
        anchor: (mid, mid),
    }
}

// each row spans the chord of the ellipse through that row
fn ellipse_kernel(width: usize, height: usize) -> Kernel {
    let mut data = vec![0u8; width * height];
    let r = (height / 2) as isize;
    let c = (width / 2) as isize;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    for i in 0..height {
        let dy = i as isize - r;
        if dy.abs() > r {
            continue;
        }
        let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
        let j1 = (c - dx).max(0) as usize;
        let j2 = ((c + dx + 1) as usize).min(width);
        for j in j1..j2 {
            data[i * width + j] = 1;
        }
    }

    Kernel {
        data,
        width,
        height,
        anchor: (height / 2, width / 2),
    }
}
