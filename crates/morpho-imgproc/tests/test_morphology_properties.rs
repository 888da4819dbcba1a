use morpho_image::{Image, ImageSize};
use morpho_imgproc::arithmetic::{bitwise_not, subtract_saturating};
use morpho_imgproc::morphology::{
    close, dilate, dilate_with_options, erode, erode_with_options, gradient, morphology_ex, open,
    Kernel, KernelShape, MorphOp, MorphOptions, MorphologyError,
};
use morpho_imgproc::padding::PaddingMode;
use morpho_imgproc::parallel::ExecutionStrategy;
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIZES: [(usize, usize); 5] = [(1, 1), (7, 3), (3, 9), (16, 16), (31, 12)];

fn random_gray(rng: &mut StdRng, width: usize, height: usize) -> Image<u8, 1> {
    let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
    Image::new(ImageSize { width, height }, data).unwrap()
}

fn random_binary(rng: &mut StdRng, width: usize, height: usize) -> Image<u8, 1> {
    let data = (0..width * height)
        .map(|_| if rng.random_bool(0.4) { 255 } else { 0 })
        .collect();
    Image::new(ImageSize { width, height }, data).unwrap()
}

fn random_images(seed: u64) -> Vec<Image<u8, 1>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut images = Vec::new();
    for (width, height) in SIZES {
        images.push(random_gray(&mut rng, width, height));
        images.push(random_binary(&mut rng, width, height));
    }
    images
}

// symmetric about their anchor
fn symmetric_kernels() -> Vec<Kernel> {
    vec![
        Kernel::new(KernelShape::Box { size: 3 }),
        Kernel::new(KernelShape::Box { size: 5 }),
        Kernel::new(KernelShape::Cross { size: 3 }),
        Kernel::new(KernelShape::Cross { size: 5 }),
        Kernel::new(KernelShape::Ellipse {
            width: 5,
            height: 5,
        }),
        Kernel::new(KernelShape::Rect {
            width: 5,
            height: 1,
        }),
    ]
}

// every kernel here covers its anchor
fn anchored_kernels() -> Vec<Kernel> {
    let mut kernels = symmetric_kernels();
    kernels.push(Kernel::new(KernelShape::Rect {
        width: 4,
        height: 2,
    }));
    kernels.push(Kernel::from_data(3, 3, vec![1, 0, 0, 1, 0, 0, 1, 1, 1]).with_anchor(2, 0));
    kernels
}

fn assert_all(
    a: &Image<u8, 1>,
    b: &Image<u8, 1>,
    pred: impl Fn(u8, u8) -> bool,
    what: &str,
) {
    assert_eq!(a.size(), b.size());
    for (i, (&va, &vb)) in a.as_slice().iter().zip(b.as_slice()).enumerate() {
        assert!(pred(va, vb), "{what} violated at index {i}: {va} vs {vb}");
    }
}

#[test]
fn erosion_is_below_and_dilation_above_the_source() -> Result<(), MorphologyError> {
    for image in random_images(7) {
        for kernel in anchored_kernels() {
            assert!(kernel.contains_anchor());
            let eroded = erode(&image, &kernel, 1)?;
            let dilated = dilate(&image, &kernel, 1)?;
            assert_all(&eroded, &image, |e, s| e <= s, "erode <= src");
            assert_all(&dilated, &image, |d, s| d >= s, "dilate >= src");
        }
    }
    Ok(())
}

#[test]
fn repeated_erosion_keeps_shrinking() -> Result<(), MorphologyError> {
    let kernel = Kernel::new(KernelShape::Box { size: 3 });
    for image in random_images(11) {
        let once = erode(&image, &kernel, 1)?;
        let twice = erode(&image, &kernel, 2)?;
        assert_eq!(twice, erode(&once, &kernel, 1)?);
        assert_all(&twice, &once, |t, o| t <= o, "erode^2 <= erode");
    }
    Ok(())
}

#[test]
fn opening_and_closing_are_idempotent() -> Result<(), MorphologyError> {
    for image in random_images(23) {
        for kernel in symmetric_kernels() {
            let opened = open(&image, &kernel)?;
            assert_eq!(open(&opened, &kernel)?, opened);

            let closed = close(&image, &kernel)?;
            assert_eq!(close(&closed, &kernel)?, closed);
        }
    }
    Ok(())
}

#[test]
fn idempotence_requires_a_kernel_symmetric_about_its_anchor() -> Result<(), MorphologyError> {
    let (width, height) = (10, 10);
    let data = (0..width * height).map(|i| (i % width) as u8 * 25).collect();
    let ramp = Image::<u8, 1>::new(ImageSize { width, height }, data)?;

    for size in [3, 5] {
        let kernel = Kernel::new(KernelShape::Box { size });
        let opened = open(&ramp, &kernel)?;
        assert_eq!(open(&opened, &kernel)?, opened);
        let closed = close(&ramp, &kernel)?;
        assert_eq!(close(&closed, &kernel)?, closed);
    }

    // an even box puts its anchor off center, so a second pass keeps shifting the ramp
    let kernel = Kernel::new(KernelShape::Box { size: 4 });
    let opened = open(&ramp, &kernel)?;
    assert_ne!(open(&opened, &kernel)?, opened);
    let closed = close(&ramp, &kernel)?;
    assert_ne!(close(&closed, &kernel)?, closed);

    Ok(())
}

#[test]
fn opening_is_anti_extensive_and_closing_extensive() -> Result<(), MorphologyError> {
    for image in random_images(29) {
        for kernel in symmetric_kernels() {
            let opened = open(&image, &kernel)?;
            assert_all(&opened, &image, |o, s| o <= s, "open <= src");

            let closed = close(&image, &kernel)?;
            // the zero border erodes the closing back to background along the edge,
            // so the bound only holds where the kernel stays inside the image
            let (ay, ax) = kernel.anchor();
            let (below, right) = (kernel.height() - 1 - ay, kernel.width() - 1 - ax);
            for y in ay..image.height().saturating_sub(below) {
                for x in ax..image.width().saturating_sub(right) {
                    assert!(closed.get_pixel(x, y, 0)? >= image.get_pixel(x, y, 0)?);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn dilation_is_dual_to_erosion_of_the_complement() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(31);
    for (width, height) in SIZES {
        let image = random_binary(&mut rng, width, height);
        let complement = bitwise_not(&image)?;
        for kernel in anchored_kernels() {
            let dilated = dilate(&image, &kernel, 1)?;

            // the background of the complement is foreground
            let options = MorphOptions::default().with_padding(PaddingMode::Constant, [255]);
            let eroded_complement = erode_with_options(&complement, &kernel, &options)?;

            assert_eq!(dilated, bitwise_not(&eroded_complement)?);
        }
    }
    Ok(())
}

#[test]
fn dilation_with_reflected_kernel_opens_any_kernel() -> Result<(), MorphologyError> {
    let kernel = Kernel::from_data(3, 2, vec![1, 1, 0, 0, 1, 1]).with_anchor(0, 0);
    let reflected = kernel.reflected();
    for image in random_images(37) {
        let eroded = erode(&image, &kernel, 1)?;
        let opened = dilate(&eroded, &reflected, 1)?;
        assert_all(&opened, &image, |o, s| o <= s, "adjoint opening <= src");
    }
    Ok(())
}

#[test]
fn gradient_vanishes_on_flat_regions() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(41);
    let (width, height) = (24, 20);
    let mut image = random_gray(&mut rng, width, height);
    let (x0, y0, side) = (6usize, 5usize, 10usize);
    {
        let data = image.as_slice_mut();
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                data[y * width + x] = 77;
            }
        }
    }

    for size in [3usize, 5] {
        let kernel = Kernel::new(KernelShape::Box { size });
        let grad = gradient(&image, &kernel)?;
        let r = size / 2;
        for y in y0 + r..y0 + side - r {
            for x in x0 + r..x0 + side - r {
                assert_eq!(*grad.get_pixel(x, y, 0)?, 0, "gradient at ({x}, {y})");
            }
        }
    }
    Ok(())
}

#[test]
fn morphology_ex_matches_explicit_composition() -> Result<(), MorphologyError> {
    let kernel = Kernel::new(KernelShape::Ellipse {
        width: 5,
        height: 5,
    });
    for image in random_images(43) {
        for iterations in [1usize, 2] {
            let options = MorphOptions::default().with_iterations(iterations);
            let eroded = erode_with_options(&image, &kernel, &options)?;
            let dilated = dilate_with_options(&image, &kernel, &options)?;
            let opened = dilate_with_options(&eroded, &kernel, &options)?;
            let closed = erode_with_options(&dilated, &kernel, &options)?;

            for op in MorphOp::ALL {
                let expected = match op {
                    MorphOp::Erode => eroded.clone(),
                    MorphOp::Dilate => dilated.clone(),
                    MorphOp::Open => opened.clone(),
                    MorphOp::Close => closed.clone(),
                    MorphOp::Gradient => subtract_saturating(&dilated, &eroded)?,
                    MorphOp::TopHat => subtract_saturating(&image, &opened)?,
                    MorphOp::BlackHat => subtract_saturating(&closed, &image)?,
                };
                let actual = morphology_ex(&image, op, &kernel, &options)?;
                assert_eq!(actual, expected, "{op} with {iterations} iterations");
            }
        }
    }
    Ok(())
}

#[test]
fn execution_strategies_agree() -> Result<(), MorphologyError> {
    let kernel = Kernel::new(KernelShape::Cross { size: 5 });
    for image in random_images(53) {
        for op in MorphOp::ALL {
            let serial = morphology_ex(
                &image,
                op,
                &kernel,
                &MorphOptions::default().with_strategy(ExecutionStrategy::Serial),
            )?;
            for strategy in [ExecutionStrategy::ParallelRows, ExecutionStrategy::Fixed(3)] {
                let other = morphology_ex(
                    &image,
                    op,
                    &kernel,
                    &MorphOptions::default().with_strategy(strategy),
                )?;
                assert_eq!(other, serial, "{op} with {strategy:?}");
            }
        }
    }
    Ok(())
}

#[test]
fn inputs_are_left_untouched() -> Result<(), MorphologyError> {
    let mut rng = StdRng::seed_from_u64(59);
    let image = random_gray(&mut rng, 9, 9);
    let copy = image.clone();
    let kernel = Kernel::new(KernelShape::Box { size: 3 });
    for op in MorphOp::ALL {
        morphology_ex(&image, op, &kernel, &MorphOptions::default())?;
    }
    assert_eq!(image, copy);
    Ok(())
}
