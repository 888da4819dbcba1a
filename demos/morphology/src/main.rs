use argh::FromArgs;
use std::path::PathBuf;

use morpho::{
    image::Image,
    imgproc::{
        arithmetic,
        morphology::{self, Kernel, KernelShape, MorphOp, MorphOptions},
        padding::PaddingMode,
        threshold,
    },
    io::{functional as F, png},
};

#[derive(FromArgs)]
/// Binarize an image and apply every morphological operation to it
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory where the results are written (default: morphology_out)
    #[argh(option, short = 'o', default = "PathBuf::from(\"morphology_out\")")]
    output_dir: PathBuf,

    /// kernel size (default: 5)
    #[argh(option, short = 's', default = "5")]
    kernel_size: usize,

    /// kernel shape: box, cross, ellipse (default: box)
    #[argh(option, short = 'k', default = "String::from(\"box\")")]
    kernel_shape: String,

    /// number of erosion/dilation iterations (default: 1)
    #[argh(option, short = 'n', default = "1")]
    iterations: usize,

    /// binarization threshold (default: 127)
    #[argh(option, short = 't', default = "127")]
    threshold: u8,

    /// invert the binary image so dark objects become foreground
    #[argh(switch)]
    invert: bool,

    /// border mode: constant, replicate, reflect, reflect101, wrap (default: constant)
    #[argh(option, default = "String::from(\"constant\")")]
    border: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image as grayscale and binarize it
    let gray = F::read_image_any_mono8(&args.image_path)?;
    log::info!("loaded {} ({})", args.image_path.display(), gray.size());

    let mut binary = threshold::threshold_binary(&gray, args.threshold, 255u8)?;
    if args.invert {
        binary = arithmetic::bitwise_not(&binary)?;
    }

    let shape = args.kernel_shape.parse::<KernelShape>()?;
    let kernel = Kernel::new(shape.with_size(args.kernel_size));
    let padding_mode = args.border.parse::<PaddingMode>()?;

    let options = MorphOptions::default()
        .with_iterations(args.iterations)
        .with_padding(padding_mode, [0u8]);

    std::fs::create_dir_all(&args.output_dir)?;
    png::write_image_png_mono8(args.output_dir.join("binary.png"), &binary)?;

    for op in MorphOp::ALL {
        let result = morphology::morphology_ex(&binary, op, &kernel, &options)?;

        let path = args.output_dir.join(format!("{}.png", op.name()));
        png::write_image_png_mono8(&path, &result)?;

        let nonzero = result.as_slice().iter().filter(|&&v| v > 0).count();
        log::info!("{op}: {nonzero} foreground pixels -> {}", path.display());

        if let Some(expected) = compose(&binary, op, &kernel, &options)? {
            if expected == result {
                log::info!("{op} matches its erode/dilate composition");
            } else {
                log::error!("{op} differs from its erode/dilate composition");
            }
        }
    }

    Ok(())
}

/// Rebuild a compound operation from erosions, dilations and subtractions.
fn compose(
    src: &Image<u8, 1>,
    op: MorphOp,
    kernel: &Kernel,
    options: &MorphOptions<u8, 1>,
) -> Result<Option<Image<u8, 1>>, Box<dyn std::error::Error>> {
    let erode = |img: &Image<u8, 1>| morphology::erode_with_options(img, kernel, options);
    let dilate = |img: &Image<u8, 1>| morphology::dilate_with_options(img, kernel, options);

    let image = match op {
        MorphOp::Erode | MorphOp::Dilate => return Ok(None),
        MorphOp::Open => dilate(&erode(src)?)?,
        MorphOp::Close => erode(&dilate(src)?)?,
        MorphOp::Gradient => arithmetic::subtract_saturating(&dilate(src)?, &erode(src)?)?,
        MorphOp::TopHat => arithmetic::subtract_saturating(src, &dilate(&erode(src)?)?)?,
        MorphOp::BlackHat => arithmetic::subtract_saturating(&erode(&dilate(src)?)?, src)?,
    };

    Ok(Some(image))
}
