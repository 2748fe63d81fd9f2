use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use superres_core::io::image_io::load_raster;
use superres_core::pipeline::default_upscale_factor;

#[derive(Args)]
pub struct InfoArgs {
    /// Input images
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut reference_dims = None;
    let mut mismatched = 0usize;

    for path in &args.files {
        let raster =
            load_raster(path).with_context(|| format!("Failed to decode {}", path.display()))?;
        let dims = raster.dimensions();
        let note = match reference_dims {
            None => {
                reference_dims = Some(dims);
                " (reference)"
            }
            Some(r) if r != dims => {
                mismatched += 1;
                " (size mismatch)"
            }
            Some(_) => "",
        };
        println!("{}: {}x{}{}", path.display(), dims.0, dims.1, note);
    }

    let count = args.files.len();
    let factor = default_upscale_factor(count);
    println!();
    println!("Frames:      {}", count);
    println!("Scale:       {}x", factor);
    if let Some((w, h)) = reference_dims {
        println!(
            "Output:      {}x{}",
            w * factor as usize,
            h * factor as usize
        );
    }
    if mismatched > 0 {
        println!(
            "Warning:     {} frame(s) differ in size from the reference and will be rejected",
            mismatched
        );
    }

    Ok(())
}
