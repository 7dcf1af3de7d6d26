//! Transfer function info command.
//!
//! Prints the curve summary of each input file; `--points` lists every knot.

use crate::InfoArgs;
use anyhow::{Context, Result};
use std::path::Path;
use tfn_io::{Format, LoadedTransferFunction};

pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        let loaded =
            tfn_io::load(path).with_context(|| format!("Failed to load: {}", path.display()))?;
        print_text(path, &loaded, args.points || verbose)?;

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn print_text(path: &Path, loaded: &LoadedTransferFunction, points: bool) -> Result<()> {
    let format = match Format::from_path(path)? {
        Format::Json => "JSON",
        Format::Binary => "binary",
    };
    println!("{}", path.display());
    println!("  Name:       {}", loaded.name);
    println!("  Format:     {format}");
    println!("  Colors:     {}", loaded.colors.len());
    println!("  Opacities:  {}", loaded.opacities.len());
    if let Some([min, max]) = loaded.data_range {
        println!("  Data range: [{min}, {max}]");
    }
    if loaded.opacity_scaling != 1.0 {
        println!("  Opacity scaling: {}", loaded.opacity_scaling);
    }

    if points {
        println!("  Color points:");
        for c in &loaded.colors {
            println!(
                "    {:.4}  #{:02x}{:02x}{:02x}",
                c.position,
                tfn_core::point::quantize_channel(c.rgb[0]),
                tfn_core::point::quantize_channel(c.rgb[1]),
                tfn_core::point::quantize_channel(c.rgb[2]),
            );
        }
        println!("  Opacity points:");
        for o in &loaded.opacities {
            println!("    {:.4}  {:.4}", o.position, o.alpha);
        }
    }
    Ok(())
}
