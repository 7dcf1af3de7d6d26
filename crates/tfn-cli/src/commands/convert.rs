//! Format conversion command.

use crate::ConvertArgs;
use anyhow::Result;
use tfn_core::EditorConfig;
use tfn_io::SaveOptions;

pub fn run(args: ConvertArgs, config: &EditorConfig) -> Result<()> {
    let tfn = super::load_function(&args.input)?;
    let options = SaveOptions {
        color_resolution: config.save_color_resolution,
    };
    super::save_function(&args.output, &tfn, &options)?;
    println!("{} -> {}", args.input.display(), args.output.display());
    Ok(())
}
