//! Preset listing command.

use anyhow::Result;
use tfn_core::Preset;

pub fn run() -> Result<()> {
    for preset in Preset::ALL {
        let tfn = preset.build();
        println!(
            "{:<10} {:>3} colors  {:>2} opacities",
            preset.name(),
            tfn.color().len(),
            tfn.opacity().len()
        );
    }
    Ok(())
}
