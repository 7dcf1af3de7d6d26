//! Palette baking command.
//!
//! Output format follows the extension:
//! - `.png`: `N × height` RGBA8 strip
//! - `.json`: array of `[r, g, b, a]` float samples
//! - `.raw`: native-endian `f32` RGBA, `16 × N` bytes

use crate::BakeArgs;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tfn_core::{EditorConfig, Linear2DTable, Palette, SampleSpacing, evaluate};

pub fn run(args: BakeArgs, config: &EditorConfig) -> Result<()> {
    let tfn = super::resolve(&args.source)?;
    let samples = args.samples.unwrap_or(config.num_samples);
    let spacing = args
        .spacing
        .map(SampleSpacing::from)
        .unwrap_or(config.sample_spacing);

    let palette = evaluate(&tfn, samples, spacing)
        .with_context(|| format!("Failed to sample '{}'", tfn.name()))?;
    write_palette(&palette, args.height, &args.output)?;
    println!(
        "baked '{}' ({samples} samples) -> {}",
        tfn.name(),
        args.output.display()
    );

    if args.pre_integrate {
        let path = pre_integration_path(&args.output);
        let table = Linear2DTable::from_palette(&palette)?.with_pre_integration(true);
        if let Some(pre) = table.pre_integrated(0.0) {
            tfn_io::write_pre_integration_png(&pre, &path)
                .with_context(|| format!("Failed to save: {}", path.display()))?;
            println!("pre-integration table -> {}", path.display());
        }
    }
    Ok(())
}

fn write_palette(palette: &Palette, height: u32, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => tfn_io::write_palette_png(palette, height, path)?,
        Some("json") => std::fs::write(path, serde_json::to_vec(palette.samples())?)?,
        Some("raw") => std::fs::write(path, palette.as_bytes())?,
        _ => bail!(
            "unsupported palette output '{}' (use .png, .json or .raw)",
            path.display()
        ),
    }
    Ok(())
}

/// `out.png` -> `out.preint.png`
fn pre_integration_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "palette".into());
    output.with_file_name(format!("{stem}.preint.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;
    use tempfile::TempDir;

    fn args(dir: &TempDir, output: &str) -> BakeArgs {
        BakeArgs {
            source: Source {
                input: None,
                preset: Some("grayscale".into()),
            },
            samples: Some(4),
            spacing: None,
            output: dir.path().join(output),
            height: 2,
            pre_integrate: false,
        }
    }

    #[test]
    fn test_bake_json_uses_config_spacing() {
        let dir = TempDir::new().unwrap();
        let a = args(&dir, "gray.json");
        let out = a.output.clone();
        run(a, &EditorConfig::default()).unwrap();

        let samples: Vec<[f32; 4]> =
            serde_json::from_slice(&std::fs::read(out).unwrap()).unwrap();
        let alpha: Vec<f32> = samples.iter().map(|s| s[3]).collect();
        assert_eq!(alpha.len(), 4);
        assert_eq!(alpha[0], 0.0);
        assert!((alpha[1] - 1.0 / 3.0).abs() < 1e-5);
        assert_eq!(alpha[3], 1.0);
    }

    #[test]
    fn test_bake_raw_is_sixteen_bytes_per_sample() {
        let dir = TempDir::new().unwrap();
        let a = args(&dir, "gray.raw");
        let out = a.output.clone();
        run(a, &EditorConfig::default()).unwrap();
        assert_eq!(std::fs::read(out).unwrap().len(), 4 * 16);
    }

    #[test]
    fn test_bake_png_with_pre_integration() {
        let dir = TempDir::new().unwrap();
        let mut a = args(&dir, "gray.png");
        a.pre_integrate = true;
        run(a, &EditorConfig::default()).unwrap();
        assert!(dir.path().join("gray.png").exists());
        assert!(dir.path().join("gray.preint.png").exists());
    }

    #[test]
    fn test_bake_rejects_unknown_output() {
        let dir = TempDir::new().unwrap();
        assert!(run(args(&dir, "gray.bmp"), &EditorConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_preset_lists_known_names() {
        let dir = TempDir::new().unwrap();
        let mut a = args(&dir, "x.png");
        a.source.preset = Some("viridis".into());
        let err = run(a, &EditorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Cool Warm"));
    }
}
