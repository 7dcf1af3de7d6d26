//! Edit script command.
//!
//! Replays a JSON array of edit commands against the source function the
//! same way an interactive host would, then saves the active entry.
//! Loaded files are read-only, so they are duplicated before the script runs.

use crate::EditArgs;
use anyhow::{Context, Result};
use tfn_core::{
    EditCommand, EditOutcome, EditorConfig, Origin, PalettePublisher, TransferFunctionCollection,
    command,
};
use tfn_io::SaveOptions;

pub fn run(args: EditArgs, config: &EditorConfig) -> Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script: {}", args.script.display()))?;
    let script: Vec<EditCommand> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid edit script: {}", args.script.display()))?;

    let mut collection = TransferFunctionCollection::with_presets(config.default_preset);
    match &args.source.input {
        Some(path) => {
            tfn_io::load_into(&mut collection, path)
                .with_context(|| format!("Failed to load: {}", path.display()))?;
            collection.duplicate_active();
        }
        None => {
            let tfn = super::resolve(&args.source)?;
            let index = collection.push(tfn, true, Origin::Copy);
            collection.select(index)?;
        }
    }

    let publisher = PalettePublisher::new(config.num_samples, config.sample_spacing);
    publisher.publish_active(&mut collection)?;

    let mut applied = 0;
    for (i, cmd) in script.iter().enumerate() {
        match command::apply(&mut collection, cmd)
            .with_context(|| format!("Edit {i} failed: {cmd:?}"))?
        {
            EditOutcome::Applied { .. } => applied += 1,
            EditOutcome::Ignored => tracing::warn!("edit {i} had no effect: {cmd:?}"),
        }
        publisher.publish_active(&mut collection)?;
    }
    tracing::debug!("palette generation {}", publisher.generation());

    let options = SaveOptions {
        color_resolution: config.save_color_resolution,
    };
    super::save_function(&args.output, collection.active(), &options)?;
    println!(
        "applied {applied}/{} edits -> {}",
        script.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Source;
    use tempfile::TempDir;

    #[test]
    fn test_script_edits_preset_and_saves() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("edits.json");
        std::fs::write(
            &script,
            r#"[
                {"type": "InsertColor", "data": {"position": 0.55}},
                {"type": "RemoveColor", "data": {"index": 0}},
                {"type": "SetColor", "data": {"index": 1, "rgb": [1, 0, 0]}}
            ]"#,
        )
        .unwrap();
        let output = dir.path().join("out.json");

        run(
            EditArgs {
                source: Source {
                    input: None,
                    preset: Some("jet".into()),
                },
                script,
                output: output.clone(),
            },
            &EditorConfig::default(),
        )
        .unwrap();

        let tfn = tfn_io::load(&output).unwrap().into_transfer_function().unwrap();
        assert_eq!(tfn.color().len(), 8);
        assert_eq!(tfn.color().get(1).unwrap().rgb, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_loaded_file_is_edited_as_copy() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.tfn");
        tfn_io::save(&input, &tfn_core::Preset::BlueRed.build(), &SaveOptions::default())
            .unwrap();
        let script = dir.path().join("edits.json");
        std::fs::write(
            &script,
            r#"[{"type": "InsertOpacity", "data": {"position": 0.5, "alpha": 0.1}}]"#,
        )
        .unwrap();
        let output = dir.path().join("out.json");

        run(
            EditArgs {
                source: Source {
                    input: Some(input),
                    preset: None,
                },
                script,
                output: output.clone(),
            },
            &EditorConfig::default(),
        )
        .unwrap();

        let tfn = tfn_io::load(&output).unwrap().into_transfer_function().unwrap();
        assert_eq!(tfn.name(), "Blue Red (copy)");
        assert_eq!(tfn.opacity().len(), 3);
    }
}
