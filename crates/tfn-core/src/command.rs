//! Edit commands sent by a UI host.
//!
//! Hosts that talk to the model over a message channel serialize these as
//! JSON (`{"type": "InsertColor", "data": {"position": 0.5}}`). All commands
//! except `Select` and `DuplicateActive` act on the active function and fail
//! with `ReadOnly` when it is a loaded file.

use serde::{Deserialize, Serialize};

use crate::collection::TransferFunctionCollection;
use crate::error::Result;
use crate::sequence::EditOutcome;

/// A single point-level edit or selection change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditCommand {
    /// Make another collection entry active.
    Select { index: usize },

    /// Add a color knot whose value lies on the current curve.
    InsertColor { position: f32 },

    /// Add an opacity knot with an explicit alpha.
    InsertOpacity { position: f32, alpha: f32 },

    RemoveColor { index: usize },

    RemoveOpacity { index: usize },

    /// Drag a color knot; boundary knots keep their position.
    MoveColor {
        index: usize,
        position: f32,
        rgb: [f32; 3],
    },

    /// Drag an opacity knot; boundary knots keep their position.
    MoveOpacity {
        index: usize,
        position: f32,
        alpha: f32,
    },

    /// Recolor a knot from a color picker.
    SetColor { index: usize, rgb: [f32; 3] },

    /// Change a knot's alpha without moving it.
    SetOpacity { index: usize, alpha: f32 },

    /// Fork the active function into an editable copy.
    DuplicateActive,
}

/// Apply `command` to `collection`.
pub fn apply(collection: &mut TransferFunctionCollection, command: &EditCommand) -> Result<EditOutcome> {
    match *command {
        EditCommand::Select { index } => {
            collection.select(index)?;
            Ok(EditOutcome::Applied { index })
        }
        EditCommand::InsertColor { position } => collection.active_mut()?.insert_color(position),
        EditCommand::InsertOpacity { position, alpha } => {
            collection.active_mut()?.insert_opacity_with(position, alpha)
        }
        EditCommand::RemoveColor { index } => collection.active_mut()?.remove_color(index),
        EditCommand::RemoveOpacity { index } => collection.active_mut()?.remove_opacity(index),
        EditCommand::MoveColor {
            index,
            position,
            rgb,
        } => collection.active_mut()?.move_color(index, position, rgb),
        EditCommand::MoveOpacity {
            index,
            position,
            alpha,
        } => collection.active_mut()?.move_opacity(index, position, alpha),
        EditCommand::SetColor { index, rgb } => collection.active_mut()?.set_color(index, rgb),
        EditCommand::SetOpacity { index, alpha } => {
            collection.active_mut()?.set_opacity(index, alpha)
        }
        EditCommand::DuplicateActive => {
            let index = collection.duplicate_active();
            Ok(EditOutcome::Applied { index })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TfnError;
    use crate::preset::Preset;

    #[test]
    fn test_json_shape() {
        let cmd: EditCommand =
            serde_json::from_str(r#"{"type":"InsertColor","data":{"position":0.5}}"#).unwrap();
        assert_eq!(cmd, EditCommand::InsertColor { position: 0.5 });

        let json = serde_json::to_string(&EditCommand::DuplicateActive).unwrap();
        assert_eq!(json, r#"{"type":"DuplicateActive"}"#);
    }

    #[test]
    fn test_insert_and_remove_through_commands() {
        let mut collection = TransferFunctionCollection::default();
        let outcome = apply(&mut collection, &EditCommand::InsertColor { position: 0.5 }).unwrap();
        assert_eq!(outcome, EditOutcome::Applied { index: 2 });
        assert_eq!(collection.active().color().len(), 5);

        let outcome = apply(&mut collection, &EditCommand::RemoveColor { index: 0 }).unwrap();
        assert_eq!(outcome, EditOutcome::Ignored);

        apply(&mut collection, &EditCommand::RemoveColor { index: 2 }).unwrap();
        assert_eq!(collection.active().color().len(), 4);
    }

    #[test]
    fn test_opacity_commands() {
        let mut collection = TransferFunctionCollection::with_presets(Preset::Grayscale);
        apply(
            &mut collection,
            &EditCommand::InsertOpacity {
                position: 0.4,
                alpha: 0.9,
            },
        )
        .unwrap();
        apply(
            &mut collection,
            &EditCommand::MoveOpacity {
                index: 1,
                position: 2.0,
                alpha: 0.1,
            },
        )
        .unwrap();
        let point = collection.active().opacity().get(1).copied().unwrap();
        assert!(point.position > 0.4 && point.position < 1.0);
        assert_eq!(point.alpha, 0.1);
    }

    #[test]
    fn test_set_opacity_command() {
        let cmd: EditCommand =
            serde_json::from_str(r#"{"type":"SetOpacity","data":{"index":1,"alpha":0.3}}"#)
                .unwrap();
        let mut collection = TransferFunctionCollection::with_presets(Preset::Grayscale);
        let outcome = apply(&mut collection, &cmd).unwrap();
        assert_eq!(outcome, EditOutcome::Applied { index: 1 });
        let point = collection.active().opacity().get(1).copied().unwrap();
        assert_eq!(point.position, 1.0);
        assert_eq!(point.alpha, 0.3);

        let outcome = apply(&mut collection, &cmd).unwrap();
        assert_eq!(outcome, EditOutcome::Ignored);
    }

    #[test]
    fn test_read_only_rejects_edits_until_duplicated() {
        let mut collection = TransferFunctionCollection::default();
        collection.push_loaded(Preset::Jet.build(), "jet.tfn".into());

        let err = apply(&mut collection, &EditCommand::SetColor { index: 0, rgb: [1.0; 3] })
            .unwrap_err();
        assert!(matches!(err, TfnError::ReadOnly(_)));

        apply(&mut collection, &EditCommand::DuplicateActive).unwrap();
        let outcome =
            apply(&mut collection, &EditCommand::SetColor { index: 0, rgb: [1.0; 3] }).unwrap();
        assert!(outcome.is_applied());
    }

    #[test]
    fn test_select_command() {
        let mut collection = TransferFunctionCollection::default();
        apply(&mut collection, &EditCommand::Select { index: 3 }).unwrap();
        assert_eq!(collection.active().name(), "Cool Warm");
        assert!(apply(&mut collection, &EditCommand::Select { index: 99 }).is_err());
    }
}
