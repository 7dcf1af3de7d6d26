//! The list of available transfer functions and the active selection.
//!
//! Entries are addressed by index, resolved on every access, so growing the
//! collection never invalidates the selection. The collection only grows.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfnError};
use crate::preset::Preset;
use crate::transfer_function::TransferFunction;

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Origin {
    Preset(Preset),
    File(PathBuf),
    /// An editable duplicate of another entry.
    Copy,
}

/// One transfer function and its edit policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub function: TransferFunction,
    pub editable: bool,
    pub origin: Origin,
}

/// Ordered transfer functions with exactly one active entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunctionCollection {
    entries: Vec<Entry>,
    selection: usize,
}

impl Default for TransferFunctionCollection {
    /// All built-in presets, with [`Preset::Default`] active.
    fn default() -> Self {
        Self::with_presets(Preset::Default)
    }
}

impl TransferFunctionCollection {
    /// Every built-in preset, editable, with `active` selected.
    pub fn with_presets(active: Preset) -> Self {
        let entries: Vec<Entry> = Preset::ALL
            .iter()
            .map(|&preset| Entry {
                function: preset.build(),
                editable: true,
                origin: Origin::Preset(preset),
            })
            .collect();
        let selection = Preset::ALL
            .iter()
            .position(|&p| p == active)
            .unwrap_or_default();
        Self { entries, selection }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Make the entry at `index` active and mark it dirty so it gets re-sampled.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(TfnError::InvalidIndex { index, len })?;
        entry.function.mark_dirty();
        if self.selection != index {
            tracing::info!("selected transfer function '{}'", entry.function.name());
        }
        self.selection = index;
        Ok(())
    }

    pub fn active_entry(&self) -> &Entry {
        &self.entries[self.selection]
    }

    pub fn active(&self) -> &TransferFunction {
        &self.active_entry().function
    }

    pub fn is_active_editable(&self) -> bool {
        self.active_entry().editable
    }

    /// Mutable access to the active function; fails for read-only entries.
    pub fn active_mut(&mut self) -> Result<&mut TransferFunction> {
        let entry = &mut self.entries[self.selection];
        if !entry.editable {
            tracing::warn!(
                "refusing to edit read-only transfer function '{}'",
                entry.function.name()
            );
            return Err(TfnError::ReadOnly(entry.function.name().to_string()));
        }
        Ok(&mut entry.function)
    }

    /// Return and clear the active function's dirty flag. Allowed on read-only
    /// entries since it leaves the curves untouched.
    pub fn take_active_dirty(&mut self) -> bool {
        self.entries[self.selection].function.take_dirty()
    }

    /// Append an entry and return its index. Does not change the selection.
    pub fn push(&mut self, function: TransferFunction, editable: bool, origin: Origin) -> usize {
        tracing::debug!(
            "added transfer function '{}' (editable: {editable})",
            function.name()
        );
        self.entries.push(Entry {
            function,
            editable,
            origin,
        });
        self.entries.len() - 1
    }

    /// Append a function loaded from `path` as read-only and select it.
    pub fn push_loaded(&mut self, function: TransferFunction, path: PathBuf) -> usize {
        let index = self.push(function, false, Origin::File(path));
        self.selection = index;
        tracing::info!(
            "loaded transfer function '{}' is now active (read-only)",
            self.active().name()
        );
        index
    }

    /// Append an editable copy of the active function and select it.
    pub fn duplicate_active(&mut self) -> usize {
        let mut function = self.active().clone();
        let name = format!("{} (copy)", function.name());
        function.set_name(name);
        function.mark_dirty();
        let index = self.push(function, true, Origin::Copy);
        self.selection = index;
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collection_has_every_preset() {
        let collection = TransferFunctionCollection::default();
        assert_eq!(collection.len(), Preset::ALL.len());
        assert_eq!(collection.selection(), 0);
        assert_eq!(collection.active().name(), "Default");
        assert!(collection.is_active_editable());
    }

    #[test]
    fn test_with_presets_selects_requested() {
        let collection = TransferFunctionCollection::with_presets(Preset::CoolWarm);
        assert_eq!(collection.active().name(), "Cool Warm");
    }

    #[test]
    fn test_select_out_of_range() {
        let mut collection = TransferFunctionCollection::default();
        let err = collection.select(42).unwrap_err();
        assert!(matches!(err, TfnError::InvalidIndex { index: 42, .. }));
        assert_eq!(collection.selection(), 0);
    }

    #[test]
    fn test_loaded_entries_are_read_only() {
        let mut collection = TransferFunctionCollection::default();
        let index = collection.push_loaded(Preset::Jet.build(), PathBuf::from("jet.tfn"));
        assert_eq!(collection.selection(), index);
        assert!(!collection.is_active_editable());
        assert!(matches!(collection.active_mut(), Err(TfnError::ReadOnly(_))));
    }

    #[test]
    fn test_duplicate_makes_editable_copy() {
        let mut collection = TransferFunctionCollection::default();
        collection.push_loaded(Preset::Jet.build(), PathBuf::from("jet.tfn"));
        let copy = collection.duplicate_active();
        assert_eq!(collection.selection(), copy);
        assert_eq!(collection.active().name(), "Jet (copy)");
        let tfn = collection.active_mut().unwrap();
        assert!(tfn.insert_color(0.1).unwrap().is_applied());
        // The loaded original is untouched.
        assert_eq!(collection.get(copy - 1).unwrap().function.color().len(), 7);
    }

    #[test]
    fn test_selection_survives_growth() {
        let mut collection = TransferFunctionCollection::default();
        collection.select(2).unwrap();
        for _ in 0..64 {
            collection.push(Preset::Grayscale.build(), true, Origin::Copy);
        }
        assert_eq!(collection.active().name(), "Ice Fire");
    }
}
