//! Hand-off of evaluated palettes to a render host.
//!
//! The editor side evaluates and publishes; the render side takes cheap
//! `Arc` snapshots. A snapshot is immutable, so a reader never sees a palette
//! that is half way through being re-sampled.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::collection::TransferFunctionCollection;
use crate::error::Result;
use crate::evaluate::{Palette, SampleSpacing, evaluate};
use crate::transfer_function::TransferFunction;

/// An immutable published palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSnapshot {
    /// Increments on every publish that produced a new palette. `0` means
    /// nothing has been published yet.
    pub generation: u64,
    pub name: String,
    pub palette: Option<Palette>,
}

/// Latest palette shared between the editing and rendering sides.
#[derive(Debug)]
pub struct PalettePublisher {
    num_samples: usize,
    spacing: SampleSpacing,
    current: RwLock<Arc<PaletteSnapshot>>,
}

impl PalettePublisher {
    pub fn new(num_samples: usize, spacing: SampleSpacing) -> Self {
        Self {
            num_samples,
            spacing,
            current: RwLock::new(Arc::new(PaletteSnapshot {
                generation: 0,
                name: String::new(),
                palette: None,
            })),
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Change the palette resolution. The next publish re-samples even if the
    /// function is clean.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        if self.num_samples != num_samples {
            self.num_samples = num_samples;
            self.invalidate();
        }
    }

    fn invalidate(&self) {
        let mut current = self.current.write();
        let stale = PaletteSnapshot {
            palette: None,
            ..(**current).clone()
        };
        *current = Arc::new(stale);
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> Arc<PaletteSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// Re-sample `tfn` if it is dirty (or nothing is published yet) and
    /// publish the result. Returns whether a new snapshot was produced.
    pub fn publish(&self, tfn: &mut TransferFunction) -> Result<bool> {
        let needs_palette = self.current.read().palette.is_none();
        if !tfn.is_dirty() && !needs_palette {
            return Ok(false);
        }
        self.store(tfn)?;
        tfn.take_dirty();
        Ok(true)
    }

    /// Publish the active entry of `collection`, same rules as [`Self::publish`].
    pub fn publish_active(&self, collection: &mut TransferFunctionCollection) -> Result<bool> {
        let needs_palette = self.current.read().palette.is_none();
        if !collection.active().is_dirty() && !needs_palette {
            return Ok(false);
        }
        self.store(collection.active())?;
        collection.take_active_dirty();
        Ok(true)
    }

    fn store(&self, tfn: &TransferFunction) -> Result<()> {
        let palette = evaluate(tfn, self.num_samples, self.spacing)?;
        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(PaletteSnapshot {
            generation,
            name: tfn.name().to_string(),
            palette: Some(palette),
        });
        tracing::debug!("published '{}' generation {generation}", tfn.name());
        Ok(())
    }
}
