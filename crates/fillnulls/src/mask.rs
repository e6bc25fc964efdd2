//! Ownership of the `MASK` slot during a run.
//!
//! A run may find a user mask in `MASK`. It is renamed aside on
//! [`MaskTransaction::begin`] and handed back on
//! [`MaskTransaction::restore`]. In between the run may put its own mask
//! into the slot with [`MaskTransaction::install`]; the transaction tracks
//! which of the two the slot holds so cleanup never deletes the user's.

use raster_common::Grid;
use tracing::{error, info};

use crate::error::{FillError, FillResult};
use crate::mapset::{Mapset, MASK};

/// Tracks what the `MASK` slot holds over the course of one run.
#[derive(Debug)]
pub struct MaskTransaction {
    aside: String,
    had_user_mask: bool,
    aside_held: bool,
    internal_installed: bool,
}

impl MaskTransaction {
    /// Transaction that will park a user mask under `aside`.
    pub fn new(aside: impl Into<String>) -> Self {
        Self {
            aside: aside.into(),
            had_user_mask: false,
            aside_held: false,
            internal_installed: false,
        }
    }

    /// Move an existing user mask aside.
    pub fn begin(&mut self, mapset: &mut dyn Mapset) -> FillResult<()> {
        if !mapset.raster_exists(MASK) {
            return Ok(());
        }
        info!(aside = %self.aside, "A user raster mask (MASK) is present, saving it");
        rename(mapset, MASK, &self.aside)?;
        self.had_user_mask = true;
        self.aside_held = true;
        Ok(())
    }

    /// Name the user mask is parked under, if there was one.
    pub fn use_aside(&self) -> Option<&str> {
        self.had_user_mask.then_some(self.aside.as_str())
    }

    /// Whether a user mask was present when the run began.
    pub fn had_user_mask(&self) -> bool {
        self.had_user_mask
    }

    /// Whether the slot currently holds the run's own mask.
    pub fn internal_installed(&self) -> bool {
        self.internal_installed
    }

    /// Put the run's own mask into the slot.
    pub fn install(&mut self, mapset: &mut dyn Mapset, mask: &Grid) -> FillResult<()> {
        if mapset.raster_exists(MASK) && !self.internal_installed {
            return Err(FillError::Mapset(raster_common::RasterError::AlreadyExists(
                MASK.to_string(),
            )));
        }
        mapset.write_raster(MASK, mask)?;
        self.internal_installed = true;
        Ok(())
    }

    /// Remove the run's own mask from the slot. No-op when it is not there.
    pub fn clear(&mut self, mapset: &mut dyn Mapset) -> FillResult<()> {
        if self.internal_installed {
            mapset.remove_raster(MASK)?;
            self.internal_installed = false;
        }
        Ok(())
    }

    /// Hand the user mask back. Idempotent.
    pub fn restore(&mut self, mapset: &mut dyn Mapset) -> FillResult<()> {
        self.clear(mapset)?;
        if !self.aside_held {
            return Ok(());
        }
        info!("Restoring user mask (MASK)");
        rename(mapset, &self.aside, MASK)?;
        self.aside_held = false;
        Ok(())
    }
}

fn rename(mapset: &mut dyn Mapset, from: &str, to: &str) -> FillResult<()> {
    mapset.rename_raster(from, to).map_err(|source| {
        error!(
            from = %from,
            to = %to,
            error = %source,
            "Failed to move the user mask; it may need to be renamed by hand"
        );
        FillError::MaskRenameFailure {
            from: from.to_string(),
            to: to.to_string(),
            source,
        }
    })
}
