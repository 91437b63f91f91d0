//! Checkpoint persistence for policy weights.

use std::path::Path;

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, PrettyJsonFileRecorder, Recorder};

use crate::error::{PolicyError, Result};

/// Supported checkpoint file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckpointFormat {
    /// Compact binary via Burn's `BinFileRecorder`. The deployment format.
    #[default]
    Binary,
    /// Human-readable JSON via `PrettyJsonFileRecorder`, for inspection.
    Json,
}

impl CheckpointFormat {
    /// Determines format from a file extension: `.bin`/`.burn` are binary,
    /// `.json` is JSON.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "bin" | "burn" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Determines format from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Saves model weights to `path`, format chosen by extension.
///
/// Used by the training-export tooling and by tests that fabricate
/// checkpoints; the viewer itself only loads.
pub fn save_checkpoint<B, M>(model: &M, path: &Path) -> Result<()>
where
    B: Backend,
    M: Module<B>,
{
    let format = CheckpointFormat::from_path(path)
        .ok_or_else(|| PolicyError::UnsupportedFormat(path.display().to_string()))?;
    let record = model.clone().into_record();
    let result = match format {
        CheckpointFormat::Binary => BinFileRecorder::<FullPrecisionSettings>::new()
            .record(record, path.to_path_buf()),
        CheckpointFormat::Json => PrettyJsonFileRecorder::<FullPrecisionSettings>::new()
            .record(record, path.to_path_buf()),
    };
    result.map_err(|e| PolicyError::save_checkpoint(path.display().to_string(), e.to_string()))
}

/// Loads weights from `path` into `model`.
pub fn load_checkpoint<B, M>(model: M, path: &Path, device: &B::Device) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    if !path.exists() {
        return Err(PolicyError::CheckpointNotFound(path.display().to_string()));
    }
    let format = CheckpointFormat::from_path(path)
        .ok_or_else(|| PolicyError::UnsupportedFormat(path.display().to_string()))?;

    let loaded = match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path.to_path_buf(), &recorder, device)
                .map_err(|e| {
                    PolicyError::load_checkpoint(path.display().to_string(), e.to_string())
                })?
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path.to_path_buf(), &recorder, device)
                .map_err(|e| {
                    PolicyError::load_checkpoint(path.display().to_string(), e.to_string())
                })?
        }
    };
    Ok(loaded)
}
