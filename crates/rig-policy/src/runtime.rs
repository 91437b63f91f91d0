//! Asynchronous policy inference runtime.
//!
//! Owns the loaded network on a worker thread; the frame loop talks to it
//! through a bounded request channel and polls completions without ever
//! blocking. There is no queue and no cancellation: a request that arrives
//! while one is in flight is dropped, and abandoning a result simply means
//! never polling it.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use burn::prelude::Backend;
use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use rig_control::{Action, Observation, PolicySource};

use crate::checkpoint::load_checkpoint;
use crate::error::{PolicyError, Result};
use crate::network::{PolicyConfig, PolicyNetwork};

type InferenceBackend = NdArray<f32>;

/// Fallback checkpoint tried when the requested path fails to load.
pub const DEFAULT_MODEL_PATH: &str = "models/baseline.bin";

/// Resizes a vector to the policy's declared input width, truncating or
/// zero-padding as needed.
pub fn fit_width(values: &mut Vec<f32>, width: usize) {
    values.resize(width, 0.0);
}

struct Session {
    input_width: usize,
    output_width: usize,
    request_tx: flume::Sender<Vec<f32>>,
    result_rx: flume::Receiver<Vec<f32>>,
}

/// Loads policy checkpoints and serves inference to the control loop.
///
/// All failure paths are recoverable; an unloaded or failed runtime behaves
/// as a policy that never answers, and the simulation continues under manual
/// control.
#[derive(Default)]
pub struct PolicyRuntime {
    session: Option<Session>,
}

impl PolicyRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Action width of the loaded model, if any.
    pub fn output_width(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.output_width)
    }

    /// Tries the requested checkpoint, then the default fallback.
    ///
    /// Returns `false` when neither loads; callers proceed without policy
    /// control.
    pub fn load(&mut self, path: &Path) -> bool {
        let fallback = Path::new(DEFAULT_MODEL_PATH);
        let mut candidates = vec![path.to_path_buf()];
        if path != fallback {
            candidates.push(fallback.to_path_buf());
        }

        for candidate in candidates {
            match Self::open_session(&candidate) {
                Ok(session) => {
                    log::info!(
                        "loaded policy from {} (in {}, out {})",
                        candidate.display(),
                        session.input_width,
                        session.output_width
                    );
                    self.session = Some(session);
                    return true;
                }
                Err(e) => log::warn!("policy checkpoint {}: {}", candidate.display(), e),
            }
        }
        log::warn!("no policy checkpoint available, continuing without policy control");
        false
    }

    fn open_session(path: &Path) -> Result<Session> {
        let config = read_config(path)?;
        config.validate()?;

        let device = <InferenceBackend as Backend>::Device::default();
        let network = PolicyNetwork::<InferenceBackend>::new(config, &device);
        let network = load_checkpoint::<InferenceBackend, _>(network, path, &device)?;

        // bounded(1) gives single-slot request semantics; the worker exits
        // when the session (and with it the sender) is dropped.
        let (request_tx, request_rx) = flume::bounded::<Vec<f32>>(1);
        let (result_tx, result_rx) = flume::unbounded::<Vec<f32>>();
        let input_width = config.input_width;
        thread::spawn(move || {
            for mut observation in request_rx.iter() {
                fit_width(&mut observation, input_width);
                let input = Tensor::<InferenceBackend, 2>::from_data(
                    TensorData::new(observation, [1, input_width]),
                    &device,
                );
                let output = network.forward(input);
                match output.into_data().to_vec::<f32>() {
                    Ok(action) => {
                        if result_tx.send(action).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("discarding unreadable policy output: {:?}", e),
                }
            }
        });

        Ok(Session {
            input_width,
            output_width: config.output_width,
            request_tx,
            result_rx,
        })
    }
}

impl PolicySource for PolicyRuntime {
    fn input_width(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.input_width)
    }

    fn request(&mut self, observation: Observation) {
        let Some(session) = &self.session else {
            return;
        };
        if session.request_tx.try_send(observation).is_err() {
            // Previous cycle still in flight; this one is simply skipped.
            log::trace!("inference busy, dropping request");
        }
    }

    fn poll(&mut self) -> Option<Action> {
        let session = self.session.as_ref()?;
        let mut latest = None;
        while let Ok(action) = session.result_rx.try_recv() {
            latest = Some(action);
        }
        latest
    }
}

/// Locates and parses the `*.model.json` sidecar describing the checkpoint's
/// network dimensions.
fn read_config(checkpoint: &Path) -> Result<PolicyConfig> {
    let sidecar: PathBuf = checkpoint.with_extension("model.json");
    let text = fs::read_to_string(&sidecar)
        .map_err(|e| PolicyError::config(sidecar.display().to_string(), e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| PolicyError::config(sidecar.display().to_string(), e.to_string()))
}
