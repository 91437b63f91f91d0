use std::fs;

use burn::prelude::Backend;
use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use rig_control::PolicySource;
use rig_policy::{
    fit_width, load_checkpoint, save_checkpoint, PolicyConfig, PolicyNetwork, PolicyRuntime,
};

type B = NdArray<f32>;

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("rig-policy-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn forward_values(network: &PolicyNetwork<B>, config: PolicyConfig) -> Vec<f32> {
    let device = <B as Backend>::Device::default();
    let mut input = vec![0.0f32; config.input_width];
    for (i, x) in input.iter_mut().enumerate() {
        *x = (i as f32 * 0.1).sin();
    }
    let input = Tensor::<B, 2>::from_data(
        burn::tensor::TensorData::new(input, [1, config.input_width]),
        &device,
    );
    network.forward(input).into_data().to_vec::<f32>().unwrap()
}

#[test]
fn saved_weights_reload_identically() {
    let dir = temp_dir("roundtrip");
    let path = dir.join("actor.bin");
    let device = <B as Backend>::Device::default();

    let config = PolicyConfig::new(12, 32, 4);
    let original = PolicyNetwork::<B>::new(config, &device);
    let expected = forward_values(&original, config);

    save_checkpoint::<B, _>(&original, &path).unwrap();

    // Fresh random init, then overwrite with the saved weights.
    let reloaded = PolicyNetwork::<B>::new(config, &device);
    let reloaded = load_checkpoint::<B, _>(reloaded, &path, &device).unwrap();
    let actual = forward_values(&reloaded, config);

    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(&expected) {
        assert!((a - e).abs() < 1e-6, "weights drifted: {} vs {}", a, e);
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn runtime_loads_and_answers_requests() {
    let dir = temp_dir("runtime");
    let path = dir.join("actor.bin");
    let device = <B as Backend>::Device::default();

    let config = PolicyConfig::new(10, 16, 3);
    let network = PolicyNetwork::<B>::new(config, &device);
    save_checkpoint::<B, _>(&network, &path).unwrap();
    fs::write(
        path.with_extension("model.json"),
        serde_json::to_string(&config).unwrap(),
    )
    .unwrap();

    let mut runtime = PolicyRuntime::new();
    assert!(runtime.load(&path));
    assert_eq!(runtime.input_width(), Some(10));
    assert_eq!(runtime.output_width(), Some(3));

    // Observation wider than the policy; the worker truncates it.
    runtime.request(vec![0.5; 24]);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    let action = loop {
        if let Some(action) = runtime.poll() {
            break action;
        }
        assert!(std::time::Instant::now() < deadline, "inference never completed");
        std::thread::sleep(std::time::Duration::from_millis(5));
    };
    assert_eq!(action.len(), 3);

    // The worker's answer matches a direct forward pass on fitted input.
    let mut obs = vec![0.5f32; 24];
    fit_width(&mut obs, 10);
    let input = Tensor::<B, 2>::from_data(burn::tensor::TensorData::new(obs, [1, 10]), &device);
    let loaded = load_checkpoint::<B, _>(PolicyNetwork::<B>::new(config, &device), &path, &device)
        .unwrap();
    let expected = loaded.forward(input).into_data().to_vec::<f32>().unwrap();
    for (a, e) in action.iter().zip(&expected) {
        assert!((a - e).abs() < 1e-6);
    }

    fs::remove_dir_all(&dir).ok();
}
