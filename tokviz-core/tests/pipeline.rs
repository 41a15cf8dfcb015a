use std::sync::Arc;

use tokviz_core::{tokenize, PipelineConfig, Visualizer};
use tokviz_embed::{EmbeddingSource, SeededSource, UniformSource};
use tokviz_types::{VisualizeResponse, REFERENCE_ZERO_LENGTH};

const SAMPLES: [&str; 6] = [
    "",
    "Hello, world!",
    "one",
    "a b c",
    "The quick brown fox jumps over the lazy dog; again and again?",
    "-- ... ??? émigré naïve, façade:",
];

fn check_invariants(input: &str, resp: &VisualizeResponse) {
    let n_input = tokenize(input).len();
    assert_eq!(resp.tokens.len(), n_input + 15, "input {input:?}");

    for (i, tv) in resp.tokens.iter().enumerate() {
        assert!(tv.destination.iter().all(|x| x.is_finite()), "position {i}");
        assert_eq!(tv.is_input, i < n_input, "position {i}");
    }

    assert_eq!(resp.tokens[0].destination, [0.0, 0.0, 0.0]);
    for i in REFERENCE_ZERO_LENGTH.into_iter().filter(|&i| i > 0 && i < resp.tokens.len()) {
        let cur = resp.tokens[i].destination;
        let prev = resp.tokens[i - 1].destination;
        assert_eq!(
            cur.map(f64::to_bits),
            prev.map(f64::to_bits),
            "position {i} must equal its predecessor"
        );
    }
}

#[test]
fn invariants_hold_for_sample_inputs() {
    let viz = Visualizer::default();
    for input in SAMPLES {
        for _ in 0..5 {
            let resp = viz.visualize(input).unwrap();
            check_invariants(input, &resp);
        }
    }
}

#[test]
fn hello_world_example() {
    let viz = Visualizer::default();
    let resp = viz.visualize("Hello, world!").unwrap();
    let tokens: Vec<&str> = resp.tokens.iter().map(|t| t.token.as_str()).collect();
    assert_eq!(
        tokens,
        vec![
            "Hello", ",", "world", "!", "The", "cat", "sits", "on", "the", "mat", "and", "watches",
            "birds", "fly", "high", "in", "the", "sky", "."
        ]
    );
    check_invariants("Hello, world!", &resp);
}

#[test]
fn empty_input_returns_only_vocabulary() {
    let resp = Visualizer::default().visualize("").unwrap();
    assert_eq!(resp.tokens.len(), 15);
    assert!(resp.tokens.iter().all(|t| !t.is_input));
    assert_eq!(resp.tokens[0].token, "The");
}

#[test]
fn structure_is_stable_but_values_vary() {
    let viz = Visualizer::default();
    let a = viz.visualize("Hello, world!").unwrap();
    let b = viz.visualize("Hello, world!").unwrap();

    let shape = |r: &VisualizeResponse| {
        r.tokens
            .iter()
            .map(|t| (t.token.clone(), t.is_input))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&a), shape(&b));
    // Position 2 is unconstrained; two independent draws will not coincide.
    assert_ne!(a.tokens[2].destination, b.tokens[2].destination);
}

#[test]
fn seeded_source_replays_a_request() {
    let cfg = PipelineConfig::default();
    let a = Visualizer::new(cfg.clone(), Arc::new(SeededSource::new(42)))
        .visualize("seeded run")
        .unwrap();
    let b = Visualizer::new(cfg, Arc::new(SeededSource::new(42)))
        .visualize("seeded run")
        .unwrap();
    assert_eq!(a, b);
}

struct CountingSource {
    calls: std::sync::atomic::AtomicUsize,
}

impl EmbeddingSource for CountingSource {
    fn embed(&self, token: &str, dim: usize) -> Vec<f64> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        UniformSource.embed(token, dim)
    }
}

#[test]
fn zero_length_positions_skip_the_source() {
    let source = Arc::new(CountingSource {
        calls: std::sync::atomic::AtomicUsize::new(0),
    });
    let viz = Visualizer::new(PipelineConfig::default(), source.clone());
    viz.visualize("Hello, world!").unwrap();
    // 19 positions, 8 of them zero-length.
    assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 11);
}

#[test]
fn custom_config_is_honoured() {
    let cfg = PipelineConfig::from_yaml_str(
        "output_vocabulary: [x, v, z, w]\nzero_length: [2]\ndim: 5\n",
    )
    .unwrap();
    let viz = Visualizer::new(cfg, Arc::new(UniformSource));
    let resp = viz.visualize("hi").unwrap();

    assert_eq!(resp.tokens.len(), 5);
    assert_eq!(resp.tokens[2].destination, resp.tokens[1].destination);
    // Position 0 is not listed, so it keeps its projected value.
    assert_ne!(resp.tokens[0].destination, [0.0, 0.0, 0.0]);
}

#[test]
fn shipped_config_matches_reference() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/pipeline.yaml");
    assert_eq!(PipelineConfig::from_path(path).unwrap(), PipelineConfig::default());
}
