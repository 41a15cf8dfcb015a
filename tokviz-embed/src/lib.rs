use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Produces the high-dimensional vector for a single token.
///
/// Implementations must return exactly `dim` values.
pub trait EmbeddingSource: Send + Sync {
    fn embed(&self, token: &str, dim: usize) -> Vec<f64>;
}

/// Placeholder embedding: independent samples uniform in [-1, 1] from the
/// thread-local RNG. Every call yields a fresh vector.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformSource;

impl EmbeddingSource for UniformSource {
    fn embed(&self, _token: &str, dim: usize) -> Vec<f64> {
        let mut rng = rand::thread_rng();
        (0..dim).map(|_| rng.gen_range(-1.0..=1.0)).collect()
    }
}

/// Uniform [-1, 1] samples from a seeded generator. Reproducible for a given
/// seed and call order.
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EmbeddingSource for SeededSource {
    fn embed(&self, _token: &str, dim: usize) -> Vec<f64> {
        let mut rng = self.rng.lock();
        (0..dim).map(|_| rng.gen_range(-1.0..=1.0)).collect()
    }
}

/// Deterministic lexical baseline: the token's SHA-256 digest stream mapped
/// into [-1, 1]. Equal tokens always embed to equal vectors.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashedSource;

impl EmbeddingSource for HashedSource {
    fn embed(&self, token: &str, dim: usize) -> Vec<f64> {
        let mut v = Vec::with_capacity(dim);
        let mut block: u32 = 0;
        while v.len() < dim {
            let mut hasher = Sha256::new();
            hasher.update(token.as_bytes());
            hasher.update(block.to_le_bytes());
            let digest = hasher.finalize();
            for word in digest.chunks_exact(4) {
                if v.len() == dim {
                    break;
                }
                let raw = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
                v.push(raw as f64 / u32::MAX as f64 * 2.0 - 1.0);
            }
            block += 1;
        }
        v
    }
}
