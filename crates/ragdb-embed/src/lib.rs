//! Deterministic hashed bag-of-words embedder.
//!
//! Buckets each whitespace token into a fixed-dimension vector via xxhash and
//! L2-normalizes the result. Deterministic across runs and platforms, which
//! keeps retrieval reproducible and tests fast. Model-backed embedding is
//! intentionally out of scope for this system.

use anyhow::Result;

use ragdb_core::traits::Embedder;

pub const EMBEDDING_DIM: usize = 256;

pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    Ok(Box::new(HashEmbedder::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_normalized_and_deterministic() {
        let e = HashEmbedder::default();
        let a = e.embed_batch(&["solar water heating".to_string()]).unwrap();
        let b = e.embed_batch(&["solar water heating".to_string()]).unwrap();
        assert_eq!(a, b);
        let norm: f32 = a[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
        assert_eq!(a[0].len(), EMBEDDING_DIM);
    }

    #[test]
    fn different_texts_differ() {
        let e = HashEmbedder::default();
        let out = e
            .embed_batch(&["alpha bravo".to_string(), "charlie delta".to_string()])
            .unwrap();
        assert_ne!(out[0], out[1]);
    }

    #[test]
    fn empty_text_yields_zero_vector() {
        let e = HashEmbedder::default();
        let out = e.embed_batch(&[String::new()]).unwrap();
        assert!(out[0].iter().all(|&x| x == 0.0));
    }
}
