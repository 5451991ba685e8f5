//! Model artifacts.

use std::sync::Arc;

/// A fixed-shape parameter vector produced by local training.
///
/// Artifacts are immutable: aggregation always builds a new one.  Cloning is
/// a reference-count bump, so a cached snapshot and the agent's current
/// artifact may share storage without either ever observing a change.
#[derive(Clone, Debug, PartialEq)]
pub struct Artifact(Arc<[f32]>);

impl Artifact {
    pub fn new(params: Vec<f32>) -> Self {
        Artifact(params.into())
    }

    pub fn zeros(len: usize) -> Self {
        Artifact::new(vec![0.0; len])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Whether both handles point at the same storage.
    pub fn shares_storage(&self, other: &Artifact) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for Artifact {
    fn from(params: Vec<f32>) -> Self {
        Artifact::new(params)
    }
}
