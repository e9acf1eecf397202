use std::collections::HashMap;

use super::feature::ReferenceLayer;
use crate::error::{Error, Result};

/// A store that can produce reference layers by name
pub trait LayerSource: Send + Sync {
    /// Loads the named layer
    fn load(&self, name: &str) -> Result<ReferenceLayer>;
}

/// Layers held in memory, for embedding callers and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryLayers {
    layers: HashMap<String, ReferenceLayer>,
}

impl InMemoryLayers {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer, keyed by its name
    pub fn insert(&mut self, layer: ReferenceLayer) {
        self.layers.insert(layer.name().to_string(), layer);
    }

    /// Builder-style [`InMemoryLayers::insert`]
    pub fn with_layer(mut self, layer: ReferenceLayer) -> Self {
        self.insert(layer);
        self
    }
}

impl LayerSource for InMemoryLayers {
    fn load(&self, name: &str) -> Result<ReferenceLayer> {
        self.layers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::invalid_layer(name, "layer not registered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_lookup() {
        let source = InMemoryLayers::new().with_layer(ReferenceLayer::new("dpm", vec![]));
        assert_eq!(source.load("dpm").unwrap().name(), "dpm");
        assert!(matches!(
            source.load("tf_etat"),
            Err(Error::InvalidLayer { .. })
        ));
    }
}
