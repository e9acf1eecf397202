//! Parallel boundary-versus-layer evaluation

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::result::{IntersectionResult, LayerIntersections};
use crate::error::{Error, Result};
use crate::geometry::BoundaryPolygon;
use crate::layers::{Feature, LayerCache, ReferenceLayer};

/// Features scanned between cancellation checks
const CANCEL_CHECK_INTERVAL: usize = 256;

/// Evaluates a boundary against named layers from a shared cache
pub struct IntersectionEngine<'a> {
    layers: &'a LayerCache,
    parallel_min_layers: usize,
    parallel_min_features: usize,
}

impl<'a> IntersectionEngine<'a> {
    /// Creates an engine that always runs sequentially
    pub fn new(layers: &'a LayerCache) -> Self {
        Self {
            layers,
            parallel_min_layers: usize::MAX,
            parallel_min_features: usize::MAX,
        }
    }

    /// Sets the layer and feature counts at which work moves to the thread pool
    pub fn with_parallelism(mut self, min_layers: usize, min_features: usize) -> Self {
        self.parallel_min_layers = min_layers.max(1);
        self.parallel_min_features = min_features.max(1);
        self
    }

    /// Evaluates every named layer independently.
    ///
    /// A layer that fails to load yields an `ERROR` result and never aborts
    /// the others. Returns [`Error::Cancelled`] if the token fires before all
    /// layers finish; partial results are dropped.
    pub fn evaluate<S: AsRef<str> + Sync>(
        &self,
        boundary: &BoundaryPolygon,
        layer_names: &[S],
        cancel: &CancellationToken,
    ) -> Result<LayerIntersections> {
        let evaluate = |name: &S| self.evaluate_layer(boundary, name.as_ref(), cancel);

        let results: Vec<Option<IntersectionResult>> =
            if layer_names.len() >= self.parallel_min_layers {
                layer_names.par_iter().map(evaluate).collect()
            } else {
                layer_names.iter().map(evaluate).collect()
            };

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        results
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(LayerIntersections::new)
            .ok_or(Error::Cancelled)
    }

    /// Evaluates one layer, returning `None` when cancelled
    fn evaluate_layer(
        &self,
        boundary: &BoundaryPolygon,
        name: &str,
        cancel: &CancellationToken,
    ) -> Option<IntersectionResult> {
        if cancel.is_cancelled() {
            return None;
        }

        let layer = match self.layers.get(name) {
            Ok(layer) => layer,
            Err(e) => {
                warn!(layer = name, error = %e, "layer unavailable");
                return Some(IntersectionResult::failed(name, e.to_string()));
            }
        };

        let (count, area) = self.scan(&layer, boundary, cancel)?;
        let result = IntersectionResult::scanned(name, layer.len(), count, area, boundary.area());

        debug!(
            layer = name,
            status = result.status.as_str(),
            intersecting = count,
            total = layer.len(),
            coverage = result.percentage_covered,
            "layer evaluated"
        );
        Some(result)
    }

    /// Counts intersecting features and sums their overlap area
    fn scan(
        &self,
        layer: &ReferenceLayer,
        boundary: &BoundaryPolygon,
        cancel: &CancellationToken,
    ) -> Option<(usize, f64)> {
        let tally_chunk = |chunk: &[Feature]| -> Option<(usize, f64)> {
            if cancel.is_cancelled() {
                return None;
            }
            Some(
                chunk
                    .iter()
                    .filter(|feature| feature.intersects(boundary))
                    .fold((0, 0.0), |(count, area), feature| {
                        (count + 1, area + feature.intersection_area(boundary))
                    }),
            )
        };

        let features = layer.features();
        let tallies: Option<Vec<(usize, f64)>> = if features.len() >= self.parallel_min_features {
            features
                .par_chunks(CANCEL_CHECK_INTERVAL)
                .map(tally_chunk)
                .collect()
        } else {
            features
                .chunks(CANCEL_CHECK_INTERVAL)
                .map(tally_chunk)
                .collect()
        };

        Some(
            tallies?
                .into_iter()
                .fold((0, 0.0), |(count, area), (c, a)| (count + c, area + a)),
        )
    }
}
