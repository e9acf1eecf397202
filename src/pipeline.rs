//! End-to-end analysis of one survey response

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::extract::{parse_response, validate, CandidatePoint, ExtractionStatus};
use crate::geometry::{arithmetic_centroid, BoundaryPolygon};
use crate::intersect::{IntersectionEngine, LayerIntersections};
use crate::layers::LayerCache;
use crate::report::AnalysisReport;

/// Runs the parse, validate, measure and intersect stages for one survey.
///
/// Holds only borrowed, read-only state, so one configuration and one layer
/// cache can back any number of concurrent analyzers.
///
/// # Examples
///
/// ```no_run
/// use survey_boundary::{AnalysisConfig, Analyzer, GeoJsonDirectory, LayerCache};
///
/// let config = AnalysisConfig::default();
/// let layers = LayerCache::new(GeoJsonDirectory::new("layers"), config.max_cached_layers);
/// let report = Analyzer::new(&config, &layers)
///     .analyze(r#"[{"x": 400000.0, "y": 700000.0}]"#)?;
/// println!("{} valid", report.validation().valid_count);
/// # Ok::<(), survey_boundary::Error>(())
/// ```
pub struct Analyzer<'a> {
    config: &'a AnalysisConfig,
    layers: &'a LayerCache,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a AnalysisConfig, layers: &'a LayerCache) -> Self {
        Self { config, layers }
    }

    /// Analyzes a raw upstream response with no way to cancel
    pub fn analyze(&self, raw: &str) -> Result<AnalysisReport> {
        self.analyze_response(raw, &CancellationToken::new())
    }

    /// Analyzes a raw upstream response
    pub fn analyze_response(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        let parsed = parse_response(raw);
        let extraction = parsed.status();
        self.run(extraction, &parsed.into_points(), cancel)
    }

    /// Analyzes candidates that were extracted elsewhere
    pub fn analyze_candidates(
        &self,
        candidates: &[CandidatePoint],
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        let extraction = ExtractionStatus::Supplied {
            count: candidates.len(),
        };
        self.run(extraction, candidates, cancel)
    }

    fn run(
        &self,
        extraction: ExtractionStatus,
        candidates: &[CandidatePoint],
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        debug!(?extraction, "extraction finished");
        let validation = validate(candidates, &self.config.bounds);

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let valid = &validation.valid;
        let (centroid, polygon) = rayon::join(
            || arithmetic_centroid(valid),
            || BoundaryPolygon::build(valid),
        );

        let intersections = match &polygon {
            Ok(boundary) => IntersectionEngine::new(self.layers)
                .with_parallelism(
                    self.config.parallel_min_layers,
                    self.config.parallel_min_features,
                )
                .evaluate(boundary, &self.config.layers, cancel)?,
            Err(e) => {
                debug!(error = %e, "no polygon, skipping intersections");
                LayerIntersections::default()
            }
        };

        let report =
            AnalysisReport::aggregate(extraction, validation, centroid, polygon, intersections);
        info!(
            valid = report.validation().valid_count,
            invalid = report.validation().invalid_count,
            polygon = report.polygon().is_some(),
            intersecting_layers = report.summary().layers_with_intersection,
            "analysis complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::intersect::IntersectionStatus;
    use crate::layers::{Feature, InMemoryLayers, ReferenceLayer};
    use geo::polygon;

    const RESPONSE: &str = r#"```json
[
  {"point": "B1", "x": 400000.0, "y": 700000.0},
  {"point": "B2", "x": 400200.0, "y": 700000.0},
  {"point": "B3", "x": 400200.0, "y": 700200.0},
  {"point": "B4", "x": 400000.0, "y": 700200.0},
  {"point": "B5", "x": 100.0, "y": 700000.0}
]
```"#;

    fn cache() -> LayerCache {
        let parcel = Feature::areal(polygon![
            (x: 399000.0, y: 699000.0),
            (x: 401000.0, y: 699000.0),
            (x: 401000.0, y: 701000.0),
            (x: 399000.0, y: 701000.0),
        ]);
        let source = InMemoryLayers::new()
            .with_layer(ReferenceLayer::new("parcelles", vec![parcel]))
            .with_layer(ReferenceLayer::new("dpm", vec![]));
        LayerCache::new(source, 8)
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::sequential().with_layers(["dpm", "parcelles", "litige"])
    }

    #[test]
    fn test_full_analysis() {
        let (config, cache) = (config(), cache());
        let report = Analyzer::new(&config, &cache).analyze(RESPONSE).unwrap();

        assert_eq!(report.validation().valid_count, 4);
        assert_eq!(report.validation().invalid_count, 1);
        assert_eq!(report.validation().valid[1].label.as_deref(), Some("B2"));

        let centroid = report.arithmetic_centroid().unwrap();
        assert_eq!((centroid.x, centroid.y), (400100.0, 700100.0));

        let polygon = report.polygon().unwrap();
        assert!((polygon.area() - 40000.0).abs() < 1e-6);

        let names: Vec<&str> = report
            .intersections()
            .iter()
            .map(|r| r.layer_name.as_str())
            .collect();
        assert_eq!(names, vec!["dpm", "parcelles", "litige"]);
        assert_eq!(report.intersections().get("dpm").unwrap().status, IntersectionStatus::No);
        assert_eq!(
            report.intersections().get("litige").unwrap().status,
            IntersectionStatus::Error
        );
        assert_eq!(report.summary().intersecting_layer_names, vec!["parcelles"]);
    }

    #[test]
    fn test_no_coordinates() {
        let (config, cache) = (config(), cache());
        let report = Analyzer::new(&config, &cache)
            .analyze("Aucune coordonnée lisible sur ce plan.")
            .unwrap();

        assert_eq!(report.extraction(), &ExtractionStatus::NothingFound);
        assert_eq!(report.validation().total_extracted, 0);
        assert_eq!(report.validation().success_rate, 0.0);
        assert!(report.arithmetic_centroid().is_none());
        assert_eq!(
            report.polygon_error(),
            Some(&GeometryError::InsufficientPoints { distinct: 0 })
        );
        assert!(report.intersections().is_empty());
    }

    #[test]
    fn test_supplied_candidates() {
        let (config, cache) = (config(), cache());
        let candidates = vec![
            CandidatePoint::new(400000.0, 700000.0),
            CandidatePoint::new("400100", "700000"),
            CandidatePoint::new(400050.0, 700100.0),
        ];
        let report = Analyzer::new(&config, &cache)
            .analyze_candidates(&candidates, &CancellationToken::new())
            .unwrap();

        assert_eq!(report.extraction(), &ExtractionStatus::Supplied { count: 3 });
        assert_eq!(report.validation().valid_count, 3);
        assert!(report.polygon().is_some());
    }

    #[test]
    fn test_cancelled_analysis() {
        let (config, cache) = (config(), cache());
        let token = CancellationToken::new();
        token.cancel();

        let result = Analyzer::new(&config, &cache).analyze_response(RESPONSE, &token);
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
