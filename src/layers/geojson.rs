//! GeoJSON layer decoding and the on-disk layer directory

use std::fs::File;
use std::path::{Path, PathBuf};

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use memmap2::Mmap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::feature::{Feature, ReferenceLayer};
use super::source::LayerSource;
use crate::error::{Error, Result};

/// File extension of layer files
pub const LAYER_EXTENSION: &str = "geojson";

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonDocument {
    FeatureCollection { features: Vec<GeoJsonFeature> },
    Feature(GeoJsonFeature),
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    #[serde(default)]
    id: Option<Value>,
    geometry: Option<GeoJsonGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<GeoJsonGeometry> },
}

/// Accumulates the parts of one feature's geometry by dimension
#[derive(Default)]
struct Parts {
    polygons: Vec<Polygon<f64>>,
    lines: Vec<LineString<f64>>,
    points: Vec<Point<f64>>,
}

impl Parts {
    fn push(&mut self, geometry: &GeoJsonGeometry) -> std::result::Result<(), String> {
        match geometry {
            GeoJsonGeometry::Point { coordinates } => self.points.push(coord(coordinates)?.into()),
            GeoJsonGeometry::MultiPoint { coordinates } => {
                for position in coordinates {
                    self.points.push(coord(position)?.into());
                }
            }
            GeoJsonGeometry::LineString { coordinates } => self.lines.push(line(coordinates)?),
            GeoJsonGeometry::MultiLineString { coordinates } => {
                for positions in coordinates {
                    self.lines.push(line(positions)?);
                }
            }
            GeoJsonGeometry::Polygon { coordinates } => self.polygons.push(polygon(coordinates)?),
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                for rings in coordinates {
                    self.polygons.push(polygon(rings)?);
                }
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for member in geometries {
                    self.push(member)?;
                }
            }
        }
        Ok(())
    }

    fn into_feature(self, id: Option<String>) -> Feature {
        Feature::new(
            id,
            MultiPolygon::new(self.polygons),
            MultiLineString::new(self.lines),
            MultiPoint::new(self.points),
        )
    }
}

fn coord(position: &[f64]) -> std::result::Result<Coord<f64>, String> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!("invalid position {:?}", position)),
    }
}

fn line(positions: &[Position]) -> std::result::Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> std::result::Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|r| line(r));
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon without exterior ring".to_string())??;
    let interiors = rings.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn feature_id(id: Option<Value>) -> Option<String> {
    match id? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes a GeoJSON `FeatureCollection` or single `Feature` into a layer.
///
/// Features with a `null` geometry are skipped.
pub fn decode_layer(name: &str, bytes: &[u8]) -> Result<ReferenceLayer> {
    let document: GeoJsonDocument = serde_json::from_slice(bytes)
        .map_err(|e| Error::invalid_layer(name, format!("malformed GeoJSON: {}", e)))?;

    let raw_features = match document {
        GeoJsonDocument::FeatureCollection { features } => features,
        GeoJsonDocument::Feature(feature) => vec![feature],
    };

    let mut features = Vec::with_capacity(raw_features.len());
    let mut skipped = 0usize;
    for (index, raw) in raw_features.into_iter().enumerate() {
        let Some(geometry) = raw.geometry else {
            skipped += 1;
            continue;
        };
        let mut parts = Parts::default();
        parts.push(&geometry).map_err(|reason| {
            Error::invalid_layer(name, format!("feature {}: {}", index, reason))
        })?;
        features.push(parts.into_feature(feature_id(raw.id)));
    }

    debug!(layer = name, features = features.len(), skipped, "layer decoded");
    Ok(ReferenceLayer::new(name, features))
}

/// Layers stored as `<root>/<name>.geojson`
#[derive(Debug, Clone)]
pub struct GeoJsonDirectory {
    root: PathBuf,
}

impl GeoJsonDirectory {
    /// Creates a source reading from the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the directory layers are read from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path for a layer name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, LAYER_EXTENSION))
    }
}

impl LayerSource for GeoJsonDirectory {
    fn load(&self, name: &str) -> Result<ReferenceLayer> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::invalid_layer(
                name,
                format!("file {} not found", path.display()),
            ));
        }

        let file = File::open(&path)?;
        if file.metadata()?.len() == 0 {
            return Err(Error::invalid_layer(name, "file is empty"));
        }

        // Layer files are treated as read-only for the lifetime of the map.
        let mmap = unsafe { Mmap::map(&file)? };

        #[cfg(unix)]
        unsafe {
            libc::madvise(
                mmap.as_ptr() as *mut libc::c_void,
                mmap.len(),
                libc::MADV_SEQUENTIAL,
            );
        }

        decode_layer(name, &mmap)
    }
}
