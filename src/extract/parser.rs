//! Coordinate recovery from free-form model responses
//!
//! Three tiers are tried in order, stopping at the first that recognises the
//! response:
//!
//! 1. strict JSON, after removing a surrounding ```` ``` ```` / ```` ```json ```` fence
//! 2. the same text with single quotes rewritten to double quotes
//! 3. a scan of the whole response for `{'x': <number>, 'y': <number>}` fragments
//!
//! A JSON tier that recognises the shape is final, even when it yields few
//! records. Results from different tiers are never merged.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::candidate::{CandidatePoint, RawOrdinate};

lazy_static! {
    /// `{'x': 1.5, 'y': 2.5}` with either quote style and free spacing
    static ref XY_PAIR_PATTERN: Regex = Regex::new(
        r#"\{\s*['"]x['"]\s*:\s*(-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*,\s*['"]y['"]\s*:\s*(-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\}"#
    ).unwrap();
}

const FENCE: &str = "```";

/// Shape of the response that produced the coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Top-level JSON array of records
    Array,
    /// JSON object holding a `coordinates` array
    Object,
    /// Pair fragments embedded in prose
    FreeText,
}

/// Parsing tier that accepted the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTier {
    Strict,
    QuoteNormalized,
    PatternScan,
}

/// Outcome of parsing one upstream response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// The response was empty or whitespace only
    Empty,
    /// The response had content but no usable coordinate records
    NothingFound,
    /// At least one record was recovered
    Coordinates {
        shape: ResponseShape,
        tier: ParseTier,
        points: Vec<CandidatePoint>,
    },
}

/// Serializable summary of a [`ParsedResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    Empty,
    NothingFound,
    Found {
        shape: ResponseShape,
        tier: ParseTier,
        count: usize,
    },
    /// Candidates were handed in directly rather than parsed
    Supplied {
        count: usize,
    },
}

impl ParsedResponse {
    /// Returns the recovered candidates (empty unless coordinates were found)
    pub fn points(&self) -> &[CandidatePoint] {
        match self {
            ParsedResponse::Coordinates { points, .. } => points,
            _ => &[],
        }
    }

    /// Consumes the response, returning the recovered candidates
    pub fn into_points(self) -> Vec<CandidatePoint> {
        match self {
            ParsedResponse::Coordinates { points, .. } => points,
            _ => Vec::new(),
        }
    }

    /// Returns true when at least one candidate was recovered
    pub fn is_found(&self) -> bool {
        matches!(self, ParsedResponse::Coordinates { .. })
    }

    /// Summarises the outcome without the candidate list
    pub fn status(&self) -> ExtractionStatus {
        match self {
            ParsedResponse::Empty => ExtractionStatus::Empty,
            ParsedResponse::NothingFound => ExtractionStatus::NothingFound,
            ParsedResponse::Coordinates { shape, tier, points } => ExtractionStatus::Found {
                shape: *shape,
                tier: *tier,
                count: points.len(),
            },
        }
    }
}

/// Result of interpreting a text as JSON
enum JsonAttempt {
    Recognized(ResponseShape, Vec<CandidatePoint>),
    Unrecognized,
    Invalid,
}

/// Parses a raw model response into candidate coordinates. Never fails.
pub fn parse_response(raw: &str) -> ParsedResponse {
    if raw.trim().is_empty() {
        return ParsedResponse::Empty;
    }

    let content = strip_code_fence(raw);

    let strict = interpret_json(content);
    let json_result = match strict {
        JsonAttempt::Recognized(shape, points) => Some((shape, ParseTier::Strict, points)),
        JsonAttempt::Invalid if content.contains('\'') => {
            match interpret_json(&content.replace('\'', "\"")) {
                JsonAttempt::Recognized(shape, points) => {
                    Some((shape, ParseTier::QuoteNormalized, points))
                }
                _ => None,
            }
        }
        _ => None,
    };

    if let Some((shape, tier, points)) = json_result {
        debug!(?shape, ?tier, count = points.len(), "response parsed as JSON");
        return finish(shape, tier, points);
    }

    let points = scan_pairs(raw.trim());
    debug!(count = points.len(), "response scanned for coordinate pairs");
    finish(ResponseShape::FreeText, ParseTier::PatternScan, points)
}

fn finish(shape: ResponseShape, tier: ParseTier, points: Vec<CandidatePoint>) -> ParsedResponse {
    if points.is_empty() {
        ParsedResponse::NothingFound
    } else {
        ParsedResponse::Coordinates { shape, tier, points }
    }
}

/// Returns the body of the first fenced block, or the trimmed text if unfenced
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find(FENCE) else {
        return trimmed;
    };

    let rest = &trimmed[start + FENCE.len()..];
    let body = match rest.split_once('\n') {
        // Info string such as `json` on the opening line
        Some((tag, remainder)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            remainder
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn interpret_json(text: &str) -> JsonAttempt {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => JsonAttempt::Recognized(ResponseShape::Array, records(&items)),
        Ok(Value::Object(map)) => match map.get("coordinates") {
            Some(Value::Array(items)) => {
                JsonAttempt::Recognized(ResponseShape::Object, records(items))
            }
            _ => JsonAttempt::Unrecognized,
        },
        Ok(_) => JsonAttempt::Unrecognized,
        Err(_) => JsonAttempt::Invalid,
    }
}

/// Converts JSON records, dropping any whose x or y is not a finite number
fn records(items: &[Value]) -> Vec<CandidatePoint> {
    let points: Vec<CandidatePoint> = items
        .iter()
        .filter_map(|item| {
            let record = item.as_object()?;
            let candidate = CandidatePoint {
                x: RawOrdinate::from_json(record.get("x")),
                y: RawOrdinate::from_json(record.get("y")),
                label: record.get("point").and_then(label_text),
            };
            candidate.coerce().map(|_| candidate)
        })
        .collect();

    let dropped = items.len() - points.len();
    if dropped > 0 {
        debug!(dropped, "records without numeric x/y discarded");
    }
    points
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scan_pairs(text: &str) -> Vec<CandidatePoint> {
    XY_PAIR_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let x = caps[1].parse::<f64>().ok()?;
            let y = caps[2].parse::<f64>().ok()?;
            let candidate = CandidatePoint::new(x, y);
            candidate.coerce().map(|_| candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(response: &ParsedResponse) -> Vec<(f64, f64)> {
        response
            .points()
            .iter()
            .filter_map(|p| p.coerce())
            .collect()
    }

    #[test]
    fn test_fenced_json_array() {
        let parsed = parse_response("```json\n[{\"x\": 1.5, \"y\": 2.5}]\n```");
        assert_eq!(xy(&parsed), vec![(1.5, 2.5)]);
        assert!(matches!(
            parsed,
            ParsedResponse::Coordinates {
                shape: ResponseShape::Array,
                tier: ParseTier::Strict,
                ..
            }
        ));
    }

    #[test]
    fn test_untagged_fence_on_one_line() {
        let parsed = parse_response("```[{\"x\": 3, \"y\": 4}]```");
        assert_eq!(xy(&parsed), vec![(3.0, 4.0)]);
    }

    #[test]
    fn test_fence_after_preamble() {
        let text = "Voici les coordonnées :\n```json\n[{\"x\": 10, \"y\": 20}, {\"x\": 11, \"y\": 21}]\n```\nFin.";
        let parsed = parse_response(text);
        assert_eq!(xy(&parsed), vec![(10.0, 20.0), (11.0, 21.0)]);
    }

    #[test]
    fn test_single_quoted_fallback() {
        let parsed = parse_response("[{'x': 1.5, 'y': 2.5}]");
        assert_eq!(xy(&parsed), vec![(1.5, 2.5)]);
        assert!(matches!(
            parsed,
            ParsedResponse::Coordinates {
                tier: ParseTier::QuoteNormalized,
                ..
            }
        ));
    }

    #[test]
    fn test_coordinates_object_with_labels() {
        let text = r#"{"coordinates": [
            {"point": "P1", "x": 401234.56, "y": 712345.78},
            {"point": 2, "x": "401456.78", "y": 712567.89}
        ]}"#;
        let parsed = parse_response(text);
        let points = parsed.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label.as_deref(), Some("P1"));
        assert_eq!(points[1].label.as_deref(), Some("2"));
        assert_eq!(points[1].coerce(), Some((401456.78, 712567.89)));
        assert_eq!(
            parsed.status(),
            ExtractionStatus::Found {
                shape: ResponseShape::Object,
                tier: ParseTier::Strict,
                count: 2
            }
        );
    }

    #[test]
    fn test_drops_non_numeric_records() {
        let parsed = parse_response(r#"[{"x": "abc", "y": 1}, {"x": 5, "y": 6}, 7, {"y": 1}]"#);
        assert_eq!(xy(&parsed), vec![(5.0, 6.0)]);
    }

    #[test]
    fn test_free_text_scan_in_order() {
        let text = "Les bornes sont {'x': 392930.09, 'y': 699294.99} puis {\"x\":392922.77,\"y\":699270.66}, et enfin { 'x' : -1e3 , 'y' : .5 }.";
        let parsed = parse_response(text);
        assert_eq!(
            xy(&parsed),
            vec![(392930.09, 699294.99), (392922.77, 699270.66), (-1000.0, 0.5)]
        );
        assert!(matches!(
            parsed,
            ParsedResponse::Coordinates {
                shape: ResponseShape::FreeText,
                tier: ParseTier::PatternScan,
                ..
            }
        ));
    }

    #[test]
    fn test_scan_covers_text_outside_fence() {
        let text = "Bornes: {'x': 400000.0, 'y': 700000.0}, {'x': 400100.0, 'y': 700000.0}, \
                    {'x': 400100.0, 'y': 700100.0}\n```\nnote: plan non coté\n```";
        let parsed = parse_response(text);
        assert_eq!(
            xy(&parsed),
            vec![(400000.0, 700000.0), (400100.0, 700000.0), (400100.0, 700100.0)]
        );
        assert_eq!(
            parsed.status(),
            ExtractionStatus::Found {
                shape: ResponseShape::FreeText,
                tier: ParseTier::PatternScan,
                count: 3
            }
        );
    }

    #[test]
    fn test_scan_reads_pairs_inside_unparsable_fence() {
        let text = "```\nB1 {'x': 1, 'y': 2} puis B2 {'x': 3, 'y': 4}\n```";
        assert_eq!(xy(&parse_response(text)), vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_nothing_found() {
        let parsed = parse_response("Je n'ai trouvé aucun tableau de coordonnées, désolé.");
        assert_eq!(parsed, ParsedResponse::NothingFound);
        assert!(parsed.points().is_empty());
        assert!(!parsed.is_found());
    }

    #[test]
    fn test_empty_input_is_distinct() {
        assert_eq!(parse_response(""), ParsedResponse::Empty);
        assert_eq!(parse_response("  \n\t "), ParsedResponse::Empty);
        assert_eq!(parse_response("").status(), ExtractionStatus::Empty);
    }

    #[test]
    fn test_json_parse_is_trusted_over_scan() {
        // The prose string holds a pair, but the recognised JSON shape wins.
        let text = r#"{"coordinates": [], "note": "{'x': 1, 'y': 2}"}"#;
        assert_eq!(parse_response(text), ParsedResponse::NothingFound);
    }

    #[test]
    fn test_unrecognized_json_falls_through() {
        let parsed = parse_response(r#"{"answer": "{'x': 7, 'y': 8}"}"#);
        assert_eq!(xy(&parsed), vec![(7.0, 8.0)]);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("```json\n[1]"), "[1]");
    }
}
