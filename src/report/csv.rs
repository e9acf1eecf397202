//! `;`-separated submission export
//!
//! One row per survey: name, valid coordinates as compact JSON, then one
//! status cell per layer.

use std::io::Write;

use ::csv::WriterBuilder;
use serde::Serialize;

use super::AnalysisReport;
use crate::error::Result;

const DELIMITER: u8 = b';';

#[derive(Serialize)]
struct PlainPoint {
    x: f64,
    y: f64,
}

impl AnalysisReport {
    /// Renders the report as one submission row for the given layer columns
    pub fn submission_row<S: AsRef<str>>(
        &self,
        survey_name: &str,
        layers: &[S],
    ) -> Result<Vec<String>> {
        let mut row = Vec::with_capacity(layers.len() + 2);
        row.push(survey_name.to_string());
        row.push(self.coordinates_cell()?);

        row.extend(layers.iter().map(|layer| {
            self.intersections()
                .get(layer.as_ref())
                .map(|r| r.status.as_str().to_string())
                .unwrap_or_default()
        }));
        Ok(row)
    }

    fn coordinates_cell(&self) -> Result<String> {
        let valid = &self.validation().valid;
        if valid.is_empty() {
            return Ok(String::new());
        }
        let points: Vec<PlainPoint> = valid.iter().map(|c| PlainPoint { x: c.x, y: c.y }).collect();
        Ok(serde_json::to_string(&points)?)
    }
}

/// Writes a header and one row per `(survey_name, report)` pair
pub fn write_submission<W, S>(
    writer: W,
    layers: &[S],
    rows: &[(&str, &AnalysisReport)],
) -> Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    let mut out = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);

    let header = ["survey_name", "coordinates"]
        .into_iter()
        .chain(layers.iter().map(|l| l.as_ref()));
    out.write_record(header)?;

    for (survey_name, report) in rows {
        out.write_record(report.submission_row(survey_name, layers)?)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::extract::{validate, CandidatePoint, ExtractionStatus};
    use crate::intersect::{IntersectionResult, LayerIntersections};
    use crate::types::BoundingBox;

    fn report(
        candidates: &[CandidatePoint],
        intersections: Vec<IntersectionResult>,
    ) -> AnalysisReport {
        let validation = validate(candidates, &BoundingBox::new(0.0, 100.0, 0.0, 100.0));
        AnalysisReport::aggregate(
            ExtractionStatus::Supplied { count: candidates.len() },
            validation,
            None,
            Err(GeometryError::UnrepairableGeometry),
            LayerIntersections::new(intersections),
        )
    }

    #[test]
    fn test_submission_rows() {
        let first = report(
            &[
                CandidatePoint::new(1.0, 2.0),
                CandidatePoint::new(500.0, 2.0),
                CandidatePoint::new(3.5, 4.0),
            ],
            vec![
                IntersectionResult::scanned("aif", 1, 1, 1.0, 1.0),
                IntersectionResult::failed("dpl", "missing"),
            ],
        );
        let second = report(&[], vec![]);

        let layers = ["aif", "dpl", "enregistrement individuel"];
        let mut buf = Vec::new();
        write_submission(&mut buf, &layers, &[("TF-001", &first), ("TF-002", &second)]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "survey_name;coordinates;aif;dpl;enregistrement individuel");
        assert_eq!(
            lines[1],
            r#"TF-001;"[{""x"":1.0,""y"":2.0},{""x"":3.5,""y"":4.0}]";YES;ERROR;"#
        );
        assert_eq!(lines[2], "TF-002;;;;");
    }

    #[test]
    fn test_submission_row_cells() {
        let r = report(
            &[CandidatePoint::new(10.0, 20.0)],
            vec![IntersectionResult::scanned("parcelles", 2, 0, 0.0, 1.0)],
        );
        let row = r.submission_row("S", &["parcelles", "litige"]).unwrap();
        assert_eq!(row, vec!["S", r#"[{"x":10.0,"y":20.0}]"#, "NO", ""]);
    }
}
