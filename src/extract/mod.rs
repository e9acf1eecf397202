//! Recovery and validation of survey coordinates from upstream model output
//!
//! The parser turns a loosely formatted text response into [`CandidatePoint`]s;
//! the validator splits those into in-region coordinates and rejects.

pub mod candidate;
pub mod parser;
pub mod validator;

pub use candidate::{CandidatePoint, RawOrdinate};
pub use parser::{parse_response, ExtractionStatus, ParseTier, ParsedResponse, ResponseShape};
pub use validator::{validate, InvalidCoordinate, InvalidReason, ValidationResult};
