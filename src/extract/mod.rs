// src/extract/mod.rs

//! Field extractors: independent heuristics turning free announcement text
//! into typed fields. Extraction failure is never an error: each extractor
//! returns a sentinel (0.0, `None`, nationwide) when the text gives nothing.

mod deadline;
mod education;
mod normalize;
mod region;
mod salary;

pub use deadline::extract_deadline;
pub use education::EducationClassifier;
pub use normalize::{normalize, tokenize};
pub use region::RegionExtractor;
pub use salary::SalaryExtractor;
