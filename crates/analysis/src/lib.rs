//! `parlo-analysis`: the asynchronous proficiency-evaluation pipeline.
//!
//! Data flows one way: session messages → [`filter`] → [`evaluator`] →
//! {proficiency transition, [`insights`]}. The [`orchestrator`] composes
//! the stages and owns all failure handling; the external language
//! detector and proficiency evaluator sit behind one-method traits so
//! tests substitute in-memory fakes.

pub mod detector;
pub mod evaluator;
pub mod filter;
pub mod insights;
pub mod orchestrator;

pub use detector::{HttpLanguageDetector, LanguageDetector};
pub use evaluator::{Assessment, HttpProficiencyEvaluator, ProficiencyEvaluator};
pub use orchestrator::AnalysisOrchestrator;
