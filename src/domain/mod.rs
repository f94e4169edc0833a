//! Domain layer containing core business entities
//!
//! Architecture: Domain-Driven Design - Pure domain models with no infrastructure dependencies
//! - Stage outcomes represent the business concepts of the lint gate
//! - No subprocess or filesystem concerns leak into this layer

pub mod outcome;

pub use outcome::{CheckOutput, GateError, GateResult, RunReport, StageId, StageOutcome};
