//! # composite_core - Composite Mechanics Calculation Engine
//!
//! `composite_core` computes effective elastic properties of fiber-reinforced
//! composites: single plies viewed off-axis, laminated plates, 3D laminates and
//! fiber/matrix mixtures. All inputs and outputs are JSON-serializable and use
//! the field names of the established web service contract.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions from request to result
//! - **JSON-First**: all request and result types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types with HTTP-style status classes
//! - **Fixed-size numerics**: 3×3 and 6×6 matrices on the stack via nalgebra
//!
//! ## Quick Start
//!
//! ```rust
//! use composite_core::calculations::plate::{calculate, PlateInput};
//! use composite_core::materials::LaminaProperties;
//! use composite_core::validation::ValidationLimits;
//!
//! let input = PlateInput {
//!     material: LaminaProperties { e1: 150000.0, e2: 10000.0, g12: 5000.0, nu12: 0.3 },
//!     layup_sequence: "[0/90]s".to_string(),
//!     layer_thickness: 0.125,
//! };
//! let result = calculate(&input, &ValidationLimits::default()).unwrap();
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - the four computations and their wire types
//! - [`api`] - JSON request/response envelope
//! - [`layup`] - stacking-sequence notation
//! - [`materials`] - ply, fiber and matrix property sets
//! - [`linalg`] - checked inversion and rotation matrices
//! - [`validation`] - request range checks
//! - [`units`] - angle wrappers
//! - [`errors`] - structured error types
//! - [`file_io`] - request and response documents with atomic saves

pub mod api;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod layup;
pub mod linalg;
pub mod materials;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use api::{handle, handle_batch_json, handle_json, CalculationResponse};
pub use calculations::{CalculationItem, CalculationOutput, ThreeDimensionalProperties};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_request_text, load_responses, save_responses};
pub use layup::LayupSequence;
pub use validation::ValidationLimits;
