//! actionsmith — typed GitHub Actions workflows.
//!
//! A strongly typed workflow document model with exact wire encoding, job
//! assembly from composable options, and a "river" assembler that turns a
//! service and its ordered destination groups into a root workflow chaining
//! one reusable workflow per group.

pub mod cli;
pub mod core;
pub mod river;
pub mod tripwire;
