//! Core workflow logic — document model, naming, validation, output.

pub mod error;
pub mod expressions;
pub mod naming;
pub mod output;
pub mod parser;
pub mod planner;
pub mod resolver;
pub mod service;
pub mod steps;
pub mod types;
pub mod variant;
