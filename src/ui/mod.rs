//! Operator-facing output

pub mod progress;

pub use progress::StepReporter;
