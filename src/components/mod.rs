//! UI components.

pub mod stage_flow;
