//! Scenario-based tests for stepwise


mod argument_shaping;
mod building;
mod halting;
mod observation;
mod short_circuit;
