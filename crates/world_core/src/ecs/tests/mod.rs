//! Scenario tests for the entity-component runtime

mod lifecycle;
mod persistence;
