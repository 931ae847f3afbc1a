//! Dependency-graph license auditing: graph model, policy, classifier.

pub mod domain;
pub mod policies;
pub mod services;
