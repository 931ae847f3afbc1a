/// Application layer - Tools, use cases and DTOs
///
/// Tools translate protocol arguments into package-manager invocations;
/// the audit use case runs the same classification on a saved graph.
pub mod dto;
pub mod factories;
pub mod tools;
pub mod use_cases;
