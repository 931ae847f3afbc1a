/// Use cases module containing application business logic orchestration
mod audit_licenses;

pub use audit_licenses::AuditLicensesUseCase;
