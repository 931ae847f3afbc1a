mod license_classifier;

pub use license_classifier::LicenseClassifier;
