pub mod certificate_issuer;
pub mod models;
pub mod processing;
pub mod storage;
pub mod utils;
pub mod validation;
pub mod verification;

pub use certificate_issuer::{CertificateIssuer, IssuedCertificate};
pub use storage::CertificateStore;
