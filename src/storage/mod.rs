pub mod store;

pub use store::{BlobLookup, CertificateStore};
