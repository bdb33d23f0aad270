pub mod certificate;
pub mod currency;
pub mod extractors;
pub mod pdf_text;

pub use certificate::{generate_certificate_id, render_text_pdf, CertificateLayout};
pub use currency::{annualize, extract_monthly_salary, format_indian_currency};
pub use extractors::FieldExtractor;
pub use pdf_text::PdfTextExtractor;
