pub mod community;
pub mod income;

pub use community::CommunityVerifier;
pub use income::IncomeVerifier;

use crate::models::{DocumentCheck, DocumentKind, IdRule, VerificationIssueType};
use crate::processing::{FieldExtractor, PdfTextExtractor};
use crate::storage::CertificateStore;
use crate::utils::CertError;
use crate::validation::DocumentComparator;

/// Check one submitted document against the government's copy.
///
/// The lookup key comes from the document itself, except for the Aadhaar scan
/// which is filed under the applicant's own number. When `expected_name` is
/// given, the name printed on the document must match it ignoring case.
/// Every failure is recorded on the returned check; nothing here aborts the
/// surrounding verification run.
pub fn check_document(
    store: &CertificateStore,
    kind: DocumentKind,
    aadhar: &str,
    expected_name: Option<&str>,
) -> DocumentCheck {
    match run_check(store, kind, aadhar, expected_name) {
        Ok(check) => check,
        Err(e) => DocumentCheck::new(kind).fail(
            VerificationIssueType::Store,
            format!("Error verifying {}: {}", kind, e),
        ),
    }
}

fn run_check(
    store: &CertificateStore,
    kind: DocumentKind,
    aadhar: &str,
    expected_name: Option<&str>,
) -> Result<DocumentCheck, CertError> {
    let mut check = DocumentCheck::new(kind);

    let submitted = match store.fetch_applicant_document(kind, aadhar)? {
        None => {
            return Ok(check.fail(
                VerificationIssueType::MissingRecord,
                format!("No record found for user {} in {} table", aadhar, kind.domain()),
            ))
        }
        Some(blob) => blob.unwrap_or_default(),
    };

    if !PdfTextExtractor::is_pdf(&submitted) {
        return Ok(check.fail(
            VerificationIssueType::MalformedDocument,
            format!("{} is empty or not a valid PDF", kind),
        ));
    }
    log::info!("User {} retrieved and confirmed as PDF", kind);

    let text = PdfTextExtractor::extract_text_or_empty(&submitted);
    check.extracted_name = FieldExtractor::extract_name(&text, kind);
    log::info!(
        "Extracted name from {}: {}",
        kind,
        check.extracted_name.as_deref().unwrap_or("<none>")
    );

    let lookup_id = match kind.id_rule() {
        IdRule::ApplicantKey => aadhar.to_string(),
        _ => match FieldExtractor::extract_id(&text, kind) {
            Some(id) => id,
            None => {
                return Ok(check.fail(
                    VerificationIssueType::MissingField,
                    format!("ID not found in user {}", kind),
                ))
            }
        },
    };
    log::info!("Lookup ID for {}: {}", kind, lookup_id);
    check.extracted_id = Some(lookup_id.clone());

    if let Some(expected) = expected_name {
        match check.extracted_name.as_deref() {
            None => {
                return Ok(check.fail(
                    VerificationIssueType::MissingField,
                    format!("No name found in user {}", kind),
                ))
            }
            Some(found) if found != expected.trim().to_lowercase() => {
                let message = format!("Name mismatch: database ({}) vs extracted ({})", expected, found);
                return Ok(check.fail(VerificationIssueType::NameMismatch, message));
            }
            Some(_) => {}
        }
    }

    let source = kind.government_source();
    let government = match store.fetch_government_document(source, &lookup_id)? {
        None => {
            return Ok(check.fail(
                VerificationIssueType::MissingRecord,
                format!("Certificate not found in {} for ID {}", source.table, lookup_id),
            ))
        }
        Some(blob) => blob.unwrap_or_default(),
    };

    if !PdfTextExtractor::is_pdf(&government) {
        return Ok(check.fail(
            VerificationIssueType::MalformedDocument,
            format!("{} is empty or not a valid PDF in {}", source.pdf_column, source.table),
        ));
    }

    if !DocumentComparator::compare(&submitted, &government) {
        return Ok(check.fail(
            VerificationIssueType::DocumentMismatch,
            format!("{} does not match the government copy", kind),
        ));
    }

    log::info!("{} verification successful", kind);
    check.passed = true;
    Ok(check)
}
