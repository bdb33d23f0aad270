use crate::models::{
    CertificateType, DocumentCheck, DocumentKind, VerificationIssue, VerificationReport,
    VerificationStatus,
};
use crate::storage::CertificateStore;
use crate::utils::CertError;
use crate::verification::check_document;

/// Cross-checks an income certificate application: the monthly salary
/// certificate and the ration card must equal the government copies and
/// carry the applicant's name.
pub struct IncomeVerifier<'a> {
    store: &'a mut CertificateStore,
}

impl<'a> IncomeVerifier<'a> {
    pub fn new(store: &'a mut CertificateStore) -> Self {
        IncomeVerifier { store }
    }

    pub fn verify(&mut self, aadhar: &str) -> Result<VerificationReport, CertError> {
        log::info!("Initiating income verification for user ID: {}", aadhar);

        let applicant = self
            .store
            .fetch_applicant(CertificateType::Income, aadhar)?
            .ok_or_else(|| CertError::ApplicantNotFound(aadhar.to_string()))?;
        log::debug!(
            "Applicant name from database: {}",
            applicant.applicant_name.as_deref().unwrap_or("<none>")
        );

        let store = &*self.store;
        let checks: Vec<DocumentCheck> = DocumentKind::INCOME_CHECKS
            .iter()
            .map(|kind| {
                // An application without a name can never match its documents.
                let expected = applicant.applicant_name.as_deref().unwrap_or("");
                check_document(store, *kind, aadhar, Some(expected))
            })
            .collect();

        let issues: Vec<VerificationIssue> = checks
            .iter()
            .flat_map(|check| check.issues.iter().cloned())
            .collect();

        let verification_status =
            VerificationStatus::from_outcome(checks.iter().all(|check| check.passed));

        // Income applications only carry the verification outcome; the
        // application status is left to the reviewing officer.
        self.store
            .update_status(CertificateType::Income, aadhar, verification_status, None)?;
        log::info!(
            "Verification status updated to '{}' for user ID: {}",
            verification_status.column_value(CertificateType::Income),
            aadhar
        );

        Ok(VerificationReport {
            aadhar: aadhar.to_string(),
            domain: CertificateType::Income,
            checks,
            name_check: None,
            verification_status,
            application_status: None,
            issues,
        })
    }
}
