use crate::models::{
    ApplicationStatus, CertificateType, DocumentCheck, DocumentKind, NameCheck,
    VerificationIssue, VerificationIssueType, VerificationReport, VerificationStatus,
};
use crate::storage::CertificateStore;
use crate::utils::CertError;
use crate::validation::NameSimilarityChecker;
use crate::verification::check_document;

/// Cross-checks a community certificate application: the applicant's Aadhaar,
/// both transfer certificates, the ration card and the parents' community
/// certificate must each equal the government copy, and the names on them
/// must agree with the application.
pub struct CommunityVerifier<'a> {
    store: &'a mut CertificateStore,
}

impl<'a> CommunityVerifier<'a> {
    pub fn new(store: &'a mut CertificateStore) -> Self {
        CommunityVerifier { store }
    }

    /// Run every check, persist the outcome and return the report.
    pub fn verify(&mut self, aadhar: &str) -> Result<VerificationReport, CertError> {
        log::info!("Starting verification process for user with Aadhar number: {}", aadhar);

        let applicant = self
            .store
            .fetch_applicant(CertificateType::Community, aadhar)?
            .ok_or_else(|| CertError::ApplicantNotFound(aadhar.to_string()))?;

        let store = &*self.store;
        let checks: Vec<DocumentCheck> = DocumentKind::COMMUNITY_CHECKS
            .iter()
            .map(|kind| check_document(store, *kind, aadhar, None))
            .collect();

        let name_check = Self::check_names(
            &checks,
            applicant.applicant_name.as_deref(),
            applicant.parent_name.as_deref(),
        );
        log::info!(
            "Applicant names match: {}, parent names match: {}",
            if name_check.applicant_names_match { "Yes" } else { "No" },
            if name_check.parent_names_match { "Yes" } else { "No" }
        );

        let mut issues: Vec<VerificationIssue> = checks
            .iter()
            .flat_map(|check| check.issues.iter().cloned())
            .collect();
        if !name_check.applicant_names_match {
            issues.push(VerificationIssue::new(
                VerificationIssueType::NameMismatch,
                "Applicant names differ across documents",
            ));
        }
        if !name_check.parent_names_match {
            issues.push(VerificationIssue::new(
                VerificationIssueType::NameMismatch,
                "Parent names differ across documents",
            ));
        }

        let all_verified = checks.iter().all(|check| check.passed)
            && name_check.applicant_names_match
            && name_check.parent_names_match;
        let verification_status = VerificationStatus::from_outcome(all_verified);
        let application_status = ApplicationStatus::after_verification(verification_status);

        self.store.update_status(
            CertificateType::Community,
            aadhar,
            verification_status,
            Some(application_status),
        )?;
        log::info!(
            "Community table updated for user {}: verification status {}, application status {}",
            aadhar,
            verification_status.column_value(CertificateType::Community),
            application_status.column_value()
        );

        Ok(VerificationReport {
            aadhar: aadhar.to_string(),
            domain: CertificateType::Community,
            checks,
            name_check: Some(name_check),
            verification_status,
            application_status: Some(application_status),
            issues,
        })
    }

    /// Applicant: transfer certificate, Aadhaar, ration card and the application.
    /// Parent: community certificate, parents' transfer certificate and the application.
    pub fn check_names(
        checks: &[DocumentCheck],
        applicant_name: Option<&str>,
        parent_name: Option<&str>,
    ) -> NameCheck {
        let name_on = |kind: DocumentKind| {
            checks
                .iter()
                .find(|check| check.document == kind)
                .and_then(|check| check.extracted_name.as_deref())
        };

        let applicant_names = [
            name_on(DocumentKind::TransferCertificateApplicant),
            name_on(DocumentKind::ApplicantAadhaar),
            name_on(DocumentKind::RationCard),
            applicant_name,
        ];
        let parent_names = [
            name_on(DocumentKind::CommunityCertificateParents),
            name_on(DocumentKind::TransferCertificateParents),
            parent_name,
        ];

        NameCheck {
            applicant_names_match: NameSimilarityChecker::all_agree(&applicant_names),
            parent_names_match: NameSimilarityChecker::all_agree(&parent_names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::fixtures::*;

    const AADHAR: &str = "123456789012";

    fn complete_application() -> CertificateStore {
        let store = store_with(
            CertificateType::Community,
            &applicant(AADHAR, "Arun Raj", "Lakshmi Devi"),
        );

        let aadhaar = pdf(&["Government of India", "name: Arun Raj", "Aadhaar 1234 5678 9012"]);
        let tc_applicant = pdf(&["Transfer Certificate Id: 4821", "name: Arun Raj"]);
        let ration = pdf(&["Smart card", "id: 330011", "name: Arun Raj"]);
        let community = pdf(&[
            "Parents Community: Id: 5120",
            "name: Lakshmi Devi",
            "Community : Backward Class",
            "Caste: Vanniyar",
        ]);
        let tc_parents = pdf(&["Transfer Certificate Id: 1907", "name: Lakshmi Devi"]);

        file_matching(&store, DocumentKind::ApplicantAadhaar, AADHAR, AADHAR, &aadhaar);
        file_matching(&store, DocumentKind::TransferCertificateApplicant, AADHAR, "4821", &tc_applicant);
        file_matching(&store, DocumentKind::RationCard, AADHAR, "330011", &ration);
        file_matching(&store, DocumentKind::CommunityCertificateParents, AADHAR, "5120", &community);
        file_matching(&store, DocumentKind::TransferCertificateParents, AADHAR, "1907", &tc_parents);
        store
    }

    #[test]
    fn test_complete_application_is_verified() {
        let mut store = complete_application();
        let report = CommunityVerifier::new(&mut store).verify(AADHAR).unwrap();

        assert!(report.is_verified(), "{:?}", report.issues);
        assert_eq!(report.checks.len(), 5);
        assert_eq!(report.application_status, Some(ApplicationStatus::Pending));

        let record = store.fetch_applicant(CertificateType::Community, AADHAR).unwrap().unwrap();
        assert_eq!(record.verification_status.as_deref(), Some("Verified"));
        assert_eq!(record.application_status.as_deref(), Some("pending"));
    }

    #[test]
    fn test_missing_government_record_rejects_application() {
        let mut store = complete_application();
        let forged = pdf(&["Transfer Certificate Id: 9999", "name: Lakshmi Devi"]);
        store
            .attach_document(DocumentKind::TransferCertificateParents, AADHAR, &forged)
            .unwrap();

        let report = CommunityVerifier::new(&mut store).verify(AADHAR).unwrap();
        assert!(!report.is_verified());
        let failed: Vec<DocumentKind> = report
            .checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.document)
            .collect();
        assert_eq!(failed, vec![DocumentKind::TransferCertificateParents]);

        let record = store.fetch_applicant(CertificateType::Community, AADHAR).unwrap().unwrap();
        assert_eq!(record.verification_status.as_deref(), Some("Not Verified"));
        assert_eq!(record.application_status.as_deref(), Some("Rejected"));
    }

    #[test]
    fn test_missing_applicant_is_fatal_without_writes() {
        let mut store = complete_application();
        let result = CommunityVerifier::new(&mut store).verify("999999999999");
        assert!(matches!(result, Err(CertError::ApplicantNotFound(_))));

        let record = store.fetch_applicant(CertificateType::Community, AADHAR).unwrap().unwrap();
        assert_eq!(record.verification_status, None);
    }

    #[test]
    fn test_name_disagreement_rejects_even_when_documents_match() {
        let mut store = store_with(
            CertificateType::Community,
            &applicant(AADHAR, "Arun Kumar", "Lakshmi Devi"),
        );
        // Reuse the same documents as a complete application, but the form says "Arun Kumar".
        let source = complete_application();
        for kind in DocumentKind::COMMUNITY_CHECKS {
            let blob = source.fetch_applicant_document(kind, AADHAR).unwrap().flatten().unwrap();
            let text = crate::processing::PdfTextExtractor::extract_text_or_empty(&blob);
            let id = match kind {
                DocumentKind::ApplicantAadhaar => AADHAR.to_string(),
                _ => crate::processing::FieldExtractor::extract_id(&text, kind).unwrap(),
            };
            file_matching(&store, kind, AADHAR, &id, &blob);
        }

        let report = CommunityVerifier::new(&mut store).verify(AADHAR).unwrap();
        assert!(report.checks.iter().all(|check| check.passed));
        let names = report.name_check.unwrap();
        assert!(!names.applicant_names_match);
        assert!(names.parent_names_match);
        assert_eq!(report.verification_status, VerificationStatus::NotVerified);
    }

    #[test]
    fn test_check_names_with_nothing_extracted() {
        let checks: Vec<DocumentCheck> = DocumentKind::COMMUNITY_CHECKS
            .iter()
            .map(|kind| DocumentCheck::new(*kind))
            .collect();
        let names = CommunityVerifier::check_names(&checks, None, None);
        assert!(!names.applicant_names_match);
        assert!(!names.parent_names_match);

        let names = CommunityVerifier::check_names(&checks, Some("Arun Raj"), None);
        assert!(names.applicant_names_match);
    }
}
