use chrono::NaiveDate;
use rand::Rng;

use crate::models::{
    ApplicantRecord, ApplicationStatus, CertificateType, DocumentKind, VerificationStatus,
};
use crate::processing::*;
use crate::storage::CertificateStore;
use crate::utils::CertError;

const CASTE_NOT_STATED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCertificate {
    pub certificate_id: String,
    pub certificate_type: CertificateType,
    pub details: Vec<(String, String)>,
}

/// Issues community and income certificates for applicants whose records are
/// already in the store.
pub struct CertificateIssuer<'a, R: Rng> {
    store: &'a mut CertificateStore,
    rng: R,
}

impl<'a, R: Rng> CertificateIssuer<'a, R> {
    pub fn new(store: &'a mut CertificateStore, rng: R) -> Self {
        CertificateIssuer { store, rng }
    }

    // Main issuance function: fetch, extract, render, persist
    pub fn issue(
        &mut self,
        application_id: &str,
        certificate_type: CertificateType,
        issue_date: NaiveDate,
    ) -> Result<IssuedCertificate, CertError> {
        log::info!(
            "Processing {} certificate for Application ID: {}",
            certificate_type,
            application_id
        );

        // Step 1: Fetch the applicant record
        let applicant = self
            .store
            .fetch_applicant(certificate_type, application_id)?
            .ok_or_else(|| {
                CertError::ApplicantNotFound(format!(
                    "{} in {} table",
                    application_id,
                    certificate_type.applicant_table()
                ))
            })?;

        // Step 2: Extract the certificate details
        let details = match certificate_type {
            CertificateType::Community => self.community_details(&applicant)?,
            CertificateType::Income => self.income_details(&applicant)?,
        };

        let name = applicant
            .applicant_name
            .as_deref()
            .ok_or_else(|| CertError::FieldNotFound("applicantName".to_string()))?;

        // Step 3: Render the certificate
        let certificate_id = generate_certificate_id(&applicant.aadhar, &mut self.rng);
        let layout = CertificateLayout::compose(
            name,
            &details,
            certificate_type,
            &certificate_id,
            issue_date,
        );
        let pdf = layout.render_pdf()?;

        // Step 4: Persist and commit
        self.store
            .insert_certificate(certificate_type, &certificate_id, &pdf)?;
        log::info!(
            "{} certificate saved to database with ID: {}",
            certificate_type.title(),
            certificate_id
        );

        Ok(IssuedCertificate {
            certificate_id,
            certificate_type,
            details,
        })
    }

    /// Officer approval: issue the certificate, then mark the application approved.
    /// A failed issuance leaves the application status untouched.
    pub fn approve(
        &mut self,
        application_id: &str,
        certificate_type: CertificateType,
        issue_date: NaiveDate,
    ) -> Result<IssuedCertificate, CertError> {
        let applicant = self
            .store
            .fetch_applicant(certificate_type, application_id)?
            .ok_or_else(|| {
                CertError::ApplicantNotFound(format!(
                    "{} in {} table",
                    application_id,
                    certificate_type.applicant_table()
                ))
            })?;

        if applicant.verification() != Some(VerificationStatus::Verified) {
            log::warn!(
                "Approving application {} without a successful verification (status: {})",
                application_id,
                applicant.verification_status.as_deref().unwrap_or("none")
            );
        }
        if applicant.application() == Some(ApplicationStatus::Approved) {
            log::warn!("Application {} was already approved; issuing again", application_id);
        }

        let issued = self.issue(application_id, certificate_type, issue_date)?;
        self.store
            .set_application_status(certificate_type, application_id, ApplicationStatus::Approved)?;
        log::info!("Application {} approved", application_id);
        Ok(issued)
    }

    fn document_text(
        &self,
        kind: DocumentKind,
        applicant: &ApplicantRecord,
    ) -> Result<String, CertError> {
        let blob = self
            .store
            .fetch_applicant_document(kind, &applicant.aadhar)?
            .flatten()
            .unwrap_or_default();
        Ok(PdfTextExtractor::extract_text_or_empty(&blob))
    }

    fn community_details(
        &self,
        applicant: &ApplicantRecord,
    ) -> Result<Vec<(String, String)>, CertError> {
        let text = self.document_text(DocumentKind::CommunityCertificateParents, applicant)?;
        let (community, caste) = FieldExtractor::extract_community_details(&text);
        let community = community.ok_or_else(|| {
            CertError::FieldNotFound("Community not found in the parents' community certificate".to_string())
        })?;

        Ok(vec![
            ("Community".to_string(), community),
            (
                "Caste".to_string(),
                caste.unwrap_or_else(|| CASTE_NOT_STATED.to_string()),
            ),
        ])
    }

    fn income_details(
        &self,
        applicant: &ApplicantRecord,
    ) -> Result<Vec<(String, String)>, CertError> {
        let text = self.document_text(DocumentKind::MonthlySalaryCertificate, applicant)?;
        let annual_income = annualize(extract_monthly_salary(&text)?)?;
        Ok(vec![(
            "Annual Income".to_string(),
            format!("Rs. {}", format_indian_currency(annual_income)),
        )])
    }
}
