use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::models::DocumentKind;
use crate::utils::CertError;

/// Certificate domains handled by the revenue office. Each domain has its own
/// applicant table and its own issuance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    Community,
    Income,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::Community => "community",
            CertificateType::Income => "income",
        }
    }

    /// Applicant table for this domain.
    pub fn applicant_table(&self) -> &'static str {
        match self {
            CertificateType::Community => "community",
            CertificateType::Income => "income",
        }
    }

    /// Government table that receives generated certificates: (table, id column, pdf column).
    pub fn issued_table(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            CertificateType::Community => ("government_community", "community_id", "community_pdf"),
            CertificateType::Income => ("government_salary", "salary_id", "salary_pdf"),
        }
    }

    /// "community" -> "Community"; the rest of the label is lower-cased.
    pub fn title(&self) -> String {
        capitalize(self.as_str())
    }
}

impl FromStr for CertificateType {
    type Err = CertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "community" => Ok(CertificateType::Community),
            "income" => Ok(CertificateType::Income),
            other => Err(CertError::UnsupportedCertificateType(other.to_string())),
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn capitalize(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Aggregate outcome of the cross-document checks for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationStatus {
    Verified,
    NotVerified,
}

impl VerificationStatus {
    pub fn from_outcome(all_passed: bool) -> Self {
        if all_passed {
            VerificationStatus::Verified
        } else {
            VerificationStatus::NotVerified
        }
    }

    /// Column value as each domain's records have always carried it.
    pub fn column_value(&self, domain: CertificateType) -> &'static str {
        match (domain, self) {
            (CertificateType::Community, VerificationStatus::Verified) => "Verified",
            (CertificateType::Community, VerificationStatus::NotVerified) => "Not Verified",
            (CertificateType::Income, VerificationStatus::Verified) => "verified",
            (CertificateType::Income, VerificationStatus::NotVerified) => "rejected",
        }
    }

    /// Case-insensitive; accepts every spelling either domain writes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "verified" => Some(VerificationStatus::Verified),
            "not verified" | "rejected" => Some(VerificationStatus::NotVerified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn after_verification(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Verified => ApplicationStatus::Pending,
            VerificationStatus::NotVerified => ApplicationStatus::Rejected,
        }
    }

    pub fn column_value(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// Applicant row minus its document blobs, which are fetched per document.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantRecord {
    pub aadhar: String,
    pub applicant_name: Option<String>,
    pub parent_name: Option<String>,
    pub taluk: Option<String>,
    pub verification_status: Option<String>,
    pub application_status: Option<String>,
}

impl ApplicantRecord {
    /// Stored verification outcome; `None` when never verified or unreadable.
    pub fn verification(&self) -> Option<VerificationStatus> {
        self.verification_status.as_deref().and_then(VerificationStatus::parse)
    }

    pub fn application(&self) -> Option<ApplicationStatus> {
        self.application_status.as_deref().and_then(ApplicationStatus::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationIssueType {
    MissingRecord,
    MalformedDocument,
    MissingField,
    NameMismatch,
    DocumentMismatch,
    Store,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationIssue {
    pub issue_type: VerificationIssueType,
    pub message: String,
}

impl VerificationIssue {
    pub fn new(issue_type: VerificationIssueType, message: impl Into<String>) -> Self {
        VerificationIssue {
            issue_type,
            message: message.into(),
        }
    }
}

/// Outcome of checking one submitted document against its government copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentCheck {
    pub document: DocumentKind,
    pub passed: bool,
    pub extracted_id: Option<String>,
    pub extracted_name: Option<String>,
    pub issues: Vec<VerificationIssue>,
}

impl DocumentCheck {
    pub fn new(document: DocumentKind) -> Self {
        DocumentCheck {
            document,
            passed: false,
            extracted_id: None,
            extracted_name: None,
            issues: Vec::new(),
        }
    }

    /// Record a failure and return the check, so verifiers can bail with `return check.fail(..)`.
    pub fn fail(mut self, issue_type: VerificationIssueType, message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("{}: {}", self.document, message);
        self.passed = false;
        self.issues.push(VerificationIssue::new(issue_type, message));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NameCheck {
    pub applicant_names_match: bool,
    pub parent_names_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub aadhar: String,
    pub domain: CertificateType,
    pub checks: Vec<DocumentCheck>,
    pub name_check: Option<NameCheck>,
    pub verification_status: VerificationStatus,
    pub application_status: Option<ApplicationStatus>,
    pub issues: Vec<VerificationIssue>,
}

impl VerificationReport {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

/// Per-taluk application tallies, by application status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationCounts {
    pub total: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_type_parsing() {
        assert_eq!("community".parse::<CertificateType>().unwrap(), CertificateType::Community);
        assert_eq!("INCOME".parse::<CertificateType>().unwrap(), CertificateType::Income);
        assert!(matches!(
            "birth".parse::<CertificateType>(),
            Err(CertError::UnsupportedCertificateType(_))
        ));
    }

    #[test]
    fn test_title_capitalizes() {
        assert_eq!(CertificateType::Community.title(), "Community");
        assert_eq!(capitalize("iNCOME"), "Income");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_status_column_values() {
        let community = CertificateType::Community;
        assert_eq!(VerificationStatus::Verified.column_value(community), "Verified");
        assert_eq!(VerificationStatus::NotVerified.column_value(community), "Not Verified");
        assert_eq!(VerificationStatus::NotVerified.column_value(CertificateType::Income), "rejected");
        assert_eq!(
            ApplicationStatus::after_verification(VerificationStatus::Verified).column_value(),
            "pending"
        );
        assert_eq!(
            ApplicationStatus::after_verification(VerificationStatus::NotVerified).column_value(),
            "Rejected"
        );
    }

    #[test]
    fn test_status_parse_ignores_case() {
        assert_eq!(VerificationStatus::parse("VERIFIED"), Some(VerificationStatus::Verified));
        assert_eq!(VerificationStatus::parse("Not Verified"), Some(VerificationStatus::NotVerified));
        assert_eq!(ApplicationStatus::parse("rejected"), Some(ApplicationStatus::Rejected));
        assert_eq!(ApplicationStatus::parse("Rejected"), Some(ApplicationStatus::Rejected));
        assert_eq!(ApplicationStatus::parse("in review"), None);
    }

    #[test]
    fn test_record_reads_stored_statuses() {
        let mut record = ApplicantRecord {
            aadhar: "1".to_string(),
            applicant_name: None,
            parent_name: None,
            taluk: None,
            verification_status: Some("Not Verified".to_string()),
            application_status: Some("approved".to_string()),
        };
        assert_eq!(record.verification(), Some(VerificationStatus::NotVerified));
        assert_eq!(record.application(), Some(ApplicationStatus::Approved));

        record.verification_status = None;
        record.application_status = Some("escalated".to_string());
        assert_eq!(record.verification(), None);
        assert_eq!(record.application(), None);
    }
}
