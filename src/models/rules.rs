use serde::Serialize;
use std::fmt;

use crate::models::CertificateType;

/// Every supporting document an applicant can submit. Each variant carries its
/// own extraction rules and the government table that holds the authoritative copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    ApplicantAadhaar,
    TransferCertificateApplicant,
    RationCard,
    CommunityCertificateParents,
    TransferCertificateParents,
    MonthlySalaryCertificate,
    IncomeRationCard,
}

/// How the government lookup key is read from a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// The applicant's own national ID is the key; nothing is extracted.
    ApplicantKey,
    /// `Transfer Certificate Id: <digits>`
    TransferCertificate,
    /// `Smart card` then `id: <digits>`, possibly across a line break.
    SmartCard,
    /// `Parents Community: Id: <digits>`
    ParentsCommunity,
    /// Bare `id: <digits>`
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// `name: <rest of line>`
    Labelled,
    /// `name:` on the line after the smart card id.
    SmartCard,
    /// `name:` followed by letters and whitespace, trailing salary line dropped.
    Alphabetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernmentSource {
    pub table: &'static str,
    pub id_column: &'static str,
    pub pdf_column: &'static str,
}

const GOVERNMENT_AADHAAR: GovernmentSource = GovernmentSource {
    table: "government_aadhaar",
    id_column: "aadhaar_id",
    pdf_column: "aadhaar_pdf",
};

const GOVERNMENT_TC: GovernmentSource = GovernmentSource {
    table: "government_tc",
    id_column: "tc_id",
    pdf_column: "tc_pdf",
};

const GOVERNMENT_RATION_CARD: GovernmentSource = GovernmentSource {
    table: "government_ration_card",
    id_column: "ration_id",
    pdf_column: "ration_pdf",
};

const GOVERNMENT_COMMUNITY: GovernmentSource = GovernmentSource {
    table: "government_community",
    id_column: "community_id",
    pdf_column: "community_pdf",
};

const GOVERNMENT_MONTHLY_SALARY: GovernmentSource = GovernmentSource {
    table: "government_monthly_salary",
    id_column: "mon_salary_id",
    pdf_column: "mon_salary_pdf",
};

impl DocumentKind {
    pub const COMMUNITY_CHECKS: [DocumentKind; 5] = [
        DocumentKind::ApplicantAadhaar,
        DocumentKind::TransferCertificateApplicant,
        DocumentKind::RationCard,
        DocumentKind::CommunityCertificateParents,
        DocumentKind::TransferCertificateParents,
    ];

    pub const INCOME_CHECKS: [DocumentKind; 2] = [
        DocumentKind::MonthlySalaryCertificate,
        DocumentKind::IncomeRationCard,
    ];

    pub fn domain(&self) -> CertificateType {
        match self {
            DocumentKind::MonthlySalaryCertificate | DocumentKind::IncomeRationCard => {
                CertificateType::Income
            }
            _ => CertificateType::Community,
        }
    }

    /// Blob column in the applicant table.
    pub fn column(&self) -> &'static str {
        match self {
            DocumentKind::ApplicantAadhaar => "applicantAadhar",
            DocumentKind::TransferCertificateApplicant => "transferCertificateApplicant",
            DocumentKind::RationCard => "rationCardFile",
            DocumentKind::CommunityCertificateParents => "communityCertificateParents",
            DocumentKind::TransferCertificateParents => "transferCertificateParents",
            DocumentKind::MonthlySalaryCertificate => "monthlySalaryCertificate",
            DocumentKind::IncomeRationCard => "uploadRationCard",
        }
    }

    pub fn government_source(&self) -> GovernmentSource {
        match self {
            DocumentKind::ApplicantAadhaar => GOVERNMENT_AADHAAR,
            DocumentKind::TransferCertificateApplicant
            | DocumentKind::TransferCertificateParents => GOVERNMENT_TC,
            DocumentKind::RationCard | DocumentKind::IncomeRationCard => GOVERNMENT_RATION_CARD,
            DocumentKind::CommunityCertificateParents => GOVERNMENT_COMMUNITY,
            DocumentKind::MonthlySalaryCertificate => GOVERNMENT_MONTHLY_SALARY,
        }
    }

    pub fn id_rule(&self) -> IdRule {
        match self {
            DocumentKind::ApplicantAadhaar => IdRule::ApplicantKey,
            DocumentKind::TransferCertificateApplicant
            | DocumentKind::TransferCertificateParents => IdRule::TransferCertificate,
            // Community-side ration cards always use the smart card layout.
            DocumentKind::RationCard => IdRule::SmartCard,
            DocumentKind::CommunityCertificateParents => IdRule::ParentsCommunity,
            DocumentKind::MonthlySalaryCertificate | DocumentKind::IncomeRationCard => IdRule::Plain,
        }
    }

    pub fn name_rule(&self) -> NameRule {
        match self {
            DocumentKind::RationCard => NameRule::SmartCard,
            DocumentKind::MonthlySalaryCertificate | DocumentKind::IncomeRationCard => {
                NameRule::Alphabetic
            }
            _ => NameRule::Labelled,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.column())
    }
}
