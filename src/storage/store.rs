// SQLite-backed applicant and government records
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::models::{
    ApplicantRecord, ApplicationCounts, ApplicationStatus, CertificateType, DocumentKind,
    GovernmentSource, VerificationStatus,
};
use crate::utils::{CertError, Config};

/// A blob lookup: `None` when the row is missing, `Some(None)` when the row
/// exists but the column is NULL.
pub type BlobLookup = Option<Option<Vec<u8>>>;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS community (
        aadhar TEXT PRIMARY KEY,
        applicantName TEXT,
        fatherOrHusbandName TEXT,
        taluk TEXT,
        verificationStatus TEXT,
        applicationStatus TEXT DEFAULT 'pending',
        applicantAadhar BLOB,
        rationCardFile BLOB,
        transferCertificateApplicant BLOB,
        communityCertificateParents BLOB,
        transferCertificateParents BLOB
    );

    CREATE TABLE IF NOT EXISTS income (
        aadhar TEXT PRIMARY KEY,
        applicantName TEXT,
        fatherOrHusbandName TEXT,
        taluk TEXT,
        verificationStatus TEXT,
        applicationStatus TEXT DEFAULT 'pending',
        monthlySalaryCertificate BLOB,
        uploadRationCard BLOB
    );

    CREATE TABLE IF NOT EXISTS government_aadhaar (
        aadhaar_id TEXT PRIMARY KEY,
        aadhaar_pdf BLOB
    );

    CREATE TABLE IF NOT EXISTS government_tc (
        tc_id TEXT PRIMARY KEY,
        tc_pdf BLOB
    );

    CREATE TABLE IF NOT EXISTS government_ration_card (
        ration_id TEXT PRIMARY KEY,
        ration_pdf BLOB
    );

    CREATE TABLE IF NOT EXISTS government_community (
        community_id TEXT PRIMARY KEY,
        community_pdf BLOB
    );

    CREATE TABLE IF NOT EXISTS government_salary (
        salary_id TEXT PRIMARY KEY,
        salary_pdf BLOB
    );

    CREATE TABLE IF NOT EXISTS government_monthly_salary (
        mon_salary_id TEXT PRIMARY KEY,
        mon_salary_pdf BLOB
    );

    CREATE INDEX IF NOT EXISTS idx_community_taluk ON community(taluk);
    CREATE INDEX IF NOT EXISTS idx_income_taluk ON income(taluk);
"#;

/// Owns the one connection of an invocation; it is closed when the store is dropped.
pub struct CertificateStore {
    conn: Connection,
}

impl CertificateStore {
    /// Open an existing database. A missing file is an unreachable store, not an empty one.
    pub fn open(config: &Config) -> Result<Self, CertError> {
        let conn = Connection::open_with_flags(
            &config.database,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        log::debug!("Connected to {}", config.database.display());
        Ok(Self { conn })
    }

    /// Open or create the database and make sure every table exists.
    pub fn create(config: &Config) -> Result<Self, CertError> {
        let store = Self {
            conn: Connection::open(&config.database)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, CertError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> Result<(), CertError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn fetch_applicant(
        &self,
        domain: CertificateType,
        aadhar: &str,
    ) -> Result<Option<ApplicantRecord>, CertError> {
        let query = format!(
            "SELECT aadhar, applicantName, fatherOrHusbandName, taluk, verificationStatus, applicationStatus
             FROM {} WHERE aadhar = ?1",
            domain.applicant_table()
        );

        let record = self
            .conn
            .query_row(&query, params![aadhar], |row| {
                Ok(ApplicantRecord {
                    aadhar: row.get(0)?,
                    applicant_name: row.get(1)?,
                    parent_name: row.get(2)?,
                    taluk: row.get(3)?,
                    verification_status: row.get(4)?,
                    application_status: row.get(5)?,
                })
            })
            .optional()?;

        Ok(record)
    }

    pub fn fetch_applicant_document(
        &self,
        kind: DocumentKind,
        aadhar: &str,
    ) -> Result<BlobLookup, CertError> {
        let query = format!(
            "SELECT {} FROM {} WHERE aadhar = ?1",
            kind.column(),
            kind.domain().applicant_table()
        );
        let blob = self
            .conn
            .query_row(&query, params![aadhar], |row| row.get::<_, Option<Vec<u8>>>(0))
            .optional()?;
        Ok(blob)
    }

    pub fn fetch_government_document(
        &self,
        source: GovernmentSource,
        id: &str,
    ) -> Result<BlobLookup, CertError> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            source.pdf_column, source.table, source.id_column
        );
        let blob = self
            .conn
            .query_row(&query, params![id], |row| row.get::<_, Option<Vec<u8>>>(0))
            .optional()?;
        Ok(blob)
    }

    /// Store a generated certificate. The row is visible only once the transaction commits.
    pub fn insert_certificate(
        &mut self,
        certificate_type: CertificateType,
        certificate_id: &str,
        pdf: &[u8],
    ) -> Result<(), CertError> {
        let (table, id_column, pdf_column) = certificate_type.issued_table();
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!("INSERT INTO {} ({}, {}) VALUES (?1, ?2)", table, id_column, pdf_column),
            params![certificate_id, pdf],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn fetch_certificate(
        &self,
        certificate_type: CertificateType,
        certificate_id: &str,
    ) -> Result<Option<Vec<u8>>, CertError> {
        let (table, id_column, pdf_column) = certificate_type.issued_table();
        let source = GovernmentSource {
            table,
            id_column,
            pdf_column,
        };
        Ok(self.fetch_government_document(source, certificate_id)?.flatten())
    }

    /// Returns the number of applicant rows touched.
    pub fn update_status(
        &mut self,
        domain: CertificateType,
        aadhar: &str,
        verification: VerificationStatus,
        application: Option<ApplicationStatus>,
    ) -> Result<usize, CertError> {
        let table = domain.applicant_table();
        let tx = self.conn.transaction()?;
        let updated = match application {
            Some(application) => tx.execute(
                &format!(
                    "UPDATE {} SET verificationStatus = ?1, applicationStatus = ?2 WHERE aadhar = ?3",
                    table
                ),
                params![verification.column_value(domain), application.column_value(), aadhar],
            )?,
            None => tx.execute(
                &format!("UPDATE {} SET verificationStatus = ?1 WHERE aadhar = ?2", table),
                params![verification.column_value(domain), aadhar],
            )?,
        };
        tx.commit()?;
        Ok(updated)
    }

    /// Officer decision on an application. Leaves `verificationStatus` alone.
    pub fn set_application_status(
        &mut self,
        domain: CertificateType,
        aadhar: &str,
        status: ApplicationStatus,
    ) -> Result<(), CertError> {
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            &format!(
                "UPDATE {} SET applicationStatus = ?1 WHERE aadhar = ?2",
                domain.applicant_table()
            ),
            params![status.column_value(), aadhar],
        )?;
        if updated == 0 {
            return Err(CertError::ApplicantNotFound(format!(
                "{} in {} table",
                aadhar,
                domain.applicant_table()
            )));
        }
        tx.commit()?;
        Ok(())
    }

    /// Status tallies for one taluk; stored statuses are matched without regard to case.
    pub fn application_counts(
        &self,
        domain: CertificateType,
        taluk: &str,
    ) -> Result<ApplicationCounts, CertError> {
        let query = format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN LOWER(applicationStatus) = 'approved' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN LOWER(applicationStatus) = 'rejected' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN LOWER(applicationStatus) = 'pending' THEN 1 ELSE 0 END), 0)
             FROM {} WHERE taluk = ?1",
            domain.applicant_table()
        );

        let counts = self.conn.query_row(&query, params![taluk], |row| {
            Ok(ApplicationCounts {
                total: row.get::<_, i64>(0)? as u64,
                approved: row.get::<_, i64>(1)? as u64,
                rejected: row.get::<_, i64>(2)? as u64,
                pending: row.get::<_, i64>(3)? as u64,
            })
        })?;
        Ok(counts)
    }

    /// Intake-side writes, used to stage records.
    pub fn insert_applicant(
        &self,
        domain: CertificateType,
        record: &ApplicantRecord,
    ) -> Result<(), CertError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (aadhar, applicantName, fatherOrHusbandName, taluk, verificationStatus, applicationStatus)
                 VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 'pending'))",
                domain.applicant_table()
            ),
            params![
                record.aadhar,
                record.applicant_name,
                record.parent_name,
                record.taluk,
                record.verification_status,
                record.application_status,
            ],
        )?;
        Ok(())
    }

    pub fn attach_document(
        &self,
        kind: DocumentKind,
        aadhar: &str,
        pdf: &[u8],
    ) -> Result<(), CertError> {
        let updated = self.conn.execute(
            &format!(
                "UPDATE {} SET {} = ?1 WHERE aadhar = ?2",
                kind.domain().applicant_table(),
                kind.column()
            ),
            params![pdf, aadhar],
        )?;
        if updated == 0 {
            return Err(CertError::ApplicantNotFound(aadhar.to_string()));
        }
        Ok(())
    }

    pub fn insert_government_document(
        &self,
        source: GovernmentSource,
        id: &str,
        pdf: &[u8],
    ) -> Result<(), CertError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
                source.table, source.id_column, source.pdf_column
            ),
            params![id, pdf],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(aadhar: &str, taluk: &str, status: Option<&str>) -> ApplicantRecord {
        ApplicantRecord {
            aadhar: aadhar.to_string(),
            applicant_name: Some("Arun Raj".to_string()),
            parent_name: Some("Lakshmi Devi".to_string()),
            taluk: Some(taluk.to_string()),
            verification_status: None,
            application_status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_open_missing_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("absent.db"),
        };
        assert!(matches!(CertificateStore::open(&config), Err(CertError::Store(_))));
    }

    #[test]
    fn test_create_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("records.db"),
        };
        CertificateStore::create(&config).unwrap();
        let store = CertificateStore::open(&config).unwrap();
        assert_eq!(store.fetch_applicant(CertificateType::Income, "1").unwrap(), None);
    }

    #[test]
    fn test_applicant_round_trip() {
        let store = CertificateStore::open_in_memory().unwrap();
        store
            .insert_applicant(CertificateType::Community, &applicant("123456789012", "Vellore", None))
            .unwrap();

        let record = store
            .fetch_applicant(CertificateType::Community, "123456789012")
            .unwrap()
            .unwrap();
        assert_eq!(record.applicant_name.as_deref(), Some("Arun Raj"));
        assert_eq!(record.application_status.as_deref(), Some("pending"));
        assert_eq!(store.fetch_applicant(CertificateType::Income, "123456789012").unwrap(), None);
    }

    #[test]
    fn test_document_lookup_distinguishes_missing_row_and_null() {
        let store = CertificateStore::open_in_memory().unwrap();
        store
            .insert_applicant(CertificateType::Community, &applicant("1", "Vellore", None))
            .unwrap();

        assert_eq!(
            store.fetch_applicant_document(DocumentKind::RationCard, "1").unwrap(),
            Some(None)
        );
        assert_eq!(
            store.fetch_applicant_document(DocumentKind::RationCard, "2").unwrap(),
            None
        );

        store.attach_document(DocumentKind::RationCard, "1", b"%PDF-1.5").unwrap();
        assert_eq!(
            store.fetch_applicant_document(DocumentKind::RationCard, "1").unwrap(),
            Some(Some(b"%PDF-1.5".to_vec()))
        );
        assert!(matches!(
            store.attach_document(DocumentKind::RationCard, "2", b"%PDF-1.5"),
            Err(CertError::ApplicantNotFound(_))
        ));
    }

    #[test]
    fn test_certificate_insert_and_fetch() {
        let mut store = CertificateStore::open_in_memory().unwrap();
        store
            .insert_certificate(CertificateType::Income, "567890121234", b"%PDF-cert")
            .unwrap();
        assert_eq!(
            store.fetch_certificate(CertificateType::Income, "567890121234").unwrap(),
            Some(b"%PDF-cert".to_vec())
        );
        assert_eq!(
            store.fetch_certificate(CertificateType::Community, "567890121234").unwrap(),
            None
        );
        assert!(store
            .insert_certificate(CertificateType::Income, "567890121234", b"%PDF-other")
            .is_err());
    }

    #[test]
    fn test_update_status_per_domain() {
        let mut store = CertificateStore::open_in_memory().unwrap();
        store
            .insert_applicant(CertificateType::Community, &applicant("1", "Vellore", None))
            .unwrap();
        store
            .insert_applicant(CertificateType::Income, &applicant("1", "Vellore", None))
            .unwrap();

        let updated = store
            .update_status(
                CertificateType::Community,
                "1",
                VerificationStatus::NotVerified,
                Some(ApplicationStatus::Rejected),
            )
            .unwrap();
        assert_eq!(updated, 1);
        let record = store.fetch_applicant(CertificateType::Community, "1").unwrap().unwrap();
        assert_eq!(record.verification_status.as_deref(), Some("Not Verified"));
        assert_eq!(record.application_status.as_deref(), Some("Rejected"));

        store
            .update_status(CertificateType::Income, "1", VerificationStatus::Verified, None)
            .unwrap();
        let record = store.fetch_applicant(CertificateType::Income, "1").unwrap().unwrap();
        assert_eq!(record.verification_status.as_deref(), Some("verified"));
        assert_eq!(record.application_status.as_deref(), Some("pending"));

        let updated = store
            .update_status(CertificateType::Income, "missing", VerificationStatus::Verified, None)
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_officer_decision_sets_application_status() {
        let mut store = CertificateStore::open_in_memory().unwrap();
        store
            .insert_applicant(CertificateType::Income, &applicant("1", "Vellore", None))
            .unwrap();
        store
            .insert_applicant(CertificateType::Income, &applicant("2", "Vellore", None))
            .unwrap();

        store
            .set_application_status(CertificateType::Income, "1", ApplicationStatus::Approved)
            .unwrap();
        store
            .set_application_status(CertificateType::Income, "2", ApplicationStatus::Rejected)
            .unwrap();

        let record = store.fetch_applicant(CertificateType::Income, "1").unwrap().unwrap();
        assert_eq!(record.application_status.as_deref(), Some("approved"));
        assert_eq!(record.verification_status, None);
        assert_eq!(
            store.application_counts(CertificateType::Income, "Vellore").unwrap(),
            ApplicationCounts {
                total: 2,
                approved: 1,
                rejected: 1,
                pending: 0,
            }
        );

        assert!(matches!(
            store.set_application_status(CertificateType::Community, "1", ApplicationStatus::Approved),
            Err(CertError::ApplicantNotFound(_))
        ));
    }

    #[test]
    fn test_counts_ignore_status_case() {
        let store = CertificateStore::open_in_memory().unwrap();
        let rows = [
            ("1", "Vellore", Some("pending")),
            ("2", "Vellore", Some("Rejected")),
            ("3", "Vellore", Some("rejected")),
            ("4", "Vellore", Some("approved")),
            ("5", "Katpadi", Some("pending")),
        ];
        for (aadhar, taluk, status) in rows {
            store
                .insert_applicant(CertificateType::Community, &applicant(aadhar, taluk, status))
                .unwrap();
        }

        let counts = store.application_counts(CertificateType::Community, "Vellore").unwrap();
        assert_eq!(
            counts,
            ApplicationCounts {
                total: 4,
                approved: 1,
                rejected: 2,
                pending: 1,
            }
        );
        assert_eq!(
            store.application_counts(CertificateType::Income, "Vellore").unwrap(),
            ApplicationCounts::default()
        );
    }
}
