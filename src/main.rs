// Certificate issuance and verification for the revenue office

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use revcert::{
    models::{ApplicationStatus, CertificateType, VerificationIssueType, VerificationReport},
    utils::{CertError, Config},
    verification::{CommunityVerifier, IncomeVerifier},
    CertificateIssuer, CertificateStore,
};

/// Exit status for a verification run that completed but rejected the application.
const EXIT_NOT_VERIFIED: u8 = 2;

#[derive(Parser)]
#[command(name = "revcert", version, about = "Issue and verify community and income certificates")]
struct Cli {
    /// JSON configuration file (overrides REVCERT_DATABASE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate and store a certificate for an application
    Issue {
        application_id: String,
        /// community or income
        certificate_type: String,
    },
    /// Cross-check an applicant's documents against government records
    Verify {
        aadhar_number: String,
        #[arg(long, value_enum, default_value_t = Domain::Community)]
        domain: Domain,
    },
    /// Approve an application and issue its certificate
    Approve {
        aadhar_number: String,
        certificate_type: String,
    },
    /// Reject an application
    Reject {
        aadhar_number: String,
        certificate_type: String,
    },
    /// Count applications in a taluk by status
    Counts {
        taluk: String,
        certificate_type: String,
    },
    /// Write a stored certificate to a PDF file
    Export {
        certificate_type: String,
        certificate_id: String,
        output: PathBuf,
    },
    /// Create the database tables
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum Domain {
    Community,
    Income,
}

fn print_detailed_report(report: &VerificationReport) {
    println!("\n===============================================");
    println!("      {} VERIFICATION REPORT", report.domain.as_str().to_uppercase());
    println!("===============================================\n");
    println!("Aadhar number: {}", report.aadhar);

    println!("\nDOCUMENT CHECKS:");
    for (step, check) in report.checks.iter().enumerate() {
        println!(
            "  {}. {}: {}",
            step + 1,
            check.document,
            if check.passed { "PASSED" } else { "FAILED" }
        );
    }

    if let Some(names) = &report.name_check {
        println!("\nNAME SIMILARITY:");
        println!(
            "  Applicant Names Match: {}",
            if names.applicant_names_match { "Yes" } else { "No" }
        );
        println!(
            "  Parent Names Match: {}",
            if names.parent_names_match { "Yes" } else { "No" }
        );
    }

    if !report.issues.is_empty() {
        println!("\nISSUES FOUND:");
        for issue in &report.issues {
            println!(
                "  - [{}] {}",
                match issue.issue_type {
                    VerificationIssueType::MissingRecord => "MISSING RECORD",
                    VerificationIssueType::MalformedDocument => "MALFORMED",
                    VerificationIssueType::MissingField => "MISSING FIELD",
                    VerificationIssueType::NameMismatch => "NAME",
                    VerificationIssueType::DocumentMismatch => "MISMATCH",
                    VerificationIssueType::Store => "STORE",
                },
                issue.message
            );
        }
    }

    println!(
        "\nFinal Verification Status: {}",
        report.verification_status.column_value(report.domain)
    );
    if let Some(status) = report.application_status {
        println!("Application Status: {}", status.column_value());
    }
}

fn run(cli: Cli) -> Result<ExitCode, CertError> {
    // Argument errors are reported before any file or database is touched.
    let config_file = cli.config;
    let load_config = || Config::load(config_file.as_deref());

    match cli.command {
        Command::Issue {
            application_id,
            certificate_type,
        } => {
            let certificate_type: CertificateType = certificate_type.parse()?;
            let mut store = CertificateStore::open(&load_config()?)?;
            let today = Local::now().date_naive();
            let issued = CertificateIssuer::new(&mut store, rand::thread_rng())
                .issue(&application_id, certificate_type, today)
                .map_err(|e| {
                    eprintln!("Failed to generate {} certificate", certificate_type);
                    e
                })?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "certificate_id": issued.certificate_id,
                        "certificate_type": issued.certificate_type,
                    })
                );
            } else {
                println!("{}", issued.certificate_id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            aadhar_number,
            domain,
        } => {
            let mut store = CertificateStore::open(&load_config()?)?;
            let report = match domain {
                Domain::Community => CommunityVerifier::new(&mut store).verify(&aadhar_number)?,
                Domain::Income => IncomeVerifier::new(&mut store).verify(&aadhar_number)?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_detailed_report(&report);
            }
            if report.is_verified() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_NOT_VERIFIED))
            }
        }
        Command::Approve {
            aadhar_number,
            certificate_type,
        } => {
            let certificate_type: CertificateType = certificate_type.parse()?;
            let mut store = CertificateStore::open(&load_config()?)?;
            let today = Local::now().date_naive();
            let issued = CertificateIssuer::new(&mut store, rand::thread_rng())
                .approve(&aadhar_number, certificate_type, today)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "application_status": ApplicationStatus::Approved.column_value(),
                        "certificate_id": issued.certificate_id,
                        "certificate_type": issued.certificate_type,
                    })
                );
            } else {
                println!("Application approved; certificate ID {}", issued.certificate_id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Reject {
            aadhar_number,
            certificate_type,
        } => {
            let certificate_type: CertificateType = certificate_type.parse()?;
            let mut store = CertificateStore::open(&load_config()?)?;
            store.set_application_status(certificate_type, &aadhar_number, ApplicationStatus::Rejected)?;
            println!("Application {} rejected", aadhar_number);
            Ok(ExitCode::SUCCESS)
        }
        Command::Counts {
            taluk,
            certificate_type,
        } => {
            let certificate_type: CertificateType = certificate_type.parse()?;
            let store = CertificateStore::open(&load_config()?)?;
            let counts = store.application_counts(certificate_type, &taluk)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("{} applications in {}:", certificate_type.title(), taluk);
                println!("  Total: {}", counts.total);
                println!("  Approved: {}", counts.approved);
                println!("  Rejected: {}", counts.rejected);
                println!("  Pending: {}", counts.pending);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Export {
            certificate_type,
            certificate_id,
            output,
        } => {
            let certificate_type: CertificateType = certificate_type.parse()?;
            let store = CertificateStore::open(&load_config()?)?;
            let pdf = store
                .fetch_certificate(certificate_type, &certificate_id)?
                .ok_or_else(|| CertError::CertificateNotFound(certificate_id.clone()))?;
            std::fs::write(&output, &pdf)?;
            log::info!("Wrote {} bytes to {}", pdf.len(), output.display());
            println!("{}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Init => {
            let config = load_config()?;
            CertificateStore::create(&config)?;
            println!("Initialised {}", config.database.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            log::debug!("{:?}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
