// Field extraction rules for submitted and government documents
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{DocumentKind, IdRule, NameRule};

lazy_static! {
    static ref TRANSFER_CERTIFICATE_ID: Regex =
        Regex::new(r"(?i)Transfer Certificate\s+Id:\s*(\d+)").unwrap();
    static ref SMART_CARD_ID: Regex = Regex::new(r"(?im)Smart card\s*\n*id:\s*(\d+)").unwrap();
    static ref PARENTS_COMMUNITY_ID: Regex =
        Regex::new(r"(?i)Parents Community:\s+Id:\s*(\d+)").unwrap();
    static ref PLAIN_ID: Regex = Regex::new(r"(?i)id:\s*(\d+)").unwrap();

    static ref LABELLED_NAME: Regex = Regex::new(r"(?i)name:\s*(.+)").unwrap();
    static ref SMART_CARD_NAME: Regex =
        Regex::new(r"(?im)Smart card\s*\n*id:.*\n*name:\s*(.+)").unwrap();
    static ref ALPHABETIC_NAME: Regex = Regex::new(r"(?i)name:\s*([A-Za-z\s]+)").unwrap();
    static ref TRAILING_SALARY: Regex = Regex::new(r"(?is)\s+salary.*$").unwrap();
}

pub struct FieldExtractor;

impl FieldExtractor {
    /// First capture group of the first match.
    pub fn capture(text: &str, pattern: &Regex) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|matched| matched.as_str().to_string())
    }

    pub fn id_pattern(rule: IdRule) -> Option<&'static Regex> {
        match rule {
            IdRule::ApplicantKey => None,
            IdRule::TransferCertificate => Some(&*TRANSFER_CERTIFICATE_ID),
            IdRule::SmartCard => Some(&*SMART_CARD_ID),
            IdRule::ParentsCommunity => Some(&*PARENTS_COMMUNITY_ID),
            IdRule::Plain => Some(&*PLAIN_ID),
        }
    }

    pub fn name_pattern(rule: NameRule) -> &'static Regex {
        match rule {
            NameRule::Labelled => &*LABELLED_NAME,
            NameRule::SmartCard => &*SMART_CARD_NAME,
            NameRule::Alphabetic => &*ALPHABETIC_NAME,
        }
    }

    /// Government lookup key printed on the document.
    pub fn extract_id(text: &str, kind: DocumentKind) -> Option<String> {
        let pattern = Self::id_pattern(kind.id_rule())?;
        let id = Self::capture(text, pattern);
        if id.is_none() {
            log::debug!("No ID match found in {}", kind);
        }
        id
    }

    /// Holder name, trimmed and lower-cased for comparison.
    pub fn extract_name(text: &str, kind: DocumentKind) -> Option<String> {
        let rule = kind.name_rule();
        let raw = match Self::capture(text, Self::name_pattern(rule)) {
            Some(raw) => raw,
            None => {
                log::debug!("No name match found in {}", kind);
                return None;
            }
        };

        let name = match rule {
            NameRule::Alphabetic => TRAILING_SALARY.replace(raw.trim(), "").into_owned(),
            _ => raw,
        };

        let name = name.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Community and caste from a parents' community certificate.
    /// A field is the text between the first and second colon of its line.
    pub fn extract_community_details(text: &str) -> (Option<String>, Option<String>) {
        let mut community = None;
        let mut caste = None;

        for line in text.lines() {
            let lower = line.to_lowercase();
            if lower.contains("community :") {
                community = Self::second_segment(line);
            }
            if lower.contains("caste:") {
                caste = Self::second_segment(line);
            }
        }

        (community, caste)
    }

    fn second_segment(line: &str) -> Option<String> {
        line.split(':').nth(1).map(|segment| segment.trim().to_string())
    }
}
