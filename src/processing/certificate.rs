use chrono::{Duration, NaiveDate};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rand::Rng;

use crate::models::CertificateType;
use crate::utils::CertError;

pub const CERTIFICATE_ID_MAX_LENGTH: usize = 20;
pub const VALIDITY_DAYS: i64 = 365;
pub const DISCLAIMER: &str =
    "This certificate is computer-generated and does not require a physical signature.";

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const LEFT_MARGIN: i64 = 72;
const TOP_LINE: i64 = 720;
const LINE_GAP: i64 = 24;

/// Last 8 characters of the national ID followed by 4 random digits.
/// Uniqueness is not checked against the store.
pub fn generate_certificate_id<R: Rng>(aadhar: &str, rng: &mut R) -> String {
    let chars: Vec<char> = aadhar.chars().collect();
    let base: String = chars[chars.len().saturating_sub(8)..].iter().collect();
    let random_part: String = (0..4)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();

    format!("{}{}", base, random_part)
        .chars()
        .take(CERTIFICATE_ID_MAX_LENGTH)
        .collect()
}

/// The printed content of a certificate, independent of how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub title: String,
    pub lines: Vec<String>,
    pub disclaimer: String,
}

impl CertificateLayout {
    pub fn compose(
        name: &str,
        details: &[(String, String)],
        certificate_type: CertificateType,
        certificate_id: &str,
        issue_date: NaiveDate,
    ) -> Self {
        let expiry_date = issue_date + Duration::days(VALIDITY_DAYS);

        let mut lines = Vec::with_capacity(details.len() + 4);
        lines.push(format!("Certificate ID: {}", certificate_id));
        lines.push(format!("Name: {}", name));
        for (label, value) in details {
            lines.push(format!("{}: {}", label, value));
        }
        lines.push(format!("Date of Issue: {}", issue_date.format("%d-%m-%Y")));
        lines.push(format!("Valid Until: {}", expiry_date.format("%d-%m-%Y")));

        CertificateLayout {
            title: format!("{} Certificate", certificate_type.title()),
            lines,
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn render_pdf(&self) -> Result<Vec<u8>, CertError> {
        let mut styled = Vec::with_capacity(self.lines.len() + 2);
        styled.push((TextStyle::Title, self.title.as_str()));
        styled.extend(self.lines.iter().map(|line| (TextStyle::Body, line.as_str())));
        styled.push((TextStyle::Note, self.disclaimer.as_str()));
        render_pdf(&styled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextStyle {
    Title,
    Body,
    Note,
}

impl TextStyle {
    fn font(&self) -> &'static str {
        match self {
            TextStyle::Title => "F2",
            TextStyle::Body => "F1",
            TextStyle::Note => "F3",
        }
    }

    fn size(&self) -> i64 {
        match self {
            TextStyle::Title => 18,
            TextStyle::Body => 12,
            TextStyle::Note => 10,
        }
    }
}

/// Single-page PDF with one plain line of text per entry.
pub fn render_text_pdf(lines: &[String]) -> Result<Vec<u8>, CertError> {
    let styled: Vec<(TextStyle, &str)> = lines
        .iter()
        .map(|line| (TextStyle::Body, line.as_str()))
        .collect();
    render_pdf(&styled)
}

fn render_pdf(lines: &[(TextStyle, &str)]) -> Result<Vec<u8>, CertError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(standard_font("Helvetica"));
    let bold = doc.add_object(standard_font("Helvetica-Bold"));
    let italic = doc.add_object(standard_font("Helvetica-Oblique"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
            "F3" => italic,
        },
    });

    let mut operations = Vec::new();
    let mut y = TOP_LINE;
    for (style, text) in lines {
        // A text object per line so the text layer reads back line by line.
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![style.font().into(), style.size().into()]));
        operations.push(Operation::new("Td", vec![LEFT_MARGIN.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        operations.push(Operation::new("ET", vec![]));
        y -= if *style == TextStyle::Title { LINE_GAP * 2 } else { LINE_GAP };
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn standard_font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

// Latin-1 maps straight onto WinAnsi; anything wider prints as '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
