use crate::utils::CertError;

/// Monthly salary from a salary certificate: the digits of the first line that
/// mentions "salary" and actually carries a figure. Title lines such as
/// "Salary Certificate" are skipped because they hold no digits.
pub fn extract_monthly_salary(text: &str) -> Result<u64, CertError> {
    for line in text.lines() {
        if !line.to_lowercase().contains("salary") {
            continue;
        }

        let digits: String = line.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }

        return digits.parse::<u64>().map_err(|_| {
            CertError::FieldNotFound(format!("Salary figure out of range: {}", digits))
        });
    }

    Err(CertError::FieldNotFound("Salary not found in the PDF".to_string()))
}

pub fn annualize(monthly: u64) -> Result<u64, CertError> {
    monthly
        .checked_mul(12)
        .ok_or_else(|| CertError::FieldNotFound(format!("Annual income overflows: {} x 12", monthly)))
}

/// Indian digit grouping: the last three digits, then pairs.
/// 1234567 -> "12,34,567"
pub fn format_indian_currency(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
