//! Derived fields: age, sex and S-gene detection.

use chrono::NaiveDate;
use respat_model::AgePolicy;

/// Days per year used for age derivation.
const DAYS_PER_YEAR: f64 = 365.2425;

/// Age at `tested` for someone born on `born`, rendered per lab policy.
///
/// Both policies round to one decimal first; whole years truncate that value,
/// so 31.96 years becomes 32.
pub fn age_between(born: NaiveDate, tested: NaiveDate, policy: AgePolicy) -> String {
    let years = (tested - born).num_days() as f64 / DAYS_PER_YEAR;
    let rounded = (years * 10.0).round() / 10.0;
    match policy {
        AgePolicy::RoundOneDecimal => format!("{rounded:.1}"),
        AgePolicy::TruncateYears => format!("{}", rounded.trunc() as i64),
    }
}

/// Strip unit suffixes from raw ages such as `45A` (years) or `12D` (days).
///
/// Ages in days become `0`; `45A10M` becomes `45`.
pub fn clean_age_text(value: &str) -> String {
    if value.contains('D') && !value.contains('A') {
        return "0".to_string();
    }
    match value.split_once('A') {
        Some((years, _)) => years.to_string(),
        None => value.to_string(),
    }
}

/// First character of the raw sex value.
pub fn normalize_sex(value: &str) -> String {
    value.chars().next().map(String::from).unwrap_or_default()
}

/// S-gene detection call from a raw Ct value.
///
/// `""` when there is nothing to read or the value is not a number, `NA` when
/// it does not start with a digit.
pub fn gene_detection(ct: &str) -> &'static str {
    let Some(first) = ct.chars().next() else {
        return "";
    };
    if !first.is_ascii_digit() {
        return "NA";
    }
    match ct.parse::<f64>() {
        Ok(value) if value > 0.0 => "Pos",
        Ok(value) if value < 1.0 => "Neg",
        Ok(_) => "NA",
        Err(_) => "",
    }
}
