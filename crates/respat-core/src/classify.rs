//! Free-text result classification.

use respat_model::TargetOutcome;

const NEGATIVE_MARKERS: [&str; 3] = ["NAO DETECTADO", "NEGATIVO", "NAO REAGENTE"];
const POSITIVE_MARKERS: [&str; 3] = ["DETECTADO", "POSITIVO", "REAGENTE"];

fn fold_char(ch: char) -> char {
    match ch {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    }
}

/// Uppercase and strip Portuguese diacritics, collapsing whitespace.
pub fn fold_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
        .chars()
        .map(fold_char)
        .collect()
}

/// Classify a result text such as `Detectado`, `NÃO DETECTADO` or `Negativo`.
///
/// Negative markers are checked first since they contain the positive ones.
pub fn classify_result_text(text: &str) -> TargetOutcome {
    let folded = fold_text(text);
    if NEGATIVE_MARKERS.iter().any(|m| folded.contains(m)) {
        TargetOutcome::NotDetected
    } else if POSITIVE_MARKERS.iter().any(|m| folded.contains(m)) {
        TargetOutcome::Detected
    } else {
        TargetOutcome::NoResult
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negatives_win_over_substrings() {
        assert_eq!(classify_result_text("NÃO DETECTADO"), TargetOutcome::NotDetected);
        assert_eq!(classify_result_text("Não  detectado"), TargetOutcome::NotDetected);
        assert_eq!(classify_result_text("NEGATIVO"), TargetOutcome::NotDetected);
        assert_eq!(classify_result_text("Não reagente"), TargetOutcome::NotDetected);
    }

    #[test]
    fn positives() {
        assert_eq!(classify_result_text("Detectado"), TargetOutcome::Detected);
        assert_eq!(classify_result_text("POSITIVO"), TargetOutcome::Detected);
        assert_eq!(classify_result_text("Reagente"), TargetOutcome::Detected);
    }

    #[test]
    fn other_text_has_no_result() {
        assert_eq!(classify_result_text(""), TargetOutcome::NoResult);
        assert_eq!(classify_result_text("Inconclusivo"), TargetOutcome::NoResult);
    }
}
