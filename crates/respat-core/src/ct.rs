//! Ct (cycle threshold) rescaling for instruments that drop the decimal point.
//!
//! Raw values such as `31.5`, `3150` or `31500` are normalized to a fixed
//! digit width, divided by `scale`, and divided again by `divisor` when the
//! result is still above `cutoff`. This is a heuristic; corrections above the
//! cutoff are logged for manual review.

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtRescale {
    pub digit_width: usize,
    pub scale: f64,
    pub cutoff: f64,
    pub divisor: f64,
}

impl Default for CtRescale {
    fn default() -> Self {
        Self {
            digit_width: 5,
            scale: 1000.0,
            cutoff: 50.0,
            divisor: 10.0,
        }
    }
}

impl CtRescale {
    /// Rescaled Ct rounded to two decimals, or `None` for empty or unparseable input.
    pub fn rescale(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut digits = trimmed.to_string();
        if digits.contains('.') {
            digits = digits.replace('.', "");
            if digits.len() < self.digit_width {
                let pad = self.digit_width - digits.len();
                digits.push_str(&"0".repeat(pad));
            }
        }
        let parsed = match digits.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => parsed,
            _ => {
                warn!(value = raw, "unparseable Ct value; left empty");
                return None;
            }
        };
        let mut value = parsed / self.scale;
        if value > self.cutoff {
            warn!(
                value = raw,
                scaled = value,
                cutoff = self.cutoff,
                "Ct above cutoff; applying magnitude correction"
            );
            value /= self.divisor;
        }
        Some(round2(value))
    }

    /// Rescaled Ct as text, empty when the input cannot be rescaled.
    pub fn rescale_text(&self, raw: &str) -> String {
        self.rescale(raw).map(format_ct).unwrap_or_default()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a Ct without trailing zeros.
pub fn format_ct(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    #[test]
    fn dotted_values_are_padded() {
        let ct = CtRescale::default();
        assert_eq!(ct.rescale("31.5"), Some(31.5));
        assert_eq!(ct.rescale("2.87"), Some(28.7));
        assert_eq!(ct.rescale("0.0"), Some(0.0));
    }

    #[test]
    fn integer_values_are_scaled() {
        let ct = CtRescale::default();
        assert_eq!(ct.rescale("31500"), Some(31.5));
        assert_eq!(ct.rescale("315000"), Some(31.5));
    }

    #[test]
    fn garbage_is_empty() {
        let ct = CtRescale::default();
        assert_eq!(ct.rescale(""), None);
        assert_eq!(ct.rescale_text("N/A"), "");
    }

    #[test]
    fn formatting_drops_trailing_zeros() {
        assert_eq!(format_ct(40.0), "40");
        assert_eq!(format_ct(28.7), "28.7");
    }

    #[test]
    fn correction_above_cutoff_is_reported_at_warn() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let value = tracing::subscriber::with_default(subscriber, || {
            CtRescale::default().rescale("315000")
        });
        assert_eq!(value, Some(31.5));
        assert!(captured.text().contains("magnitude correction"));
        assert!(captured.text().contains("315000"));
    }
}
