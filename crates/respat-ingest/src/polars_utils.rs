//! Polars helpers for rendering parquet columns as strings.

use polars::prelude::{AnyValue, DataFrame};

use respat_model::Table;

/// Converts a Polars AnyValue to its string form. Null becomes "".
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float without trailing zeros (`12.50` -> `12.5`, `3.0` -> `3`).
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Render every column of a frame as strings.
pub fn frame_to_table(df: &DataFrame) -> Table {
    let columns = df.get_columns();
    let headers = columns.iter().map(|c| c.name().to_string()).collect();
    let series: Vec<_> = columns.iter().map(|c| c.as_materialized_series()).collect();
    let rows = (0..df.height())
        .map(|idx| {
            series
                .iter()
                .map(|s| any_to_string(s.get(idx).unwrap_or(AnyValue::Null)).trim().to_string())
                .collect()
        })
        .collect();
    Table::from_rows(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_trims_trailing_zeros() {
        assert_eq!(format_numeric(12.5), "12.5");
        assert_eq!(format_numeric(3.0), "3");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn null_is_empty() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }
}
