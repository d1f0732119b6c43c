//! Human-readable rendering of calculator results.
//!
//! A [`Report`] is an ordered list of labelled values. Each value is shown
//! in SI units together with the engineering units a board designer reads
//! off a drawing (mm and mil, Ω in exponential notation, A/mm²).

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One labelled line of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// What the value is.
    pub label: String,
    /// The formatted value with units.
    pub value: String,
}

/// An ordered list of labelled, formatted values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Report title.
    pub title: String,
    /// Lines in display order.
    pub lines: Vec<ReportLine>,
}

impl Report {
    /// Creates an empty report with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Appends a line and returns the report for chaining.
    #[must_use]
    pub fn line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push(ReportLine {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Looks up the value of a line by label.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let width = self
            .lines
            .iter()
            .map(|line| line.label.chars().count())
            .max()
            .unwrap_or(0);
        for line in &self.lines {
            writeln!(f, "  {:<width$}  {}", line.label, line.value)?;
        }
        Ok(())
    }
}

/// Names of the fields of a serialised result that were not finite.
///
/// JSON has no NaN or infinity, so `serde_json` writes them as `null`. Every
/// result field is a float, which makes a `null` field a non-finite one.
#[must_use]
pub fn non_finite_fields(result: &Value) -> Vec<String> {
    let mut names: Vec<String> = result
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(_, value)| value.is_null())
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Formats a value in fixed notation with `decimals` places.
#[must_use]
pub fn fixed(value: f64, decimals: usize, unit: &str) -> String {
    format!("{value:.decimals$} {unit}")
}

/// Formats a value in exponential notation with four significant decimals.
#[must_use]
pub fn scientific(value: f64, unit: &str) -> String {
    format!("{value:.4e} {unit}")
}

/// Formats a pair of the same quantity in two units, e.g. `1.234 mm (48.6 mil)`.
#[must_use]
pub fn dual(primary: f64, primary_unit: &str, secondary: f64, secondary_unit: &str) -> String {
    format!("{primary:.4} {primary_unit} ({secondary:.2} {secondary_unit})")
}
