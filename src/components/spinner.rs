use std::ops::RangeInclusive;

/// A drop-down style picker: a placeholder label until a value is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Spinner {
    placeholder: &'static str,
    values: Vec<String>,
    index: Option<usize>,
}

impl Spinner {
    pub fn new(placeholder: &'static str, values: Vec<String>) -> Self {
        Self {
            placeholder,
            values,
            index: None,
        }
    }

    /// Zero-padded numeric values, e.g. `00..=59` with width 2.
    pub fn numeric(placeholder: &'static str, range: RangeInclusive<i32>, width: usize) -> Self {
        let values = range.map(|n| format!("{n:0width$}")).collect();
        Self::new(placeholder, values)
    }

    pub fn select(&mut self, value: &str) {
        self.index = self.values.iter().position(|v| v == value);
    }

    pub fn next(&mut self) {
        if self.values.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(i) => (i + 1) % self.values.len(),
            None => 0,
        });
    }

    pub fn prev(&mut self) {
        if self.values.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(0) | None => self.values.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// The chosen value, or the placeholder.
    pub fn text(&self) -> &str {
        self.value().unwrap_or(self.placeholder)
    }

    pub fn value(&self) -> Option<&str> {
        self.index
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }
}
