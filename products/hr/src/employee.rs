use serde::{Deserialize, Serialize};

/// Stored when the designation field is left blank.
pub const DESIGNATION_NOT_SET: &str = "Not set";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub age: i64,
    pub salary: i64,
    pub designation: String,
}

impl Employee {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        age: i64,
        salary: i64,
        designation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            salary,
            designation: designation.into(),
        }
    }
}

/// Raw form input, kept exactly as typed until it is submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeDraft {
    pub name: String,
    pub age: String,
    pub salary: String,
    pub designation: String,
}

impl EmployeeDraft {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.age.is_empty()
            && self.salary.is_empty()
            && self.designation.is_empty()
    }

    /// Trimmed name, `None` when nothing but whitespace was entered.
    pub(crate) fn normalized_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub(crate) fn normalized_designation(&self) -> &str {
        match self.designation.trim() {
            "" => DESIGNATION_NOT_SET,
            designation => designation,
        }
    }
}

/// Reads a number out of free-form text, falling back to 0.
///
/// Integers are taken as-is, as are unsigned `0x`/`0o`/`0b` literals. Finite
/// decimals (`12.9`, `1e3`) are truncated toward zero. Anything else, blank
/// text and infinities included, is 0.
pub fn coerce_number(text: &str) -> i64 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

fn parse_radix_literal(text: &str) -> Option<i64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    // Too large for i64 saturates, like the decimal path.
    let value = u128::from_str_radix(digits, radix).unwrap_or(u128::MAX);
    Some(i64::try_from(value).unwrap_or(i64::MAX))
}
