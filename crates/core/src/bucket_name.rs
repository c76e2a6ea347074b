//! Bucket name grammar
//!
//! A bucket name is checked against an ordered list of rules. Evaluation stops at
//! the first rule that fails and only that reason is reported. Validation has no
//! side effects beyond debug tracing; rendering a [`NameViolation`] for the user is
//! left to the caller.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Minimum bucket name length, inclusive
pub const MIN_LEN: usize = 3;

/// Maximum bucket name length, inclusive
pub const MAX_LEN: usize = 255;

/// Separator between labels
const LABEL_SEPARATOR: char = '.';

/// Reason a candidate bucket name was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameViolation {
    /// Name is shorter than [`MIN_LEN`] or longer than [`MAX_LEN`]
    #[error("Bucket name must be between 3 and 255 characters long, inclusive (got {len})")]
    Length { len: usize },

    /// Name contains characters outside `[a-z0-9.-]`
    #[error("The following characters in your bucket name are invalid: {invalid}")]
    Charset {
        /// Offending characters in order of first occurrence, each listed once
        invalid: String,
    },

    /// Leading, trailing, or consecutive periods
    #[error("Bucket name may not begin or end with a period or contain consecutive periods")]
    EmptyLabel,

    /// A label begins or ends with a dash
    #[error("Label '{label}' may not begin or end with a dash")]
    LabelDashBoundary { label: String },

    /// Every label is numeric, e.g. `192.168.5.4`
    #[error("Bucket name may not be formatted like an IP address (e.g. 192.168.5.4)")]
    LooksLikeIpAddress,
}

impl NameViolation {
    /// Short machine-friendly tag for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            NameViolation::Length { .. } => "length",
            NameViolation::Charset { .. } => "charset",
            NameViolation::EmptyLabel => "empty_label",
            NameViolation::LabelDashBoundary { .. } => "label_dash_boundary",
            NameViolation::LooksLikeIpAddress => "looks_like_ip_address",
        }
    }
}

type Rule = fn(&str) -> Result<(), NameViolation>;

/// Grammar rules in evaluation order
const RULES: &[(&str, Rule)] = &[
    ("length", check_length),
    ("charset", check_charset),
    ("labels", check_labels),
    ("ip_address", check_not_ip_address),
];

/// Validate a candidate bucket name against the full grammar
pub fn validate(name: &str) -> Result<(), NameViolation> {
    for (rule, check) in RULES {
        if let Err(violation) = check(name) {
            tracing::debug!(bucket = name, rule, kind = violation.kind(), "bucket name rejected");
            return Err(violation);
        }
    }
    Ok(())
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'
}

fn labels(name: &str) -> impl Iterator<Item = &str> {
    name.split(LABEL_SEPARATOR)
}

fn check_length(name: &str) -> Result<(), NameViolation> {
    let len = name.chars().count();
    if (MIN_LEN..=MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(NameViolation::Length { len })
    }
}

fn check_charset(name: &str) -> Result<(), NameViolation> {
    let mut invalid = String::new();
    for c in name.chars().filter(|c| !is_allowed_char(*c)) {
        if !invalid.contains(c) {
            invalid.push(c);
        }
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(NameViolation::Charset { invalid })
    }
}

fn check_labels(name: &str) -> Result<(), NameViolation> {
    for label in labels(name) {
        if label.is_empty() {
            return Err(NameViolation::EmptyLabel);
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(NameViolation::LabelDashBoundary {
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

fn check_not_ip_address(name: &str) -> Result<(), NameViolation> {
    let mut total = 0usize;
    let mut numeric = 0usize;
    for label in labels(name) {
        total += 1;
        if label.parse::<i32>().is_ok() {
            numeric += 1;
        }
    }

    if numeric == total {
        Err(NameViolation::LooksLikeIpAddress)
    } else {
        Ok(())
    }
}

/// A bucket name that satisfies the full grammar
///
/// The only way to obtain one is through validation, so holding a `BucketName`
/// is proof the name is well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Validate `name` and wrap it
    pub fn parse(name: impl Into<String>) -> Result<Self, NameViolation> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for BucketName {
    type Err = NameViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for BucketName {
    type Error = NameViolation;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for BucketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
