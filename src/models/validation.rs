//! Field validation grammars.
//!
//! Every student field has one grammar, shared by construction and by the
//! setters. Validators return the first rule a value breaks.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// The two recognized gender labels.
pub const GENDERS: [&str; 2] = ["男", "女"];

/// Minimum name length in characters.
pub const NAME_MIN_CHARS: usize = 2;

/// Maximum name length in characters.
pub const NAME_MAX_CHARS: usize = 20;

/// Minimum class id length in bytes.
pub const CLASS_ID_MIN_LEN: usize = 3;

/// Inclusive score range.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// Characters a subject may not contain: the scores-column separators and
/// line breaks.
pub const SUBJECT_RESERVED: [char; 4] = [';', ':', '\n', '\r'];

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("static regex: student id pattern"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("static regex: mobile phone pattern"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("static regex: email pattern")
});

/// A validated field of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Student id.
    Id,
    /// Display name.
    Name,
    /// Gender label.
    Gender,
    /// Class identifier.
    ClassId,
    /// Mobile phone number.
    Phone,
    /// Email address.
    Email,
    /// Score subject name.
    Subject,
    /// Score value.
    Score,
}

impl Field {
    /// Returns the field name used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Gender => "gender",
            Self::ClassId => "class_id",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value that breaks its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// The field that failed.
    pub field: Field,
    /// Which rule was broken.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    #[must_use]
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Result of a field validation or of an operation that validates fields.
pub type FieldResult<T = ()> = std::result::Result<T, ValidationError>;

/// Validates a student id: exactly ten ASCII digits.
pub fn validate_id(id: &str) -> FieldResult {
    if id.is_empty() {
        return Err(ValidationError::new(Field::Id, "must not be empty"));
    }
    if !ID_REGEX.is_match(id) {
        return Err(ValidationError::new(Field::Id, "must be exactly 10 digits"));
    }
    Ok(())
}

/// Validates a name by character count.
pub fn validate_name(name: &str) -> FieldResult {
    if name.is_empty() {
        return Err(ValidationError::new(Field::Name, "must not be empty"));
    }
    if has_line_break(name) {
        return Err(ValidationError::new(Field::Name, "must be a single line"));
    }
    let chars = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::new(
            Field::Name,
            format!("must be {NAME_MIN_CHARS}-{NAME_MAX_CHARS} characters long (got {chars})"),
        ));
    }
    Ok(())
}

/// Validates a gender label against [`GENDERS`].
pub fn validate_gender(gender: &str) -> FieldResult {
    if GENDERS.contains(&gender) {
        return Ok(());
    }
    Err(ValidationError::new(
        Field::Gender,
        format!("must be '{}' or '{}'", GENDERS[0], GENDERS[1]),
    ))
}

/// Validates a class id: non-empty, at least three bytes.
pub fn validate_class_id(class_id: &str) -> FieldResult {
    if class_id.is_empty() {
        return Err(ValidationError::new(Field::ClassId, "must not be empty"));
    }
    if has_line_break(class_id) {
        return Err(ValidationError::new(Field::ClassId, "must be a single line"));
    }
    if class_id.len() < CLASS_ID_MIN_LEN {
        return Err(ValidationError::new(
            Field::ClassId,
            format!("must be at least {CLASS_ID_MIN_LEN} characters long"),
        ));
    }
    Ok(())
}

/// Validates a non-empty mobile phone number.
pub fn validate_phone(phone: &str) -> FieldResult {
    if PHONE_REGEX.is_match(phone) {
        return Ok(());
    }
    Err(ValidationError::new(
        Field::Phone,
        "must be an 11-digit mobile number starting with 13-19",
    ))
}

/// Validates a non-empty email address.
pub fn validate_email(email: &str) -> FieldResult {
    if EMAIL_REGEX.is_match(email) {
        return Ok(());
    }
    Err(ValidationError::new(
        Field::Email,
        "must look like name@domain.tld",
    ))
}

/// Validates a score assignment.
pub fn validate_score(subject: &str, score: f64) -> FieldResult {
    if subject.is_empty() {
        return Err(ValidationError::new(Field::Subject, "must not be empty"));
    }
    if let Some(separator) = subject.chars().find(|c| SUBJECT_RESERVED.contains(c)) {
        return Err(ValidationError::new(
            Field::Subject,
            format!("must not contain {separator:?}"),
        ));
    }
    // NaN fails the range check as well.
    if !SCORE_RANGE.contains(&score) {
        return Err(ValidationError::new(
            Field::Score,
            format!("must be between 0 and 100 (got {score})"),
        ));
    }
    Ok(())
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2023010001" => true ; "ten digits")]
    #[test_case("202301000" => false ; "nine digits")]
    #[test_case("20230100011" => false ; "eleven digits")]
    #[test_case("20230100a1" => false ; "letter inside")]
    #[test_case("２０２３０１０００１" => false ; "fullwidth digits")]
    #[test_case("" => false ; "empty")]
    fn test_validate_id(id: &str) -> bool {
        validate_id(id).is_ok()
    }

    #[test_case("王芳" => true ; "two chinese characters")]
    #[test_case("王" => false ; "one character")]
    #[test_case("Al" => true ; "two ascii characters")]
    #[test_case("一二三四五六七八九十一二三四五六七八九十" => true ; "twenty characters")]
    #[test_case("一二三四五六七八九十一二三四五六七八九十一" => false ; "twenty one characters")]
    fn test_validate_name(name: &str) -> bool {
        validate_name(name).is_ok()
    }

    #[test_case("13812345678" => true ; "valid mobile")]
    #[test_case("19912345678" => true ; "nineteen prefix")]
    #[test_case("12812345678" => false ; "second digit two")]
    #[test_case("1381234567" => false ; "ten digits")]
    #[test_case("138123456789" => false ; "twelve digits")]
    fn test_validate_phone(phone: &str) -> bool {
        validate_phone(phone).is_ok()
    }

    #[test_case("wang.fang@example.com" => true ; "plain")]
    #[test_case("a+b%c@mail.school.edu.cn" => true ; "subdomains and symbols")]
    #[test_case("wangfang@example" => false ; "no tld")]
    #[test_case("wangfang@example.c" => false ; "one letter tld")]
    #[test_case("@example.com" => false ; "no local part")]
    fn test_validate_email(email: &str) -> bool {
        validate_email(email).is_ok()
    }

    #[test]
    fn test_validate_gender() {
        assert!(validate_gender("男").is_ok());
        assert!(validate_gender("女").is_ok());
        let err = validate_gender("male").unwrap_err();
        assert_eq!(err.field, Field::Gender);
    }

    #[test]
    fn test_validate_rejects_line_breaks() {
        assert_eq!(validate_name("王\n芳").unwrap_err().field, Field::Name);
        assert_eq!(validate_class_id("10\r1").unwrap_err().field, Field::ClassId);
    }

    #[test]
    fn test_validate_class_id_counts_bytes() {
        assert!(validate_class_id("101").is_ok());
        assert!(validate_class_id("一班").is_ok());
        assert!(validate_class_id("10").is_err());
        assert_eq!(
            validate_class_id("").unwrap_err().reason,
            "must not be empty"
        );
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score("Math", 0.0).is_ok());
        assert!(validate_score("Math", 100.0).is_ok());
        assert_eq!(
            validate_score("Math", 100.01).unwrap_err().field,
            Field::Score
        );
        assert!(validate_score("Math", -0.5).is_err());
        assert!(validate_score("Math", f64::NAN).is_err());
        assert_eq!(validate_score("", 50.0).unwrap_err().field, Field::Subject);
    }

    #[test_case("数学;语文" ; "entry separator")]
    #[test_case("C:D" ; "score separator")]
    #[test_case("物理\n化学" ; "line break")]
    fn test_validate_score_rejects_separators(subject: &str) {
        let err = validate_score(subject, 50.0).unwrap_err();
        assert_eq!(err.field, Field::Subject);
        assert!(err.reason.starts_with("must not contain"));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = validate_id("123").unwrap_err();
        assert_eq!(err.to_string(), "invalid id: must be exactly 10 digits");
    }
}
