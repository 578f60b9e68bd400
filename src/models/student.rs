//! Student record entity.

use super::validation::{
    FieldResult, validate_class_id, validate_email, validate_gender, validate_id, validate_name,
    validate_phone, validate_score,
};
use std::collections::BTreeMap;
use std::fmt;

/// One student's identity, contact details and scores.
///
/// Fields are private so that every change goes through the same grammar
/// as construction. The only way to hold a record with empty required
/// fields is [`Student::default`], which the store never admits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Student {
    id: String,
    name: String,
    gender: String,
    class_id: String,
    phone: String,
    email: String,
    scores: BTreeMap<String, f64>,
}

impl Student {
    /// Creates a validated student record.
    ///
    /// Fields are checked in order id, name, gender, class id, then phone
    /// and email when they are non-empty.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`](super::ValidationError) of the first
    /// field that breaks its grammar.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gender: impl Into<String>,
        class_id: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> FieldResult<Self> {
        let student = Self {
            id: id.into(),
            name: name.into(),
            gender: gender.into(),
            class_id: class_id.into(),
            phone: phone.into(),
            email: email.into(),
            scores: BTreeMap::new(),
        };

        validate_id(&student.id)?;
        validate_name(&student.name)?;
        validate_gender(&student.gender)?;
        validate_class_id(&student.class_id)?;
        if !student.phone.is_empty() {
            validate_phone(&student.phone)?;
        }
        if !student.email.is_empty() {
            validate_email(&student.email)?;
        }

        Ok(student)
    }

    /// Returns the student id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the gender label.
    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Returns the class id.
    #[must_use]
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Returns the phone number, empty when unset.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the email address, empty when unset.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns all scores keyed by subject.
    #[must_use]
    pub const fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    /// Replaces the id after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not exactly ten digits.
    pub fn set_id(&mut self, id: impl Into<String>) -> FieldResult {
        let id = id.into();
        validate_id(&id)?;
        self.id = id;
        Ok(())
    }

    /// Replaces the name after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not 2-20 characters long.
    pub fn set_name(&mut self, name: impl Into<String>) -> FieldResult {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replaces the gender after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is not one of the recognized genders.
    pub fn set_gender(&mut self, gender: impl Into<String>) -> FieldResult {
        let gender = gender.into();
        validate_gender(&gender)?;
        self.gender = gender;
        Ok(())
    }

    /// Replaces the class id after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the class id is shorter than three bytes.
    pub fn set_class_id(&mut self, class_id: impl Into<String>) -> FieldResult {
        let class_id = class_id.into();
        validate_class_id(&class_id)?;
        self.class_id = class_id;
        Ok(())
    }

    /// Replaces the phone number. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty value is not a mobile number.
    pub fn set_phone(&mut self, phone: impl Into<String>) -> FieldResult {
        let phone = phone.into();
        if !phone.is_empty() {
            validate_phone(&phone)?;
        }
        self.phone = phone;
        Ok(())
    }

    /// Replaces the email address. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty value is not an email address.
    pub fn set_email(&mut self, email: impl Into<String>) -> FieldResult {
        let email = email.into();
        if !email.is_empty() {
            validate_email(&email)?;
        }
        self.email = email;
        Ok(())
    }

    /// Records a score, overwriting any previous score for `subject`.
    ///
    /// # Errors
    ///
    /// Returns an error if `subject` is empty or `score` is outside `[0, 100]`.
    /// The stored scores are unchanged on error.
    pub fn set_score(&mut self, subject: impl Into<String>, score: f64) -> FieldResult {
        let subject = subject.into();
        validate_score(&subject, score)?;
        self.scores.insert(subject, score);
        Ok(())
    }

    /// Returns the score for `subject`, if one was recorded.
    #[must_use]
    pub fn score(&self, subject: &str) -> Option<f64> {
        self.scores.get(subject).copied()
    }

    /// Removes the score for `subject`, returning it.
    pub fn remove_score(&mut self, subject: &str) -> Option<f64> {
        self.scores.remove(subject)
    }

    /// Returns the mean of all scores, or `0.0` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.scores.values().sum();
        sum / self.scores.len() as f64
    }

    /// Returns whether the required fields are all present.
    ///
    /// This does not re-run the format grammars.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.name.is_empty()
            && !self.gender.is_empty()
            && !self.class_id.is_empty()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::rendering::student_card(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;

    fn wang_fang() -> Student {
        Student::new("2023010001", "王芳", "女", "101", "", "").unwrap()
    }

    #[test]
    fn test_new_reads_back_fields() {
        let student = Student::new(
            "2023010002",
            "李雷",
            "男",
            "CS-2023-01",
            "13812345678",
            "li.lei@example.com",
        )
        .unwrap();

        assert_eq!(student.id(), "2023010002");
        assert_eq!(student.name(), "李雷");
        assert_eq!(student.gender(), "男");
        assert_eq!(student.class_id(), "CS-2023-01");
        assert_eq!(student.phone(), "13812345678");
        assert_eq!(student.email(), "li.lei@example.com");
        assert!(student.scores().is_empty());
        assert!(student.is_valid());
    }

    #[test]
    fn test_new_reports_first_failing_field() {
        // Both the name and the phone are bad; the name comes first.
        let err = Student::new("2023010001", "王", "女", "101", "123", "").unwrap_err();
        assert_eq!(err.field, Field::Name);

        let err = Student::new("2023010001", "王芳", "女", "101", "123", "bad").unwrap_err();
        assert_eq!(err.field, Field::Phone);

        let err = Student::new("2023010001", "王芳", "女", "101", "", "bad").unwrap_err();
        assert_eq!(err.field, Field::Email);
    }

    #[test]
    fn test_optional_fields_skip_validation_when_empty() {
        let student = Student::new("2023010001", "王芳", "女", "101", "", "").unwrap();
        assert_eq!(student.phone(), "");
        assert_eq!(student.email(), "");
    }

    #[test]
    fn test_setter_failure_leaves_field_unchanged() {
        let mut student = wang_fang();

        assert!(student.set_id("12345").is_err());
        assert_eq!(student.id(), "2023010001");

        assert!(student.set_gender("unknown").is_err());
        assert_eq!(student.gender(), "女");

        assert!(student.set_phone("13912345678").is_ok());
        assert!(student.set_phone("0000").is_err());
        assert_eq!(student.phone(), "13912345678");

        assert!(student.set_phone("").is_ok());
        assert_eq!(student.phone(), "");
    }

    #[test]
    fn test_set_score_bounds() {
        let mut student = wang_fang();

        assert!(student.set_score("Math", 100.0).is_ok());
        assert!(student.set_score("Math", 100.01).is_err());
        assert_eq!(student.score("Math"), Some(100.0));

        assert!(student.set_score("", 50.0).is_err());
        assert_eq!(student.scores().len(), 1);
    }

    #[test]
    fn test_set_score_overwrites() {
        let mut student = wang_fang();
        student.set_score("Math", 60.0).unwrap();
        student.set_score("Math", 75.5).unwrap();
        assert_eq!(student.score("Math"), Some(75.5));
        assert_eq!(student.scores().len(), 1);
    }

    #[test]
    fn test_score_missing_is_none() {
        let mut student = wang_fang();
        assert_eq!(student.score("Physics"), None);

        student.set_score("Physics", 0.0).unwrap();
        assert_eq!(student.score("Physics"), Some(0.0));

        assert_eq!(student.remove_score("Physics"), Some(0.0));
        assert_eq!(student.score("Physics"), None);
    }

    #[test]
    fn test_average_score() {
        let mut student = wang_fang();
        assert!((student.average_score() - 0.0).abs() < f64::EPSILON);

        student.set_score("Math", 80.0).unwrap();
        student.set_score("English", 90.0).unwrap();
        assert!((student.average_score() - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_is_not_valid() {
        assert!(!Student::default().is_valid());
    }
}
