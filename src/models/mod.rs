//! Data models for roster.
//!
//! This module contains the student record entity and the field grammars
//! it enforces.

mod student;
mod validation;

pub use student::Student;
pub use validation::{
    CLASS_ID_MIN_LEN, Field, FieldResult, GENDERS, NAME_MAX_CHARS, NAME_MIN_CHARS, SCORE_RANGE,
    ValidationError, validate_class_id, validate_email, validate_gender, validate_id,
    validate_name, validate_phone, validate_score,
};
