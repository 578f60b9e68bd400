//! Score commands.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use super::{Session, require};
use crate::rendering::format_score;
use crate::Result;

/// Records `score` in `subject` for student `id`.
///
/// # Errors
///
/// Returns an error if the student is missing, the score is out of range,
/// or saving fails.
pub fn score(session: &mut Session, id: &str, subject: &str, score: f64) -> Result<()> {
    require(session.store_mut().set_score(id, subject, score), "set_score")?;
    session.commit()?;
    println!("已记录 {id} 的 {subject} 成绩: {}", format_score(score));
    Ok(())
}

/// Prints the scores report of student `id`.
///
/// # Errors
///
/// Never fails; a missing student is reported in the text.
pub fn report(session: &Session, id: &str) -> Result<()> {
    println!("{}", session.store().scores_report(id));
    Ok(())
}
