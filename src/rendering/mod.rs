//! Text rendering for student records.
//!
//! Produces the fixed-layout text blocks shown to users: the per-student
//! info card, the scores report, the full listing and the list of
//! same-name candidates offered before a delete.

use crate::models::Student;
use std::fmt::Write;

/// Significant digits used when displaying scores.
const SIGNIFICANT_DIGITS: i32 = 6;

/// Separator printed between records.
pub const RULE: &str = "-------------------";

/// Placeholder for unset contact fields.
const UNSET: &str = "未设置";

/// Formats a score with six significant digits and no trailing zeros.
///
/// `92.5` renders as `92.5`, `85.0` as `85` and `256.0 / 3.0` as `85.3333`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_score(value: f64) -> String {
    if !value.is_normal() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Renders the info card for one student.
#[must_use]
pub fn student_card(student: &Student) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "学号: {}", student.id());
    let _ = writeln!(out, "姓名: {}", student.name());
    let _ = writeln!(out, "性别: {}", student.gender());
    let _ = writeln!(out, "班级: {}", student.class_id());
    let _ = writeln!(out, "电话: {}", or_unset(student.phone()));
    let _ = writeln!(out, "邮箱: {}", or_unset(student.email()));

    if !student.scores().is_empty() {
        out.push_str("成绩:\n");
        for (subject, score) in student.scores() {
            let _ = writeln!(out, "  {subject}: {}", format_score(*score));
        }
    }
    out
}

/// Renders the scores report for a student, or the not-found message.
///
/// Layout: id, name, then either the no-scores marker or one line per
/// subject followed by the average.
#[must_use]
pub fn scores_report(student: Option<&Student>) -> String {
    let Some(student) = student else {
        return "学生不存在".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "学号: {}", student.id());
    let _ = writeln!(out, "姓名: {}", student.name());

    if student.scores().is_empty() {
        out.push_str("该学生暂无成绩记录");
        return out;
    }

    out.push_str("成绩列表:\n");
    for (subject, score) in student.scores() {
        let _ = writeln!(out, "  {subject}: {}", format_score(*score));
    }
    let _ = write!(out, "平均分: {}", format_score(student.average_score()));
    out
}

/// Renders every student in order with a count header.
#[must_use]
pub fn roster_listing(students: &[&Student]) -> String {
    if students.is_empty() {
        return "当前没有学生数据。\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "=== 学生信息列表 ===");
    let _ = writeln!(out, "总数：{}", students.len());
    let _ = writeln!(out, "{RULE}");
    for student in students {
        out.push_str(&student_card(student));
        let _ = writeln!(out, "{RULE}");
    }
    out
}

/// Renders numbered same-name candidates, numbered from 1.
#[must_use]
pub fn candidate_listing(candidates: &[&Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "发现 {} 个同名学生：", candidates.len());
    for (index, student) in candidates.iter().enumerate() {
        let _ = write!(out, "[{}] ", index + 1);
        out.push_str(&student_card(student));
        let _ = writeln!(out, "{RULE}");
    }
    out
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { UNSET } else { value }
}
