//! Student record commands.
//!
//! ```bash
//! roster add 2023010001 王芳 女 101 --email wf@example.com
//! roster update 2023010001 王芳 女 102
//! roster find 王 --exact
//! roster delete-by-name 王芳
//! ```

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]
// Allow pass-by-value for command functions (consistent with main.rs)
#![allow(clippy::needless_pass_by_value)]

use super::{Session, require};
use crate::models::Student;
use crate::rendering::{RULE, candidate_listing, student_card};
use crate::{Error, Result};
use clap::Args;
use std::io::{self, BufRead, Write};

/// Fields of a student given on the command line.
#[derive(Debug, Clone, Args)]
pub struct StudentArgs {
    /// Student id (10 digits).
    pub id: String,
    /// Name (2 to 20 characters).
    pub name: String,
    /// Gender: 男 or 女.
    pub gender: String,
    /// Class id (at least 3 characters).
    pub class_id: String,
    /// Mobile phone number.
    #[arg(long, default_value = "")]
    pub phone: String,
    /// Email address.
    #[arg(long, default_value = "")]
    pub email: String,
}

impl StudentArgs {
    /// Validates the fields into a student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for the first invalid field.
    pub fn into_student(self) -> Result<Student> {
        Ok(Student::new(
            self.id,
            self.name,
            self.gender,
            self.class_id,
            self.phone,
            self.email,
        )?)
    }
}

/// Adds a student.
///
/// # Errors
///
/// Returns an error if a field is invalid, the id exists, or saving fails.
pub fn add(session: &mut Session, args: StudentArgs) -> Result<()> {
    let student = args.into_student()?;
    let id = student.id().to_string();
    require(session.store_mut().add(student), "add_student")?;
    session.commit()?;
    println!("已添加学生 {id}");
    Ok(())
}

/// Replaces the fields of student `id`. Recorded scores are kept.
///
/// # Errors
///
/// Returns an error if a field is invalid, the student is missing, the new
/// id is taken, or saving fails.
pub fn update(session: &mut Session, id: &str, args: StudentArgs) -> Result<()> {
    let mut student = args.into_student()?;
    if let Some(existing) = session.store().student(id) {
        for (subject, score) in existing.scores() {
            student.set_score(subject.clone(), *score)?;
        }
    }
    require(session.store_mut().update(id, student), "update_student")?;
    session.commit()?;
    println!("已更新学生 {id}");
    Ok(())
}

/// Deletes student `id`.
///
/// # Errors
///
/// Returns an error if the student is missing or saving fails.
pub fn delete(session: &mut Session, id: &str) -> Result<()> {
    require(session.store_mut().delete(id), "delete_student")?;
    session.commit()?;
    println!("已删除学生 {id}");
    Ok(())
}

/// Deletes the student named exactly `name`.
///
/// With several matches the candidates are listed and `pick` selects one
/// (1-based); without `pick` the selection is read from stdin.
///
/// # Errors
///
/// Returns an error if nobody matches, the selection is invalid, or saving
/// fails.
pub fn delete_by_name(session: &mut Session, name: &str, pick: Option<usize>) -> Result<()> {
    let candidates = session.store().find_by_name_exact(name);

    let accepted = if candidates.len() > 1 {
        let students: Vec<&Student> = candidates
            .iter()
            .filter_map(|&handle| session.store().get(handle))
            .collect();
        print!("{}", candidate_listing(&students));

        let selection = match pick {
            Some(selection) => selection,
            None => prompt_selection(&mut io::stdin().lock(), candidates.len())?,
        };
        session.store_mut().delete_candidate(&candidates, selection)
    } else {
        session.store_mut().delete_by_name(name, |_| pick)
    };

    require(accepted, "delete_student")?;
    session.commit()?;
    println!("已删除学生 {name}");
    Ok(())
}

/// Prints student `id`.
///
/// # Errors
///
/// Returns an error if the student is missing.
pub fn show(session: &Session, id: &str) -> Result<()> {
    let student = session
        .store()
        .student(id)
        .ok_or_else(|| Error::InvalidInput(format!("no student with id {id}")))?;
    print!("{}", student_card(student));
    Ok(())
}

/// Prints students whose name contains `query`, or equals it with `exact`.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn find(session: &Session, query: &str, exact: bool) -> Result<()> {
    let store = session.store();
    let handles = if exact {
        store.find_by_name_exact(query)
    } else {
        store.find_by_name(query)
    };

    if handles.is_empty() {
        println!("未找到匹配的学生");
        return Ok(());
    }

    println!("找到 {} 个学生：", handles.len());
    for student in handles.into_iter().filter_map(|handle| store.get(handle)) {
        print!("{}", student_card(student));
        println!("{RULE}");
    }
    Ok(())
}

/// Prints every student in store order.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn list(session: &Session) -> Result<()> {
    print!("{}", session.store().listing());
    Ok(())
}

/// Sorts the data file by id.
///
/// # Errors
///
/// Returns an error if saving fails.
pub fn sort(session: &mut Session) -> Result<()> {
    session.store_mut().sort_by_id();
    session.commit()?;
    println!("已按学号排序 {} 名学生", session.store().count());
    Ok(())
}

/// Reads a 1-based selection among `count` candidates.
fn prompt_selection(input: &mut impl BufRead, count: usize) -> Result<usize> {
    print!("请选择要删除的学生编号 (1-{count}): ");
    io::stdout().flush().map_err(|e| Error::OperationFailed {
        operation: "flush_stdout".to_string(),
        cause: e.to_string(),
    })?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| Error::OperationFailed {
            operation: "read_stdin".to_string(),
            cause: e.to_string(),
        })?;
    if read == 0 {
        return Err(Error::InvalidInput("no selection given".to_string()));
    }

    line.trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("invalid selection: {}", line.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StudentStore;
    use std::io::Cursor;

    fn args(id: &str, name: &str) -> StudentArgs {
        StudentArgs {
            id: id.to_string(),
            name: name.to_string(),
            gender: "女".to_string(),
            class_id: "101".to_string(),
            phone: String::new(),
            email: String::new(),
        }
    }

    fn session(dir: &tempfile::TempDir) -> Session {
        Session::with_store(StudentStore::default(), &dir.path().join("students.csv")).unwrap()
    }

    #[test]
    fn test_into_student_rejects_bad_id() {
        let err = args("123", "王芳").into_student().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_add_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);

        add(&mut session, args("2023010001", "王芳")).unwrap();
        assert!(add(&mut session, args("2023010001", "李雷")).is_err());

        let text = std::fs::read_to_string(session.data_file()).unwrap();
        assert!(text.contains("2023010001,王芳,女,101,,,无成绩"));
    }

    #[test]
    fn test_update_keeps_scores() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        add(&mut session, args("2023010001", "王芳")).unwrap();
        assert!(session.store_mut().set_score("2023010001", "数学", 92.5));

        update(&mut session, "2023010001", args("2023010001", "王小芳")).unwrap();

        let student = session.store().student("2023010001").unwrap();
        assert_eq!(student.name(), "王小芳");
        assert_eq!(student.score("数学"), Some(92.5));
    }

    #[test]
    fn test_delete_by_name_with_pick() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        add(&mut session, args("2023010001", "王芳")).unwrap();
        add(&mut session, args("2023010002", "王芳")).unwrap();

        assert!(delete_by_name(&mut session, "王芳", Some(3)).is_err());
        delete_by_name(&mut session, "王芳", Some(2)).unwrap();

        assert!(session.store().student("2023010001").is_some());
        assert!(session.store().student("2023010002").is_none());
    }

    #[test]
    fn test_show_missing() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        assert!(show(&session, "2023010001").is_err());
    }

    #[test]
    fn test_prompt_selection() {
        assert_eq!(prompt_selection(&mut Cursor::new("2\n"), 3).unwrap(), 2);
        assert!(prompt_selection(&mut Cursor::new("two\n"), 3).is_err());
        assert!(prompt_selection(&mut Cursor::new(""), 3).is_err());
    }
}
