//! Export and import commands.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use super::Session;
use crate::{Error, Result};
use std::path::Path;

/// Writes the roster, sorted by id, to `path`.
///
/// The data file is rewritten in the same order.
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn export(session: &mut Session, path: &Path) -> Result<()> {
    let result = session.store_mut().export_sorted(path)?;
    session.commit()?;
    println!("已导出 {} 名学生到 {}", result.exported, path.display());
    Ok(())
}

/// Replaces the roster with the students in `path` and saves it.
///
/// The current roster is kept when `path` yields no valid student.
///
/// # Errors
///
/// Returns an error if `path` cannot be read, holds no valid student, or
/// the data file cannot be written.
pub fn import(session: &mut Session, path: &Path) -> Result<()> {
    let mut incoming = session.store().clone();
    let result = incoming.import(path)?;
    if !result.has_imports() {
        return Err(Error::OperationFailed {
            operation: "import_students".to_string(),
            cause: format!(
                "no valid students in {} ({} rows skipped)",
                path.display(),
                result.skipped_rows()
            ),
        });
    }

    *session.store_mut() = incoming;
    session.commit()?;
    println!("已导入 {} 名学生 (共 {} 行)", result.imported, result.total_rows);
    if !result.warnings.is_empty() {
        println!("跳过 {} 项:", result.warnings.len());
        for warning in &result.warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StudentStore;

    #[test]
    fn test_import_then_export_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("incoming.csv");
        std::fs::write(
            &source,
            "学号,姓名,性别,班级,电话,邮箱,成绩信息\n\
             2023010002,李雷,男,102,,,无成绩\n\
             2023010001,王芳,女,101,,,数学:92.5\n\
             bad,row\n",
        )
        .unwrap();

        let data_file = dir.path().join("students.csv");
        let mut session = Session::with_store(StudentStore::default(), &data_file).unwrap();
        import(&mut session, &source).unwrap();
        assert_eq!(session.store().count(), 2);
        assert!(data_file.exists());

        let target = dir.path().join("sorted.csv");
        export(&mut session, &target).unwrap();
        let text = std::fs::read_to_string(&target).unwrap();
        let ids: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();
        assert_eq!(ids, ["2023010001", "2023010002"]);
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            Session::with_store(StudentStore::default(), &dir.path().join("students.csv"))
                .unwrap();
        assert!(import(&mut session, &dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_import_without_valid_students_keeps_roster() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("students.csv");
        let mut session = Session::with_store(StudentStore::default(), &data_file).unwrap();
        let student = crate::models::Student::new("2023010001", "王芳", "女", "101", "", "");
        assert!(session.store_mut().add(student.unwrap()));
        session.commit().unwrap();
        let saved = std::fs::read_to_string(&data_file).unwrap();

        let header_only = dir.path().join("header_only.csv");
        std::fs::write(&header_only, "学号,姓名,性别,班级,电话,邮箱,成绩信息\n").unwrap();
        let err = import(&mut session, &header_only).unwrap_err();
        assert!(err.to_string().contains("import_students"));

        let all_invalid = dir.path().join("invalid.csv");
        std::fs::write(&all_invalid, "123,王芳,女,101,,,无成绩\nbad,row\n").unwrap();
        assert!(import(&mut session, &all_invalid).is_err());

        assert_eq!(session.store().count(), 1);
        assert!(session.store().student("2023010001").is_some());
        assert_eq!(std::fs::read_to_string(&data_file).unwrap(), saved);
    }
}
