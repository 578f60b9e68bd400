//! The student store.
//!
//! An ordered collection of students with unique ids. Order is insertion
//! order until [`StudentStore::sort_by_id`] is called. Lookups hand out
//! [`StudentHandle`]s, which stay valid until their student is deleted or
//! the store is cleared or reloaded.
//!
//! Mutations report success as `bool` and explain failures through the
//! store logger; the `export`/`import` variants return the typed results.

use super::arena::Arena;
use super::StudentHandle;
use crate::config::STORE_COMPONENT;
use crate::io::services::{
    ExportResult, ExportService, ImportResult, ImportService, create_data_file,
};
use crate::models::Student;
use crate::observability::{LogLevel, Logger, SharedLevel};
use crate::rendering;
use crate::Result;
use std::path::Path;

/// Ordered, id-unique collection of students.
#[derive(Debug, Clone)]
pub struct StudentStore {
    arena: Arena<Student>,
    order: Vec<StudentHandle>,
    logger: Logger,
    codec_logger: Logger,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new(Logger::new(
            STORE_COMPONENT,
            LogLevel::Info,
            &SharedLevel::default(),
        ))
    }
}

impl StudentStore {
    /// Creates an empty store logging through `logger`.
    ///
    /// The codec logs through `logger.child("codec")`.
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        let codec_logger = logger.child("codec");
        Self {
            arena: Arena::new(),
            order: Vec::new(),
            logger,
            codec_logger,
        }
    }

    /// Replaces the logger used by load and save.
    #[must_use]
    pub fn with_codec_logger(mut self, logger: Logger) -> Self {
        self.codec_logger = logger;
        self
    }

    /// Returns the store logger.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Returns the store logger mutably, to adjust its level.
    pub const fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Appends a student.
    ///
    /// Fails if a required field is empty or the id is already present.
    pub fn add(&mut self, student: Student) -> bool {
        if !student.is_valid() {
            self.logger
                .warn(format!("rejected student '{}': required field missing", student.id()));
            return false;
        }
        if self.find_by_id(student.id()).is_some() {
            self.logger
                .warn(format!("rejected student: id {} already exists", student.id()));
            return false;
        }

        self.logger
            .info(format!("added student {} ({})", student.id(), student.name()));
        self.insert(student);
        true
    }

    /// Deletes the student with `id`.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(handle) = self.find_by_id(id) else {
            self.logger.warn(format!("delete failed: no student with id {id}"));
            return false;
        };
        self.remove(handle)
    }

    /// Replaces the student with `id`, keeping its position and handle.
    ///
    /// The replacement may carry a different id as long as no other student
    /// already has it.
    pub fn update(&mut self, id: &str, student: Student) -> bool {
        let Some(handle) = self.find_by_id(id) else {
            self.logger.warn(format!("update failed: no student with id {id}"));
            return false;
        };
        if !student.is_valid() {
            self.logger
                .warn(format!("update of {id} rejected: required field missing"));
            return false;
        }
        if student.id() != id && self.find_by_id(student.id()).is_some() {
            self.logger.warn(format!(
                "update of {id} rejected: id {} already exists",
                student.id()
            ));
            return false;
        }

        let Some(slot) = self.arena.get_mut(handle) else {
            return false;
        };
        *slot = student;
        self.logger.info(format!("updated student {id}"));
        true
    }

    /// Returns the handle of the student with `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<StudentHandle> {
        self.order
            .iter()
            .copied()
            .find(|&handle| self.arena.get(handle).is_some_and(|s| s.id() == id))
    }

    /// Returns the student with `id`.
    #[must_use]
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.find_by_id(id).and_then(|handle| self.arena.get(handle))
    }

    /// Returns handles of students whose name contains `query`, in store
    /// order. Matching is case-sensitive.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<StudentHandle> {
        self.handles_where(|s| s.name().contains(query))
    }

    /// Returns handles of students named exactly `name`, in store order.
    #[must_use]
    pub fn find_by_name_exact(&self, name: &str) -> Vec<StudentHandle> {
        self.handles_where(|s| s.name() == name)
    }

    /// Returns the student behind `handle`, or `None` if it is stale.
    #[must_use]
    pub fn get(&self, handle: StudentHandle) -> Option<&Student> {
        self.arena.get(handle)
    }

    /// Returns whether `handle` still refers to a student.
    #[must_use]
    pub fn contains(&self, handle: StudentHandle) -> bool {
        self.arena.get(handle).is_some()
    }

    /// Returns the number of students.
    #[must_use]
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes every student. All handles become stale.
    pub fn clear(&mut self) {
        let count = self.count();
        self.reset();
        self.logger.info(format!("cleared {count} students"));
    }

    /// Sorts students by id, ascending. Handles stay valid.
    pub fn sort_by_id(&mut self) {
        let arena = &self.arena;
        self.order
            .sort_by(|&a, &b| arena.get(a).map(Student::id).cmp(&arena.get(b).map(Student::id)));
        self.logger.info(format!("sorted {} students by id", self.count()));
    }

    /// Iterates over students in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> + '_ {
        self.order
            .iter()
            .filter_map(|&handle| self.arena.get(handle))
    }

    /// Deletes the student named exactly `name`.
    ///
    /// With several matches, `choose` is shown the candidates in store order
    /// and returns a 1-based selection, or `None` to cancel.
    pub fn delete_by_name<F>(&mut self, name: &str, choose: F) -> bool
    where
        F: FnOnce(&[&Student]) -> Option<usize>,
    {
        let candidates = self.find_by_name_exact(name);
        match candidates.as_slice() {
            [] => {
                self.logger
                    .warn(format!("delete failed: no student named {name}"));
                false
            },
            [handle] => self.remove(*handle),
            _ => {
                let students: Vec<&Student> =
                    candidates.iter().filter_map(|&h| self.arena.get(h)).collect();
                let Some(selection) = choose(&students) else {
                    self.logger
                        .warn(format!("delete of {name} cancelled"));
                    return false;
                };
                self.delete_candidate(&candidates, selection)
            },
        }
    }

    /// Deletes the `selection`-th (1-based) of `candidates`.
    pub fn delete_candidate(&mut self, candidates: &[StudentHandle], selection: usize) -> bool {
        let Some(&handle) = selection
            .checked_sub(1)
            .and_then(|index| candidates.get(index))
        else {
            self.logger.warn(format!(
                "invalid selection {selection}: expected 1 to {}",
                candidates.len()
            ));
            return false;
        };
        self.remove(handle)
    }

    /// Records a score for the student with `id`.
    pub fn set_score(&mut self, id: &str, subject: &str, score: f64) -> bool {
        let Some(handle) = self.find_by_id(id) else {
            self.logger
                .warn(format!("set score failed: no student with id {id}"));
            return false;
        };
        let Some(student) = self.arena.get_mut(handle) else {
            return false;
        };
        match student.set_score(subject, score) {
            Ok(()) => {
                self.logger
                    .info(format!("recorded {subject} = {score} for {id}"));
                true
            },
            Err(e) => {
                self.logger.warn(format!("set score for {id} rejected: {e}"));
                false
            },
        }
    }

    /// Renders the scores report of the student with `id`.
    #[must_use]
    pub fn scores_report(&self, id: &str) -> String {
        rendering::scores_report(self.student(id))
    }

    /// Renders every student in store order.
    #[must_use]
    pub fn listing(&self) -> String {
        let students: Vec<&Student> = self.iter().collect();
        rendering::roster_listing(&students)
    }

    /// Writes the store to `path` in store order.
    pub fn save(&mut self, path: impl AsRef<Path>) -> bool {
        let result = self.export(path.as_ref());
        self.report_save(path.as_ref(), result)
    }

    /// Sorts the store by id, then writes it to `path`.
    ///
    /// Nothing is sorted if the file cannot be created.
    pub fn save_sorted(&mut self, path: impl AsRef<Path>) -> bool {
        let result = self.export_sorted(path.as_ref());
        self.report_save(path.as_ref(), result)
    }

    /// Replaces the contents of the store with the students in `path`.
    ///
    /// Returns `true` if at least one student was loaded. The store is left
    /// untouched if the file cannot be read.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        match self.import(path.as_ref()) {
            Ok(result) => result.has_imports(),
            Err(e) => {
                self.logger
                    .error(format!("load from {} failed: {e}", path.as_ref().display()));
                false
            },
        }
    }

    /// Writes the store to `path` in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn export(&self, path: &Path) -> Result<ExportResult> {
        let writer = create_data_file(path)?;
        self.exporter().export_to_writer(writer, self.iter())
    }

    /// Sorts the store by id, then writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn export_sorted(&mut self, path: &Path) -> Result<ExportResult> {
        let writer = create_data_file(path)?;
        self.sort_by_id();
        self.exporter().export_to_writer(writer, self.iter())
    }

    /// Replaces the contents of the store with the students in `path`.
    ///
    /// The admitted students are moved into the store, so the returned
    /// result carries counts and warnings but an empty `students` list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, in which case
    /// the store is unchanged.
    pub fn import(&mut self, path: &Path) -> Result<ImportResult> {
        let mut result = ImportService::new(self.codec_logger.clone()).import_from_file(path)?;
        self.reset();
        for student in std::mem::take(&mut result.students) {
            self.insert(student);
        }
        Ok(result)
    }

    fn exporter(&self) -> ExportService {
        ExportService::new(self.codec_logger.clone())
    }

    fn report_save(&self, path: &Path, result: Result<ExportResult>) -> bool {
        match result {
            Ok(result) => {
                self.logger.info(format!(
                    "saved {} students to {}",
                    result.exported,
                    path.display()
                ));
                true
            },
            Err(e) => {
                self.logger
                    .error(format!("save to {} failed: {e}", path.display()));
                false
            },
        }
    }

    fn insert(&mut self, student: Student) -> StudentHandle {
        let handle = self.arena.insert(student);
        self.order.push(handle);
        handle
    }

    fn remove(&mut self, handle: StudentHandle) -> bool {
        let Some(student) = self.arena.remove(handle) else {
            self.logger.warn("delete failed: student no longer exists");
            return false;
        };
        self.order.retain(|&h| h != handle);
        self.logger
            .info(format!("deleted student {} ({})", student.id(), student.name()));
        true
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.order.clear();
    }

    fn handles_where(&self, predicate: impl Fn(&Student) -> bool) -> Vec<StudentHandle> {
        self.order
            .iter()
            .copied()
            .filter(|&handle| self.arena.get(handle).is_some_and(&predicate))
            .collect()
    }
}

impl<'a> IntoIterator for &'a StudentStore {
    type Item = &'a Student;
    type IntoIter = Box<dyn Iterator<Item = &'a Student> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
