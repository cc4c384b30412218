use std::collections::HashMap;

use crate::{Grade, QueryReply, StudentRecord, PASS_MARK};

/// In-memory roll-number directory. Populated once at construction and never
/// mutated afterwards, so it can be shared across request tasks without
/// locking.
pub struct StudentDirectory {
    students: HashMap<u32, StudentRecord>,
}

impl StudentDirectory {
    pub fn new(students: HashMap<u32, StudentRecord>) -> Self {
        Self { students }
    }

    /// Directory preloaded with the sample records served by the demo.
    pub fn with_seed_records() -> Self {
        let mut students = HashMap::new();
        students.insert(
            101,
            StudentRecord {
                name: "Arun".to_string(),
                marks: 85,
            },
        );
        students.insert(
            102,
            StudentRecord {
                name: "Divya".to_string(),
                marks: 72,
            },
        );
        students.insert(
            103,
            StudentRecord {
                name: "Karthik".to_string(),
                marks: 39,
            },
        );
        Self::new(students)
    }

    pub fn get(&self, roll_no: u32) -> Option<&StudentRecord> {
        self.students.get(&roll_no)
    }

    pub fn details(&self, roll_no: u32) -> QueryReply<StudentRecord> {
        match self.get(roll_no) {
            Some(record) => {
                tracing::info!(roll_no, "sent student details");
                QueryReply::Success(record.clone())
            }
            None => QueryReply::not_found(),
        }
    }

    pub fn grade(&self, roll_no: u32) -> QueryReply<Grade> {
        match self.get(roll_no) {
            Some(record) => {
                tracing::info!(roll_no, "grade calculated");
                QueryReply::Success(Grade::from_marks(record.marks))
            }
            None => QueryReply::not_found(),
        }
    }

    pub fn pass(&self, roll_no: u32) -> QueryReply<bool> {
        match self.get(roll_no) {
            Some(record) => {
                tracing::info!(roll_no, "pass status checked");
                QueryReply::Success(record.marks >= PASS_MARK)
            }
            None => QueryReply::not_found(),
        }
    }
}

impl Default for StudentDirectory {
    fn default() -> Self {
        Self::with_seed_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_records_are_returned_exactly() {
        let dir = StudentDirectory::with_seed_records();

        assert_eq!(
            dir.details(101),
            QueryReply::Success(StudentRecord {
                name: "Arun".to_string(),
                marks: 85,
            })
        );
        assert_eq!(
            dir.details(102),
            QueryReply::Success(StudentRecord {
                name: "Divya".to_string(),
                marks: 72,
            })
        );
        assert_eq!(
            dir.details(103),
            QueryReply::Success(StudentRecord {
                name: "Karthik".to_string(),
                marks: 39,
            })
        );
    }

    #[test]
    fn unknown_roll_number_errors_on_every_operation() {
        let dir = StudentDirectory::with_seed_records();
        let expected = QueryReply::Error {
            message: "Student not found".to_string(),
        };

        assert_eq!(dir.details(999), expected);
        assert_eq!(dir.grade(999), QueryReply::not_found());
        assert_eq!(dir.pass(999), QueryReply::not_found());
    }

    #[test]
    fn seeded_grades() {
        let dir = StudentDirectory::with_seed_records();

        assert_eq!(dir.grade(101), QueryReply::Success(Grade::A));
        assert_eq!(dir.grade(102), QueryReply::Success(Grade::B));
        assert_eq!(dir.grade(103), QueryReply::Success(Grade::Fail));
    }

    #[test]
    fn grade_bands_have_inclusive_lower_bounds() {
        assert_eq!(Grade::from_marks(100), Grade::A);
        assert_eq!(Grade::from_marks(80), Grade::A);
        assert_eq!(Grade::from_marks(79), Grade::B);
        assert_eq!(Grade::from_marks(60), Grade::B);
        assert_eq!(Grade::from_marks(59), Grade::C);
        assert_eq!(Grade::from_marks(40), Grade::C);
        assert_eq!(Grade::from_marks(39), Grade::Fail);
        assert_eq!(Grade::from_marks(0), Grade::Fail);
    }

    #[test]
    fn pass_requires_forty_marks() {
        let mut students = HashMap::new();
        students.insert(
            1,
            StudentRecord {
                name: "Just below".to_string(),
                marks: 39,
            },
        );
        students.insert(
            2,
            StudentRecord {
                name: "Just enough".to_string(),
                marks: 40,
            },
        );
        let dir = StudentDirectory::new(students);

        assert_eq!(dir.pass(1), QueryReply::Success(false));
        assert_eq!(dir.pass(2), QueryReply::Success(true));
    }

    #[test]
    fn repeated_queries_return_identical_envelopes() {
        let dir = StudentDirectory::with_seed_records();

        assert_eq!(dir.details(103), dir.details(103));
        assert_eq!(dir.grade(103), dir.grade(103));
        assert_eq!(dir.pass(103), dir.pass(103));
    }
}
