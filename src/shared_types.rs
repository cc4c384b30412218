use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

pub mod directory;

/// Name the student service is published under. Client and server must agree
/// on this string exactly.
pub const SERVICE_NAME: &str = "StudentService";

/// Fixed port the registry listens on.
pub const REGISTRY_PORT: u16 = 1099;

/// Minimum marks to pass, also the lower bound of grade C.
pub const PASS_MARK: u8 = 40;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub marks: u8,
}

/// Grade letter computed from marks. Serializes as the bare letter ("A",
/// "B", "C", "Fail").
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    Fail,
}

impl Grade {
    /// Grade thresholds, inclusive lower bounds: 80 -> A, 60 -> B, 40 -> C.
    pub fn from_marks(marks: u8) -> Self {
        match marks {
            80.. => Grade::A,
            60..=79 => Grade::B,
            PASS_MARK..=59 => Grade::C,
            _ => Grade::Fail,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::Fail => "Fail",
        };
        f.write_str(s)
    }
}

/// Envelope returned by every student query: the typed payload on success,
/// a human-readable message on error.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryReply<T> {
    Success(T),
    Error { message: String },
}

impl<T> QueryReply<T> {
    /// The one error the directory ever reports.
    pub fn not_found() -> Self {
        QueryReply::Error {
            message: "Student not found".to_string(),
        }
    }
}

#[tarpc::service]
pub trait StudentService {
    /// Fetch name and marks for a roll number
    async fn get_student_details(roll_no: u32) -> QueryReply<StudentRecord>;
    /// Compute the grade letter for a roll number
    async fn get_grade(roll_no: u32) -> QueryReply<Grade>;
    /// Check whether a roll number passed
    async fn is_pass(roll_no: u32) -> QueryReply<bool>;
}

#[tarpc::service]
pub trait Registry {
    /// Publish an endpoint under a name, replacing any prior binding
    async fn rebind(name: String, addr: SocketAddr) -> ();
    /// Resolve a name to its bound endpoint
    async fn lookup(name: String) -> Option<SocketAddr>;
}
