use thiserror::Error;

use crate::{HospitalId, StudentId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("expected {expected} hospital preference lists, got {actual}")]
    HospitalListCount { expected: usize, actual: usize },

    // a hospital list names a student id >= n
    #[error("hospital {hospital} lists unknown student {student}")]
    UnknownStudent {
        hospital: HospitalId,
        student: StudentId,
    },

    // a student list names a hospital id >= m
    #[error("student {student} lists unknown hospital {hospital}")]
    UnknownHospital {
        student: StudentId,
        hospital: HospitalId,
    },

    #[error("hospital {hospital} lists student {student} more than once")]
    DuplicateStudent {
        hospital: HospitalId,
        student: StudentId,
    },

    #[error("student {student} lists hospital {hospital} more than once")]
    DuplicateHospital {
        student: StudentId,
        hospital: HospitalId,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("preference list exhausted: hospital {hospital} has a free slot and no students left to propose to")]
    ListExhausted { hospital: HospitalId },

    #[error("hospital {hospital} would propose to student {student}, who does not list it")]
    UnlistedHospital {
        hospital: HospitalId,
        student: StudentId,
    },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}: could not parse token '{token}' as an integer")]
    Parse { line: usize, token: String },

    #[error("line {line}: expected {expected} token(s), got {actual}")]
    TokenCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    // ids in the input are 1-indexed, so 0 is out of range as well
    #[error("line {line}: id {id} is outside 1..={max}")]
    IdOutOfRange { line: usize, id: usize, max: usize },

    #[error(transparent)]
    Preferences(#[from] PreferenceError),
}
