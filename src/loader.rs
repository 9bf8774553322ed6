//! Text format for problem instances and assignments.
//!
//! An instance is line oriented, with 1-indexed ids:
//!
//! ```raw
//! m n                 (number of hospitals, number of students)
//! c_1                 (capacity of each hospital, one per line)
//! ...
//! c_m
//! s s s ...           (preference list of each hospital, most preferred first)
//! ...
//! h h h ...           (preference list of each student, most preferred first)
//! ...
//! ```
//!
//! A blank preference line is an empty list. Ids are shifted to 0-indexed on
//! the way in and back to 1-indexed on the way out, where an unmatched student
//! is written as `0`.

use std::{
    fs::File,
    io::{BufRead, BufReader, Lines, Read, Write},
    path::Path,
};

use tracing::debug;

use crate::{error::LoadError, matching::Matching, preferences::Preferences};

/// Reads one instance from a line source, tracking line numbers for errors.
pub struct InstanceLoader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> InstanceLoader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self, expected: &'static str) -> Result<String, LoadError> {
        let line = self
            .lines
            .next()
            .ok_or(LoadError::UnexpectedEof { expected })??;
        self.line += 1;
        Ok(line)
    }

    fn numbers(&mut self, expected: &'static str) -> Result<Vec<usize>, LoadError> {
        let line = self.next_line(expected)?;
        line.split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| LoadError::Parse {
                    line: self.line,
                    token: token.to_owned(),
                })
            })
            .collect()
    }

    fn exact(&mut self, expected: &'static str, count: usize) -> Result<Vec<usize>, LoadError> {
        let numbers = self.numbers(expected)?;
        if numbers.len() != count {
            return Err(LoadError::TokenCount {
                line: self.line,
                expected: count,
                actual: numbers.len(),
            });
        }
        Ok(numbers)
    }

    // 1-indexed ids in 1..=max, returned 0-indexed
    fn ids(&mut self, expected: &'static str, max: usize) -> Result<Vec<usize>, LoadError> {
        let line = self.line + 1;
        self.numbers(expected)?
            .into_iter()
            .map(|id| {
                if (1..=max).contains(&id) {
                    Ok(id - 1)
                } else {
                    Err(LoadError::IdOutOfRange { line, id, max })
                }
            })
            .collect()
    }

    pub fn load(mut self) -> Result<Preferences, LoadError> {
        let header = self.exact("hospital and student counts", 2)?;
        let (m, n) = (header[0], header[1]);

        let capacities = (0..m)
            .map(|_| Ok(self.exact("hospital capacity", 1)?[0]))
            .collect::<Result<Vec<_>, LoadError>>()?;
        let hospital_lists = (0..m)
            .map(|_| self.ids("hospital preference list", n))
            .collect::<Result<Vec<_>, _>>()?;
        let student_lists = (0..n)
            .map(|_| self.ids("student preference list", m))
            .collect::<Result<Vec<_>, _>>()?;

        let prefs = Preferences::new(capacities, hospital_lists, student_lists)?;
        debug!(
            hospitals = m,
            students = n,
            slots = prefs.total_slots(),
            "loaded instance"
        );
        Ok(prefs)
    }
}

pub fn load_reader<R: Read>(reader: R) -> Result<Preferences, LoadError> {
    InstanceLoader::new(BufReader::new(reader)).load()
}

pub fn load_str(input: &str) -> Result<Preferences, LoadError> {
    InstanceLoader::new(input.as_bytes()).load()
}

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Preferences, LoadError> {
    load_reader(File::open(path)?)
}

/// Writes one line per student: its 1-indexed hospital, or `0` if unmatched.
pub fn write_assignments<W: Write>(matching: &Matching, mut writer: W) -> std::io::Result<()> {
    for hospital in matching.assignments() {
        writeln!(writer, "{}", hospital.map_or(0, |h| h + 1))?;
    }
    writer.flush()
}
