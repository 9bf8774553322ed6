use nalgebra::DMatrix;
use num_traits::Bounded;

use crate::{error::PreferenceError, HospitalId, StudentId};

/// Ranks are positions in a preference list, lower is better.
pub type Rank = usize;

// marks a hospital the student never listed
#[inline]
fn absent() -> Rank {
    Bounded::max_value()
}

/// Both sides' preferences, validated and indexed for constant time lookup.
///
/// Hospital lists are kept as ordered student ids. Student lists are turned
/// into a dense `students x hospitals` rank table, where hospitals a student
/// never listed hold the `Rank::MAX` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    capacities: Vec<usize>,
    hospital_lists: Vec<Vec<StudentId>>,
    ranks: DMatrix<Rank>,
}

impl Preferences {
    /// Builds the store from 0-indexed ids.
    ///
    /// The number of hospitals is taken from `capacities`, the number of
    /// students from `student_lists`.
    pub fn new(
        capacities: Vec<usize>,
        hospital_lists: Vec<Vec<StudentId>>,
        student_lists: Vec<Vec<HospitalId>>,
    ) -> Result<Self, PreferenceError> {
        let (m, n) = (capacities.len(), student_lists.len());
        if hospital_lists.len() != m {
            return Err(PreferenceError::HospitalListCount {
                expected: m,
                actual: hospital_lists.len(),
            });
        }

        let mut seen = vec![false; n];
        for (hospital, list) in hospital_lists.iter().enumerate() {
            seen.fill(false);
            for &student in list {
                if student >= n {
                    return Err(PreferenceError::UnknownStudent { hospital, student });
                }
                if seen[student] {
                    return Err(PreferenceError::DuplicateStudent { hospital, student });
                }
                seen[student] = true;
            }
        }

        let mut ranks = DMatrix::from_element(n, m, absent());
        for (student, list) in student_lists.iter().enumerate() {
            for (rank, &hospital) in list.iter().enumerate() {
                if hospital >= m {
                    return Err(PreferenceError::UnknownHospital { student, hospital });
                }
                if ranks[(student, hospital)] != absent() {
                    return Err(PreferenceError::DuplicateHospital { student, hospital });
                }
                ranks[(student, hospital)] = rank;
            }
        }

        Ok(Self {
            capacities,
            hospital_lists,
            ranks,
        })
    }

    pub fn hospitals(&self) -> usize {
        self.capacities.len()
    }

    pub fn students(&self) -> usize {
        self.ranks.nrows()
    }

    /// # Panics
    ///
    /// Panics if `hospital` is out of range.
    pub fn capacity(&self, hospital: HospitalId) -> usize {
        self.capacities[hospital]
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    /// Sum of all capacities, saturating at `usize::MAX`.
    pub fn total_slots(&self) -> usize {
        self.capacities
            .iter()
            .fold(0, |total: usize, &capacity| total.saturating_add(capacity))
    }

    /// Sum of the hospital list lengths, the most proposals a run can make.
    pub fn total_preferences(&self) -> usize {
        self.hospital_lists.iter().map(Vec::len).sum()
    }

    /// # Panics
    ///
    /// Panics if `hospital` is out of range.
    pub fn preference_list(&self, hospital: HospitalId) -> &[StudentId] {
        &self.hospital_lists[hospital]
    }

    /// The `index`-th most preferred student of `hospital`, if the list is
    /// that long.
    ///
    /// # Panics
    ///
    /// Panics if `hospital` is out of range.
    #[inline]
    pub fn preference_of(&self, hospital: HospitalId, index: usize) -> Option<StudentId> {
        self.hospital_lists[hospital].get(index).copied()
    }

    /// Position of `hospital` in `student`'s list, `None` if it is not listed.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of range.
    #[inline]
    pub fn rank_of(&self, student: StudentId, hospital: HospitalId) -> Option<Rank> {
        let rank = self.ranks[(student, hospital)];
        (rank != absent()).then_some(rank)
    }

    /// Every `(hospital, student)` pair where the hospital lists the student
    /// but the student does not list the hospital.
    pub fn unlisted_pairs(&self) -> impl Iterator<Item = (HospitalId, StudentId)> + '_ {
        self.hospital_lists
            .iter()
            .enumerate()
            .flat_map(move |(hospital, list)| {
                list.iter()
                    .filter(move |&&student| self.rank_of(student, hospital).is_none())
                    .map(move |&student| (hospital, student))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Preferences {
        Preferences::new(
            vec![1, 2],
            vec![vec![0, 1, 2], vec![2, 0]],
            vec![vec![1, 0], vec![0], vec![1]],
        )
        .expect("valid preferences")
    }

    #[test]
    fn dimensions() {
        let prefs = sample();
        assert_eq!(prefs.hospitals(), 2);
        assert_eq!(prefs.students(), 3);
        assert_eq!(prefs.total_slots(), 3);
        assert_eq!(prefs.total_preferences(), 5);
        assert_eq!(prefs.capacity(1), 2);
    }

    #[test]
    fn total_slots_saturates() {
        let half = usize::MAX / 2 + 1;
        let prefs = Preferences::new(vec![half, half], vec![vec![], vec![]], vec![])
            .expect("valid preferences");
        assert_eq!(prefs.total_slots(), usize::MAX);
    }

    #[test]
    fn preference_lookup() {
        let prefs = sample();
        assert_eq!(prefs.preference_of(0, 0), Some(0));
        assert_eq!(prefs.preference_of(1, 0), Some(2));
        assert_eq!(prefs.preference_of(1, 1), Some(0));
        assert_eq!(prefs.preference_of(1, 2), None);
    }

    #[test]
    fn rank_lookup() {
        let prefs = sample();
        assert_eq!(prefs.rank_of(0, 1), Some(0));
        assert_eq!(prefs.rank_of(0, 0), Some(1));
        assert_eq!(prefs.rank_of(1, 0), Some(0));
        assert_eq!(prefs.rank_of(1, 1), None);
        assert_eq!(prefs.rank_of(2, 0), None);
    }

    #[test]
    fn unlisted() {
        let prefs = sample();
        let pairs: Vec<_> = prefs.unlisted_pairs().collect();
        assert_eq!(pairs, vec![(0, 2)]);
    }

    #[test]
    fn empty_lists() {
        let prefs = Preferences::new(vec![0], vec![vec![]], vec![vec![], vec![]])
            .expect("empty lists are allowed");
        assert_eq!(prefs.total_preferences(), 0);
        assert_eq!(prefs.preference_of(0, 0), None);
        assert_eq!(prefs.rank_of(1, 0), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Preferences::new(vec![1], vec![], vec![vec![0]]),
            Err(PreferenceError::HospitalListCount {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            Preferences::new(vec![1], vec![vec![1]], vec![vec![0]]),
            Err(PreferenceError::UnknownStudent {
                hospital: 0,
                student: 1
            })
        );
        assert_eq!(
            Preferences::new(vec![1], vec![vec![0, 0]], vec![vec![0]]),
            Err(PreferenceError::DuplicateStudent {
                hospital: 0,
                student: 0
            })
        );
        assert_eq!(
            Preferences::new(vec![1], vec![vec![0]], vec![vec![3]]),
            Err(PreferenceError::UnknownHospital {
                student: 0,
                hospital: 3
            })
        );
        assert_eq!(
            Preferences::new(vec![1], vec![vec![0]], vec![vec![0, 0]]),
            Err(PreferenceError::DuplicateHospital {
                student: 0,
                hospital: 0
            })
        );
    }
}
