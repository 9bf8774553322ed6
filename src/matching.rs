use crate::{engine::UnlistedPolicy, preferences::Preferences, HospitalId, StudentId};

/// Final assignment produced by a run of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    assignment: Vec<Option<HospitalId>>,
    unfilled: Vec<usize>,
    proposals: usize,
}

impl Matching {
    pub(crate) fn new(
        assignment: Vec<Option<HospitalId>>,
        unfilled: Vec<usize>,
        proposals: usize,
    ) -> Self {
        Self {
            assignment,
            unfilled,
            proposals,
        }
    }

    /// Hospital of every student, in student order.
    pub fn assignments(&self) -> &[Option<HospitalId>] {
        &self.assignment
    }

    /// # Panics
    ///
    /// Panics if `student` is out of range.
    pub fn hospital_of(&self, student: StudentId) -> Option<HospitalId> {
        self.assignment[student]
    }

    /// Students matched to `hospital`, in increasing id order.
    pub fn students_of(&self, hospital: HospitalId) -> impl Iterator<Item = StudentId> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter(move |(_, h)| **h == Some(hospital))
            .map(|(s, _)| s)
    }

    /// Whether every student ended up matched.
    pub fn is_complete(&self) -> bool {
        self.assignment.iter().all(Option::is_some)
    }

    /// Slots of `hospital` left empty because its list ran out.
    ///
    /// # Panics
    ///
    /// Panics if `hospital` is out of range.
    pub fn unfilled(&self, hospital: HospitalId) -> usize {
        self.unfilled[hospital]
    }

    pub fn proposals(&self) -> usize {
        self.proposals
    }

    /// Pairs `(h, s)` that would both rather be matched to each other.
    ///
    /// `h` must list `s`, and either have a spare slot or prefer `s` to the
    /// worst student it holds. `s` must be unmatched or strictly prefer `h`
    /// to its current hospital, ranked under `policy`.
    pub fn blocking_pairs(
        &self,
        prefs: &Preferences,
        policy: UnlistedPolicy,
    ) -> Vec<(HospitalId, StudentId)> {
        let mut pairs = Vec::new();
        for hospital in 0..prefs.hospitals() {
            let list = prefs.preference_list(hospital);
            let held = self.students_of(hospital).count();
            let has_room = held < prefs.capacity(hospital);
            let worst = list
                .iter()
                .rposition(|&s| self.assignment[s] == Some(hospital));

            for (position, &student) in list.iter().enumerate() {
                let current = self.assignment[student];
                if current == Some(hospital) {
                    continue;
                }
                if !has_room && worst.map_or(true, |worst| position > worst) {
                    continue;
                }
                let student_prefers = current.map_or(true, |current| {
                    policy.effective_rank(prefs.rank_of(student, hospital))
                        < policy.effective_rank(prefs.rank_of(student, current))
                });
                if student_prefers {
                    pairs.push((hospital, student));
                }
            }
        }
        pairs
    }

    pub fn is_stable(&self, prefs: &Preferences, policy: UnlistedPolicy) -> bool {
        self.blocking_pairs(prefs, policy).is_empty()
    }
}
