use std::collections::VecDeque;

use num_traits::{Bounded, Zero};
use tracing::{debug, trace};

use crate::{
    error::MatchError,
    matching::Matching,
    preferences::{Preferences, Rank},
    HospitalId, StudentId,
};

/// How a student ranks a hospital that is missing from its list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnlistedPolicy {
    /// Below every listed hospital, but still better than being unmatched.
    #[default]
    LeastPreferred,
    /// Same rank as the student's first choice.
    ZeroRank,
    /// Refuse the instance if any hospital lists a student that does not
    /// list it back.
    Reject,
}

impl UnlistedPolicy {
    /// Rank used when comparing offers, given the rank from the table.
    #[inline]
    pub fn effective_rank(self, rank: Option<Rank>) -> Rank {
        match (self, rank) {
            (_, Some(rank)) => rank,
            (UnlistedPolicy::ZeroRank, None) => Rank::zero(),
            (_, None) => Bounded::max_value(),
        }
    }
}

/// What to do with a free slot whose hospital has proposed to every student
/// on its list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExhaustionPolicy {
    /// Drop the slot from the pool and report it as unfilled.
    #[default]
    Drop,
    /// Stop the run with [`MatchError::ListExhausted`].
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchConfig {
    pub unlisted: UnlistedPolicy,
    pub exhaustion: ExhaustionPolicy,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlisted(mut self, policy: UnlistedPolicy) -> Self {
        self.unlisted = policy;
        self
    }

    pub fn exhaustion(mut self, policy: ExhaustionPolicy) -> Self {
        self.exhaustion = policy;
        self
    }
}

/// Outcome of a single [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An unmatched student took the offer.
    Accepted {
        hospital: HospitalId,
        student: StudentId,
    },
    /// The student traded up, freeing a slot of `displaced`.
    Displaced {
        hospital: HospitalId,
        student: StudentId,
        displaced: HospitalId,
    },
    /// The student kept the offer it already `held`.
    Rejected {
        hospital: HospitalId,
        student: StudentId,
        held: HospitalId,
    },
    /// The hospital had no one left to propose to; its slot left the pool.
    Exhausted { hospital: HospitalId },
}

/// Hospital-proposing deferred acceptance over a [`Preferences`] store.
///
/// Every unit of capacity a hospital could fill is a slot in the free pool;
/// capacity beyond the length of its list is unfilled from the start. The
/// slot at the front
/// proposes to the next student on its hospital's list; a slot that gets
/// displaced goes back to the front so it proposes next.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    prefs: &'a Preferences,
    config: MatchConfig,
    free: VecDeque<HospitalId>,
    next: Vec<usize>,
    current: Vec<Option<HospitalId>>,
    unfilled: Vec<usize>,
    proposals: usize,
}

impl<'a> Engine<'a> {
    pub fn new(prefs: &'a Preferences, config: MatchConfig) -> Result<Self, MatchError> {
        if config.unlisted == UnlistedPolicy::Reject {
            if let Some((hospital, student)) = prefs.unlisted_pairs().next() {
                return Err(MatchError::UnlistedHospital { hospital, student });
            }
        }

        // a hospital holds at most one slot per listed student, the rest can
        // only ever be dropped
        let mut free = VecDeque::new();
        let mut unfilled = vec![0; prefs.hospitals()];
        for hospital in 0..prefs.hospitals() {
            let capacity = prefs.capacity(hospital);
            let usable = capacity.min(prefs.preference_list(hospital).len());
            if usable < capacity && config.exhaustion == ExhaustionPolicy::Fail {
                return Err(MatchError::ListExhausted { hospital });
            }
            free.extend(std::iter::repeat(hospital).take(usable));
            unfilled[hospital] = capacity - usable;
        }

        Ok(Self {
            prefs,
            config,
            free,
            next: vec![0; prefs.hospitals()],
            current: vec![None; prefs.students()],
            unfilled,
            proposals: 0,
        })
    }

    /// Number of proposals `hospital` has made so far.
    pub fn next_index(&self, hospital: HospitalId) -> usize {
        self.next[hospital]
    }

    /// The hospital currently holding `student`, if any.
    pub fn current(&self, student: StudentId) -> Option<HospitalId> {
        self.current[student]
    }

    /// Free slots, front first.
    pub fn free_slots(&self) -> impl ExactSizeIterator<Item = HospitalId> + '_ {
        self.free.iter().copied()
    }

    pub fn proposals(&self) -> usize {
        self.proposals
    }

    // strict, so ties keep the current holder
    #[inline]
    fn prefers(&self, student: StudentId, hospital: HospitalId, held: HospitalId) -> bool {
        let policy = self.config.unlisted;
        policy.effective_rank(self.prefs.rank_of(student, hospital))
            < policy.effective_rank(self.prefs.rank_of(student, held))
    }

    /// Performs one transition. Returns `None` once the pool is empty.
    pub fn step(&mut self) -> Result<Option<Step>, MatchError> {
        let Some(&hospital) = self.free.front() else {
            return Ok(None);
        };

        let Some(student) = self.prefs.preference_of(hospital, self.next[hospital]) else {
            return match self.config.exhaustion {
                ExhaustionPolicy::Fail => Err(MatchError::ListExhausted { hospital }),
                ExhaustionPolicy::Drop => {
                    self.free.pop_front();
                    self.unfilled[hospital] += 1;
                    debug!(hospital, "preference list exhausted, dropping slot");
                    Ok(Some(Step::Exhausted { hospital }))
                }
            };
        };
        self.next[hospital] += 1;
        self.proposals += 1;

        let step = match self.current[student] {
            None => {
                self.current[student] = Some(hospital);
                self.free.pop_front();
                Step::Accepted { hospital, student }
            }
            Some(held) if self.prefers(student, hospital, held) => {
                self.current[student] = Some(hospital);
                self.free.pop_front();
                self.free.push_front(held);
                Step::Displaced {
                    hospital,
                    student,
                    displaced: held,
                }
            }
            // the slot stays at the front and retries with its next student
            Some(held) => Step::Rejected {
                hospital,
                student,
                held,
            },
        };
        trace!(?step, "proposal");

        Ok(Some(step))
    }

    /// Drains the free pool and extracts the final matching.
    pub fn run(mut self) -> Result<Matching, MatchError> {
        while self.step()?.is_some() {}

        debug_assert!(self.proposals <= self.prefs.total_preferences());
        debug!(
            proposals = self.proposals,
            unfilled = self.unfilled.iter().fold(0usize, |acc, &u| acc.saturating_add(u)),
            "matching finished"
        );

        Ok(Matching::new(self.current, self.unfilled, self.proposals))
    }
}

/// Runs the engine to completion with the given configuration.
pub fn stable_matching(prefs: &Preferences, config: MatchConfig) -> Result<Matching, MatchError> {
    Engine::new(prefs, config)?.run()
}
