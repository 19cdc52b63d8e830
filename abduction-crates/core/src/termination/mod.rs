//! Conditions which are polled by the solver before every oracle probe and at every step of the
//! tree expansion. A triggered condition is not an error: the solver unwinds, marks the partial
//! results as timed out and returns whatever it has found so far.
//!
//! The configured timeout of a run becomes a [`TimeBudget`]; embedding applications can add
//! their own conditions, e.g. a [`StopFlag`] raised from another thread.

mod stop_flag;
mod time_budget;

pub use stop_flag::StopFlag;
pub use time_budget::TimeBudget;

/// Determines when the solver should give up searching for explanations.
pub trait TerminationCondition {
    /// Returns `true` when the solver should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(|condition| condition.should_stop())
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }
}

/// A [`TerminationCondition`] which never triggers.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Triggers as soon as either of two conditions triggers.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    first: T1,
    second: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    pub fn new(first: T1, second: T2) -> Self {
        Combinator { first, second }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        self.first.should_stop() || self.second.should_stop()
    }
}
