// src/engine/state.rs

/// Whether the build callback has been invoked yet.
///
/// The only transition is `AwaitingFirstRun -> Running`, and it happens at
/// most once per plugin instance, when the build callback is invoked (after
/// the matched files resolved). Both entry points (`beforeRun` and the
/// first `watchRun`) go through [`RunState::claim_first_run`], so whichever
/// gets there first wins and the other sees `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    AwaitingFirstRun,
    Running,
}

impl RunState {
    pub fn is_first_run_pending(&self) -> bool {
        matches!(self, RunState::AwaitingFirstRun)
    }

    /// Perform the `AwaitingFirstRun -> Running` transition.
    ///
    /// Returns `true` only for the call that actually made the transition.
    pub fn claim_first_run(&mut self) -> bool {
        match self {
            RunState::AwaitingFirstRun => {
                *self = RunState::Running;
                true
            }
            RunState::Running => false,
        }
    }
}
