use crate::error::Result;

/// A self-contained unit of work handed to a `Scheduler`.
///
/// Tasks share no mutable state, so a scheduler may run them on any thread in any order.
pub trait Task: Send + 'static {

    /// What a successful run produces
    type Output: Send + 'static;

    /// Label used in log messages
    fn name(&self) -> &str;

    /// Higher priorities are started first; equal priorities keep submission order.
    fn priority(&self) -> usize {
        0
    }

    /// Runs the task to completion.
    fn run(self) -> Result<Self::Output>;
}
