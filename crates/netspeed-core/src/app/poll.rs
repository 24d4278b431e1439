use crate::config::PollPolicy;
use crate::domain::ports::{Delay, Session};

/// Bounded retry with a fixed sleep between checks
///
/// The caller performs one check per trial and calls [`BoundedPoll::wait`]
/// after every failed check. `wait` sleeps for the policy interval and
/// returns `false` once `max_trials` checks have been used, without sleeping
/// after the last one.
#[derive(Debug, Clone, Copy)]
pub struct BoundedPoll {
    policy: PollPolicy,
    used: u32,
}

impl BoundedPoll {
    pub const fn new(policy: PollPolicy) -> Self {
        Self { policy, used: 0 }
    }

    /// Checks performed so far
    pub const fn trials(&self) -> u32 {
        self.used
    }

    /// Checks left before the budget is exhausted
    pub const fn remaining(&self) -> u32 {
        self.policy.max_trials.saturating_sub(self.used)
    }

    /// Account for one failed check and sleep before the next one
    pub async fn wait<D: Delay>(&mut self, delay: &D) -> bool {
        self.used = self.used.saturating_add(1);
        if self.used >= self.policy.max_trials {
            return false;
        }
        delay.sleep(self.policy.interval).await;
        true
    }
}

/// Wait until `session` has response bytes, within `policy`
pub(crate) async fn wait_for_response<S: Session, D: Delay>(
    session: &mut S,
    delay: &D,
    policy: PollPolicy,
) -> bool {
    let mut poll = BoundedPoll::new(policy);
    loop {
        if session.poll_available().await {
            return true;
        }
        if !poll.wait(delay).await {
            return false;
        }
    }
}
