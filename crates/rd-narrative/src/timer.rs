use std::time::Duration;

use rd_core::NodeId;

/// Countdown for a timed challenge, advanced by the host loop.
///
/// Fires at most once. After firing or cancellation every call is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineTimer {
    node: NodeId,
    deadline: Duration,
    elapsed: Duration,
    state: TimerState,
}

/// Lifecycle of a [`DeadlineTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Counting down.
    Running,
    /// The deadline elapsed.
    Fired,
    /// Stopped before the deadline.
    Cancelled,
}

impl DeadlineTimer {
    /// Start a countdown of `deadline` for `node`.
    pub fn start(node: NodeId, deadline: Duration) -> Self {
        Self {
            node,
            deadline,
            elapsed: Duration::ZERO,
            state: TimerState::Running,
        }
    }

    /// The challenge node this timer belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether the timer is still counting down.
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Time left before firing. Zero once stopped.
    pub fn remaining(&self) -> Duration {
        match self.state {
            TimerState::Running => self.deadline.saturating_sub(self.elapsed),
            TimerState::Fired | TimerState::Cancelled => Duration::ZERO,
        }
    }

    /// Advance by `elapsed`. Returns `true` exactly once, when the deadline is reached.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed >= self.deadline {
            self.state = TimerState::Fired;
            return true;
        }
        false
    }

    /// Stop the countdown. Returns `true` if it was running.
    pub fn cancel(&mut self) -> bool {
        if self.state == TimerState::Running {
            self.state = TimerState::Cancelled;
            true
        } else {
            false
        }
    }
}
