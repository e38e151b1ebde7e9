//! The engine's single timer slot.
//!
//! At most one action is pending at any time. Arming the slot replaces
//! whatever was pending, so a tick scheduled for a node can never survive the
//! engine moving to another node.

use nv_core::NodeId;

/// Identifies one arming of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleHandle(u64);

/// What happens when a scheduled deadline is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Reveal one more character of the node's text.
    RevealTick,
    /// Enter the target of a transition node.
    AutoAdvance(NodeId),
}

/// An armed deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    /// The arming this deadline belongs to.
    pub handle: ScheduleHandle,
    /// The node that was current when the deadline was armed.
    pub node: NodeId,
    /// Virtual time at which the action fires.
    pub due_ms: u64,
    /// The action to perform.
    pub action: PendingAction,
}

/// A single-slot, cancellable timer.
#[derive(Debug, Default)]
pub struct Schedule {
    slot: Option<Scheduled>,
    next_handle: u64,
}

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot, cancelling any pending action first.
    ///
    /// Returns the new handle and the action that was cancelled, if any.
    pub fn arm(
        &mut self,
        node: NodeId,
        due_ms: u64,
        action: PendingAction,
    ) -> (ScheduleHandle, Option<Scheduled>) {
        let cancelled = self.cancel();
        self.next_handle += 1;
        let handle = ScheduleHandle(self.next_handle);
        self.slot = Some(Scheduled {
            handle,
            node,
            due_ms,
            action,
        });
        (handle, cancelled)
    }

    /// Cancel the pending action, returning it.
    pub fn cancel(&mut self) -> Option<Scheduled> {
        self.slot.take()
    }

    /// The pending action, if any.
    pub fn pending(&self) -> Option<&Scheduled> {
        self.slot.as_ref()
    }

    /// Whether an action is pending.
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Deadline of the pending action.
    pub fn due_ms(&self) -> Option<u64> {
        self.slot.as_ref().map(|s| s.due_ms)
    }

    /// Take the pending action if its deadline is at or before `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Option<Scheduled> {
        if self.due_ms()? <= now_ms {
            self.slot.take()
        } else {
            None
        }
    }
}
