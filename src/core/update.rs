//! Redraw bookkeeping and the update suspension gate.
//!
//! Every state change that should become visible goes through
//! [`UpdateGate::request_redraw`]. While the gate is suspended those requests
//! are dropped and view-changed notifications are folded into a single one
//! that is released together with the outermost `suspend(false)`.

/// Re-entrant suspension counter plus the pending-redraw flag
#[derive(Debug, Clone, Default)]
pub struct UpdateGate {
    suspended: u32,
    redraw_pending: bool,
    view_change_pending: bool,
    suppressed_redraws: u64,
}

impl UpdateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` acquires one level, `false` releases one level.
    ///
    /// Returns `true` when this call released the outermost level while a
    /// view change was deferred; the caller then owes one notification.
    pub fn suspend(&mut self, suspend: bool) -> bool {
        if suspend {
            self.suspended += 1;
            return false;
        }

        if self.suspended == 0 {
            log::warn!("unmatched update suspension release ignored");
            return false;
        }

        self.suspended -= 1;
        if self.suspended == 0 && self.view_change_pending {
            self.view_change_pending = false;
            return true;
        }
        false
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended > 0
    }

    pub fn depth(&self) -> u32 {
        self.suspended
    }

    /// Marks the frame dirty unless suspended. Returns whether the request was accepted.
    pub fn request_redraw(&mut self) -> bool {
        if self.is_suspended() {
            self.suppressed_redraws += 1;
            return false;
        }
        self.redraw_pending = true;
        true
    }

    /// Remembers a view change to report at the end of the batch
    pub fn defer_view_change(&mut self) {
        self.view_change_pending = true;
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Consumes the pending redraw flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Number of redraw requests dropped while suspended
    pub fn suppressed_redraws(&self) -> u64 {
        self.suppressed_redraws
    }
}
