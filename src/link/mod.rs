//! Link health tracking
//!
//! Tracks runs of consecutive CRC failures and exposes the Online/Offline
//! signal. A configurable threshold of consecutive failures triggers an
//! injected corrective-action hook (typically a transport reset) exactly once
//! per crossing, after which the count starts over.

use tracing::error;

use crate::core::LinkStatus;

/// Zero-argument recovery hook fired when the failure threshold is crossed
pub type CorrectiveAction = Box<dyn FnMut()>;

/// Per-instance link health state
///
/// Status transitions are deliberately asymmetric: a tick with no frame
/// forces `Offline` and a successful decode forces `Online`, but a CRC
/// mismatch leaves the status where it was so that transient corruption does
/// not flap the signal.
pub struct LinkHealth {
    /// Length of the current run of CRC failures
    consecutive_crc_failures: u32,
    /// Current link signal; starts `Offline` until the first decode
    status: LinkStatus,
    /// Failure-run length at which the corrective action fires
    threshold: u32,
    /// Injected recovery hook; absent means count-and-reset only
    on_threshold: Option<CorrectiveAction>,
}

impl LinkHealth {
    /// Creates a monitor with the given failure threshold and no hook
    pub fn new(threshold: u32) -> Self {
        LinkHealth {
            consecutive_crc_failures: 0,
            status: LinkStatus::Offline,
            threshold,
            on_threshold: None,
        }
    }

    /// Installs the corrective-action hook
    pub fn set_corrective_action(&mut self, hook: CorrectiveAction) {
        self.on_threshold = Some(hook);
    }

    /// Returns the current link status
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Returns whether the link is currently online
    pub fn is_online(&self) -> bool {
        self.status == LinkStatus::Online
    }

    /// Returns the length of the current CRC failure run
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_crc_failures
    }

    /// Records a successfully decoded frame
    pub fn record_success(&mut self) {
        self.consecutive_crc_failures = 0;
        self.status = LinkStatus::Online;
    }

    /// Records a CRC mismatch, firing the corrective action on the
    /// threshold crossing
    ///
    /// The status signal is left unchanged.
    pub fn record_crc_failure(&mut self) {
        self.consecutive_crc_failures += 1;
        if self.consecutive_crc_failures >= self.threshold {
            error!(
                failures = self.consecutive_crc_failures,
                "max consecutive CRC failures reached, requesting corrective action"
            );
            if let Some(hook) = self.on_threshold.as_mut() {
                hook();
            }
            self.consecutive_crc_failures = 0;
        }
    }

    /// Records a tick on which no frame could be attempted
    pub fn record_no_frame(&mut self) {
        self.status = LinkStatus::Offline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn monitor_with_counter(threshold: u32) -> (LinkHealth, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let hook_fired = Rc::clone(&fired);
        let mut health = LinkHealth::new(threshold);
        health.set_corrective_action(Box::new(move || {
            hook_fired.set(hook_fired.get() + 1);
        }));
        (health, fired)
    }

    #[test]
    fn test_initial_state_is_offline() {
        let health = LinkHealth::new(5);
        assert_eq!(health.status(), LinkStatus::Offline);
        assert_eq!(health.consecutive_failures(), 0);
    }

    #[test]
    fn test_failures_below_threshold_do_not_fire() {
        let (mut health, fired) = monitor_with_counter(5);
        for n in 1..5 {
            health.record_crc_failure();
            assert_eq!(health.consecutive_failures(), n);
            assert_eq!(fired.get(), 0);
        }
    }

    #[test]
    fn test_threshold_fires_once_and_resets() {
        let (mut health, fired) = monitor_with_counter(5);
        for _ in 0..5 {
            health.record_crc_failure();
        }
        assert_eq!(fired.get(), 1);
        assert_eq!(health.consecutive_failures(), 0);

        // A fresh run must count from zero again
        for _ in 0..4 {
            health.record_crc_failure();
        }
        assert_eq!(fired.get(), 1);
        health.record_crc_failure();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_success_resets_run() {
        let (mut health, fired) = monitor_with_counter(5);
        for _ in 0..4 {
            health.record_crc_failure();
        }
        health.record_success();
        assert_eq!(health.consecutive_failures(), 0);
        assert_eq!(health.status(), LinkStatus::Online);

        for _ in 0..4 {
            health.record_crc_failure();
        }
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_crc_failure_leaves_status_unchanged() {
        let mut health = LinkHealth::new(5);
        health.record_success();
        health.record_crc_failure();
        assert_eq!(health.status(), LinkStatus::Online);

        health.record_no_frame();
        health.record_crc_failure();
        assert_eq!(health.status(), LinkStatus::Offline);
    }

    #[test]
    fn test_no_frame_forces_offline() {
        let mut health = LinkHealth::new(5);
        health.record_success();
        assert!(health.is_online());
        health.record_no_frame();
        assert!(!health.is_online());
    }
}
