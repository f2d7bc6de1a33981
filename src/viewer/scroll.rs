//! Scroll mirroring between the two grids.
//!
//! Setting a grid's scroll offset from code raises a scroll event on that
//! grid, so a naive "copy A to B, copy B to A" loops forever. The coordinator
//! guards against that with an explicit two-state machine: the first event
//! while `Idle` mirrors immediately and enters `Syncing`; every event while
//! `Syncing` is absorbed; the quiescence timer either issues one trailing
//! write (the source kept moving) or returns to `Idle`.
//!
//! Echoes can also arrive after the window has closed (browsers batch scroll
//! events per frame). Each side remembers the offset last written to it; an
//! `Idle` event that reports exactly that offset is the late echo and is
//! absorbed instead of opening a new window.
//!
//! The coordinator does no I/O. The caller applies [`MirrorWrite`]s to the DOM
//! and arms a timer whenever [`ScrollOutcome::arm_timer`] is set.

use crate::config::SCROLL_SYNC_QUIESCENCE_MS;
use crate::layout::ScrollOffset;
use crate::types::{PerSide, Side};

/// Guard state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    /// A mirror write from `source` to the other side is in flight.
    Syncing { source: Side },
}

/// Programmatic scroll to apply to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorWrite {
    pub target: Side,
    pub offset: ScrollOffset,
}

/// What the caller must do after feeding the coordinator an event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOutcome {
    pub write: Option<MirrorWrite>,
    /// Schedule [`ScrollCoordinator::on_quiescence`] after
    /// [`ScrollCoordinator::quiescence_ms`].
    pub arm_timer: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    enabled: bool,
    state: SyncState,
    quiescence_ms: u32,
    /// Last offset reported by each side.
    latest: PerSide<ScrollOffset>,
    /// Offset most recently written to the target while syncing.
    mirrored: ScrollOffset,
    /// Offset each side is expected to echo back, if a write is outstanding.
    pending_echo: PerSide<Option<ScrollOffset>>,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(true, SCROLL_SYNC_QUIESCENCE_MS)
    }
}

impl ScrollCoordinator {
    pub fn new(enabled: bool, quiescence_ms: u32) -> Self {
        Self {
            enabled,
            state: SyncState::Idle,
            quiescence_ms: quiescence_ms.max(1),
            latest: PerSide::default(),
            mirrored: ScrollOffset::default(),
            pending_echo: PerSide::default(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn quiescence_ms(&self) -> u32 {
        self.quiescence_ms
    }

    /// Last known offset of `side`.
    pub fn offset(&self, side: Side) -> ScrollOffset {
        *self.latest.get(side)
    }

    /// Turn mirroring on or off. Disabling drops any pending sync; a timer
    /// that still fires afterwards finds the coordinator `Idle`.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = SyncState::Idle;
            self.pending_echo = PerSide::default();
        }
    }

    /// Record the offset actually applied to `side` by a mirror write. The
    /// caller passes the clamped value when the target grid is shorter than
    /// the source.
    pub fn note_written(&mut self, side: Side, offset: ScrollOffset) {
        *self.latest.get_mut(side) = offset;
        *self.pending_echo.get_mut(side) = Some(offset);
    }

    /// A scroll event arrived from `side` with its new offset.
    pub fn on_scroll(&mut self, side: Side, offset: ScrollOffset) -> ScrollOutcome {
        *self.latest.get_mut(side) = offset;
        if !self.enabled {
            return ScrollOutcome::default();
        }
        let is_echo = self
            .pending_echo
            .get_mut(side)
            .take()
            .is_some_and(|expected| expected.approx_eq(&offset));
        match self.state {
            SyncState::Idle if is_echo => {
                log::trace!("late scroll echo from {side:?} absorbed");
                ScrollOutcome::default()
            }
            SyncState::Idle => {
                let target = side.other();
                self.state = SyncState::Syncing { source: side };
                self.mirrored = offset;
                self.note_written(target, offset);
                log::trace!("scroll mirror {side:?} -> {target:?} {offset:?}");
                ScrollOutcome {
                    write: Some(MirrorWrite { target, offset }),
                    arm_timer: true,
                }
            }
            SyncState::Syncing { .. } => ScrollOutcome::default(),
        }
    }

    /// The quiescence timer fired.
    pub fn on_quiescence(&mut self) -> ScrollOutcome {
        let SyncState::Syncing { source } = self.state else {
            return ScrollOutcome::default();
        };
        let latest = *self.latest.get(source);
        if latest.approx_eq(&self.mirrored) {
            self.state = SyncState::Idle;
            return ScrollOutcome::default();
        }
        let target = source.other();
        self.mirrored = latest;
        self.note_written(target, latest);
        log::trace!("scroll trailing mirror {source:?} -> {target:?} {latest:?}");
        ScrollOutcome {
            write: Some(MirrorWrite {
                target,
                offset: latest,
            }),
            arm_timer: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(top: f64) -> ScrollOffset {
        ScrollOffset::new(top, 0.0)
    }

    #[test]
    fn first_event_mirrors_and_arms_timer() {
        let mut sc = ScrollCoordinator::default();
        let out = sc.on_scroll(Side::Left, at(120.0));
        assert_eq!(
            out.write,
            Some(MirrorWrite {
                target: Side::Right,
                offset: at(120.0)
            })
        );
        assert!(out.arm_timer);
        assert_eq!(sc.state(), SyncState::Syncing { source: Side::Left });
    }

    #[test]
    fn echo_from_target_is_absorbed() {
        let mut sc = ScrollCoordinator::default();
        sc.on_scroll(Side::Left, at(50.0));
        let echo = sc.on_scroll(Side::Right, at(50.0));
        assert_eq!(echo, ScrollOutcome::default());
        assert_eq!(sc.on_quiescence(), ScrollOutcome::default());
        assert_eq!(sc.state(), SyncState::Idle);
    }

    #[test]
    fn burst_ends_with_one_trailing_write() {
        let mut sc = ScrollCoordinator::default();
        sc.on_scroll(Side::Right, at(10.0));
        sc.on_scroll(Side::Right, at(20.0));
        sc.on_scroll(Side::Right, at(30.0));
        let trailing = sc.on_quiescence();
        assert_eq!(trailing.write.unwrap().offset, at(30.0));
        assert_eq!(trailing.write.unwrap().target, Side::Left);
        // Echo of the trailing write, then the window closes.
        assert_eq!(sc.on_scroll(Side::Left, at(30.0)).write, None);
        assert_eq!(sc.on_quiescence().write, None);
        assert_eq!(sc.state(), SyncState::Idle);
        assert_eq!(sc.offset(Side::Left), at(30.0));
    }

    #[test]
    fn disabled_ignores_events_and_forces_idle() {
        let mut sc = ScrollCoordinator::default();
        sc.on_scroll(Side::Left, at(5.0));
        sc.set_enabled(false);
        assert_eq!(sc.state(), SyncState::Idle);
        assert_eq!(sc.on_scroll(Side::Left, at(9.0)), ScrollOutcome::default());
        assert_eq!(sc.on_quiescence(), ScrollOutcome::default());
        sc.set_enabled(true);
        assert!(sc.on_scroll(Side::Left, at(11.0)).write.is_some());
    }

    #[test]
    fn late_echo_after_window_is_absorbed() {
        let mut sc = ScrollCoordinator::default();
        sc.on_scroll(Side::Left, at(80.0));
        assert_eq!(sc.on_quiescence(), ScrollOutcome::default());
        assert_eq!(sc.state(), SyncState::Idle);
        assert_eq!(sc.on_scroll(Side::Right, at(80.0)), ScrollOutcome::default());
        assert_eq!(sc.state(), SyncState::Idle);
        // The expectation is spent: the next event from the right is a user scroll.
        assert!(sc.on_scroll(Side::Right, at(80.0)).write.is_some());
    }

    #[test]
    fn user_scroll_on_target_clears_expected_echo() {
        let mut sc = ScrollCoordinator::default();
        sc.on_scroll(Side::Left, at(80.0));
        sc.on_quiescence();
        let out = sc.on_scroll(Side::Right, at(300.0));
        assert_eq!(out.write.unwrap().target, Side::Left);
    }

    #[test]
    fn zero_quiescence_is_raised() {
        assert_eq!(ScrollCoordinator::new(true, 0).quiescence_ms(), 1);
    }
}
