//! Shared per-engine lifecycle state machine.
//!
//! Every engine owns one [`EngineCell`]: a mutex over the loaded session
//! plus configuration, an atomic lifecycle state readable without the
//! lock, and an atomic cancellation flag. All lifecycle and inference
//! operations on an engine serialize on the same mutex for their full
//! duration; `cancel()` and `state()` stay lock-free so they remain
//! usable while an operation is in flight.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Lifecycle state of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No model loaded.
    Uninitialized,
    /// Model loaded, idle.
    Ready,
    /// An operation is running on some thread.
    Busy,
    /// The last operation failed; the session is still loaded.
    Error,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => EngineState::Ready,
            2 => EngineState::Busy,
            3 => EngineState::Error,
            _ => EngineState::Uninitialized,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            EngineState::Uninitialized => 0,
            EngineState::Ready => 1,
            EngineState::Busy => 2,
            EngineState::Error => 3,
        }
    }
}

struct Slot<S: ?Sized, C> {
    session: Option<Box<S>>,
    config: C,
}

pub(crate) struct EngineCell<S: ?Sized, C> {
    slot: Mutex<Slot<S, C>>,
    state: AtomicU8,
    cancel: AtomicBool,
}

impl<S: ?Sized, C: Default> EngineCell<S, C> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                session: None,
                config: C::default(),
            }),
            state: AtomicU8::new(EngineState::Uninitialized.as_u8()),
            cancel: AtomicBool::new(false),
        }
    }
}

impl<S: ?Sized, C> EngineCell<S, C> {
    pub(crate) fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Request cooperative cancellation of the in-flight operation.
    pub(crate) fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    // A caller callback that panics poisons the mutex; the engine must
    // stay usable afterwards, so the poison is stripped.
    fn lock(&self) -> MutexGuard<'_, Slot<S, C>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Replace the session: tear down any prior one, then run the loader.
    ///
    /// A load failure leaves the cell uninitialized; the prior session is
    /// gone either way, so a handle is never half-initialized.
    pub(crate) fn install(
        &self,
        config: C,
        load: impl FnOnce() -> Result<Box<S>>,
    ) -> Result<()> {
        let mut slot = self.lock();
        if slot.session.take().is_some() {
            debug!("released previous session before re-init");
        }
        self.state
            .store(EngineState::Uninitialized.as_u8(), Ordering::Release);

        let session = load()?;
        slot.session = Some(session);
        slot.config = config;
        self.state.store(EngineState::Ready.as_u8(), Ordering::Release);
        Ok(())
    }

    /// Release the session and return to `Uninitialized`. Idempotent.
    pub(crate) fn shutdown(&self) {
        let mut slot = self.lock();
        if slot.session.take().is_some() {
            debug!("session released");
        }
        self.state
            .store(EngineState::Uninitialized.as_u8(), Ordering::Release);
    }

    /// Enter an inference operation: serialize on the engine mutex, fail
    /// fast when uninitialized, clear any stale cancellation, and move to
    /// `Busy` until the returned guard drops.
    pub(crate) fn begin_op(&self) -> Result<OpGuard<'_, S, C>> {
        let slot = self.lock();
        if slot.session.is_none() {
            return Err(Error::NotInitialized);
        }
        self.cancel.store(false, Ordering::Release);
        self.state.store(EngineState::Busy.as_u8(), Ordering::Release);
        Ok(OpGuard {
            cell: self,
            slot,
            outcome: EngineState::Ready,
        })
    }
}

/// Holds the engine mutex for the duration of one operation.
///
/// Dropping the guard transitions `Busy -> Ready`, or `Busy -> Error`
/// when [`OpGuard::fail`] was called.
pub(crate) struct OpGuard<'a, S: ?Sized, C> {
    cell: &'a EngineCell<S, C>,
    slot: MutexGuard<'a, Slot<S, C>>,
    outcome: EngineState,
}

impl<S: ?Sized, C> OpGuard<'_, S, C> {
    pub(crate) fn session(&mut self) -> &mut S {
        // Presence was checked in begin_op and the mutex is still held.
        match self.slot.session.as_mut() {
            Some(session) => session,
            None => unreachable!("session vanished while the engine mutex was held"),
        }
    }

    pub(crate) fn config(&self) -> &C {
        &self.slot.config
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cell.is_cancelled()
    }

    /// Mark the operation as failed; the engine lands in `Error`.
    pub(crate) fn fail(&mut self) {
        self.outcome = EngineState::Error;
    }
}

impl<S: ?Sized, C> Drop for OpGuard<'_, S, C> {
    fn drop(&mut self) {
        self.cell
            .state
            .store(self.outcome.as_u8(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_op_requires_init() {
        let cell: EngineCell<str, ()> = EngineCell::new();
        assert_eq!(cell.state(), EngineState::Uninitialized);
        assert!(matches!(cell.begin_op(), Err(Error::NotInitialized)));
        // Failing fast must not disturb the state machine.
        assert_eq!(cell.state(), EngineState::Uninitialized);
    }

    #[test]
    fn install_and_shutdown_cycle() {
        let cell: EngineCell<str, ()> = EngineCell::new();
        cell.install((), || Ok("session".into())).unwrap();
        assert_eq!(cell.state(), EngineState::Ready);

        cell.shutdown();
        assert_eq!(cell.state(), EngineState::Uninitialized);
        // Idempotent.
        cell.shutdown();
        assert_eq!(cell.state(), EngineState::Uninitialized);
    }

    #[test]
    fn failed_install_leaves_uninitialized() {
        let cell: EngineCell<str, ()> = EngineCell::new();
        cell.install((), || Ok("first".into())).unwrap();

        let err = cell
            .install((), || Err(Error::Inference("boom".into())))
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert_eq!(cell.state(), EngineState::Uninitialized);
        assert!(matches!(cell.begin_op(), Err(Error::NotInitialized)));
    }

    #[test]
    fn op_guard_restores_ready() {
        let cell: EngineCell<str, ()> = EngineCell::new();
        cell.install((), || Ok("session".into())).unwrap();

        {
            let guard = cell.begin_op().unwrap();
            assert_eq!(cell.state(), EngineState::Busy);
            drop(guard);
        }
        assert_eq!(cell.state(), EngineState::Ready);

        {
            let mut guard = cell.begin_op().unwrap();
            guard.fail();
        }
        assert_eq!(cell.state(), EngineState::Error);
    }

    #[test]
    fn begin_op_clears_stale_cancel() {
        let cell: EngineCell<str, ()> = EngineCell::new();
        cell.install((), || Ok("session".into())).unwrap();

        cell.request_cancel();
        assert!(cell.is_cancelled());
        let guard = cell.begin_op().unwrap();
        assert!(!guard.cancelled());
    }
}
