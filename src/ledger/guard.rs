use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
};

use crate::error::LedgerError;

/// Runs ledger operations one at a time.
///
/// Operations from other threads wait for their turn. An operation started
/// by the thread that already holds the turn can only come from a token or
/// custody callback of the running operation and is rejected.
#[derive(Debug, Default)]
pub(crate) struct ReentrancyGuard {
    turn: Mutex<()>,
    holder: Mutex<Option<ThreadId>>,
}

/// Held for the duration of one operation; hands the turn on when dropped.
pub(crate) struct Entered<'a> {
    holder: &'a Mutex<Option<ThreadId>>,
    _turn: MutexGuard<'a, ()>,
}

impl ReentrancyGuard {
    pub(crate) fn enter(&self) -> Result<Entered<'_>, LedgerError> {
        let current = thread::current().id();
        if *lock(&self.holder) == Some(current) {
            return Err(LedgerError::ReentrancyRejected);
        }

        let turn = lock(&self.turn);
        *lock(&self.holder) = Some(current);

        Ok(Entered {
            holder: &self.holder,
            _turn: turn,
        })
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        *lock(self.holder) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
