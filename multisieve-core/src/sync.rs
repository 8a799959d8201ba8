//! Synchronization primitives with conditional compilation.
//!
//! Provides a unified mutex interface that uses `parking_lot::Mutex` when
//! the `fast-lock` feature is enabled, falling back to `std::sync::Mutex` otherwise.
//! The constituency graph keeps its constituent memo table behind this lock so
//! that a finished graph can be shared between reader threads.

#[cfg(feature = "fast-lock")]
use parking_lot::Mutex as ParkingLotMutex;

#[cfg(not(feature = "fast-lock"))]
use std::sync::Mutex as StdMutex;

/// Mutex type that conditionally uses parking_lot or std::sync::Mutex.
///
/// # Example
///
/// ```rust
/// use multisieve_core::sync::{lock, Mutex};
///
/// let data = Mutex::new(42);
/// *lock(&data) = 100;
/// assert_eq!(*lock(&data), 100);
/// ```
#[cfg(feature = "fast-lock")]
pub type Mutex<T> = ParkingLotMutex<T>;

#[cfg(not(feature = "fast-lock"))]
pub type Mutex<T> = StdMutex<T>;

/// Lock a mutex and return the guard, handling poisoning gracefully.
///
/// For `parking_lot::Mutex`, this is just `mutex.lock()`.
/// For `std::sync::Mutex`, a poisoned lock is recovered: the memo table only
/// ever holds finished entries, so its contents stay valid after a panic.
#[cfg(feature = "fast-lock")]
pub fn lock<T>(mutex: &Mutex<T>) -> parking_lot::MutexGuard<'_, T> {
    mutex.lock()
}

#[cfg(not(feature = "fast-lock"))]
pub fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
