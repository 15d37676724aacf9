//! The scoped session lock: the equivalent of a mutual-exclusion primitive whose acquire and
//! release can compile away to nothing when the host already guarantees single-threaded access.
//!
//! There is no direct teacher precedent (the teacher's client is not reentrant-guarded); this is
//! built from `core`-only primitives rather than pulling in a lock crate, keeping the
//! no_std/allocation-free character of the rest of the crate. [`Session`](crate::session::Session)
//! acquires the guard once per call and holds it for that call's whole body, so it releases on
//! every exit path, including error returns.

/// A lock scoped to one session. `acquire` must run on every call into the session; the guard's
/// `Drop` releases it on every exit path, including error paths.
pub trait SessionLock {
    type Guard<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Self::Guard<'_>;
}

/// The default implementation for hosts that already guarantee single-threaded access to a
/// session at compile time: acquire/release compile away to nothing.
#[derive(Debug, Default)]
pub struct NoopLock;

pub struct NoopGuard;

impl SessionLock for NoopLock {
    type Guard<'a> = NoopGuard;

    fn acquire(&self) -> NoopGuard {
        NoopGuard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_are_zero_cost() {
        let lock = NoopLock;
        let _guard = lock.acquire();
    }
}
