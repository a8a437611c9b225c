// Request-scoped session acquisition
use axum::async_trait;
use std::ops::{Deref, DerefMut};

use crate::error::{ProbeFault, SetupFault};

/// Hands out exclusively-owned session handles and takes them back.
///
/// Callers should go through [`SessionProvider::scoped`] rather than pairing `acquire` and
/// `release` by hand: the returned guard releases the handle on every exit path, including
/// early returns, panics and a dropped request future.
#[async_trait]
pub trait SessionProvider: Clone + Send + Sync + 'static {
    type Handle: Send;

    /// Open a new session against the configured store. Never retried here.
    async fn acquire(&self) -> Result<Self::Handle, SetupFault>;

    /// Return a handle. Anything not committed on it is discarded.
    fn release(&self, handle: Self::Handle);

    async fn scoped(&self) -> Result<ScopedSession<Self>, SetupFault> {
        let handle = self.acquire().await?;
        Ok(ScopedSession {
            provider: self.clone(),
            handle: Some(handle),
        })
    }
}

/// Cheapest possible round trip proving the store answers.
#[async_trait]
pub trait Probe: Send {
    async fn probe(&mut self) -> Result<(), ProbeFault>;
}

/// A session handle bound to the scope that acquired it.
pub struct ScopedSession<P: SessionProvider> {
    provider: P,
    // Only `None` once `drop` has run
    handle: Option<P::Handle>,
}

impl<P: SessionProvider> Deref for ScopedSession<P> {
    type Target = P::Handle;

    fn deref(&self) -> &Self::Target {
        match &self.handle {
            Some(handle) => handle,
            None => unreachable!("session handle accessed after release"),
        }
    }
}

impl<P: SessionProvider> DerefMut for ScopedSession<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.handle {
            Some(handle) => handle,
            None => unreachable!("session handle accessed after release"),
        }
    }
}

impl<P: SessionProvider> Drop for ScopedSession<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.provider.release(handle);
        }
    }
}

#[async_trait]
impl<P> Probe for ScopedSession<P>
where
    P: SessionProvider,
    P::Handle: Probe,
{
    async fn probe(&mut self) -> Result<(), ProbeFault> {
        self.deref_mut().probe().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::future::pending;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy, Debug)]
    pub enum Behavior {
        Healthy,
        ProbeFails,
        ProbeHangs,
        Unreachable,
    }

    /// In-memory provider that counts acquisitions and releases.
    #[derive(Clone)]
    pub struct CountingProvider {
        pub behavior: Behavior,
        pub acquired: Arc<AtomicUsize>,
        pub released: Arc<AtomicUsize>,
    }

    impl CountingProvider {
        pub fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                acquired: Arc::new(AtomicUsize::new(0)),
                released: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn acquired(&self) -> usize {
            self.acquired.load(Ordering::SeqCst)
        }

        pub fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }
    }

    pub struct FakeHandle {
        pub id: usize,
        behavior: Behavior,
    }

    #[async_trait]
    impl SessionProvider for CountingProvider {
        type Handle = FakeHandle;

        async fn acquire(&self) -> Result<Self::Handle, SetupFault> {
            if let Behavior::Unreachable = self.behavior {
                return Err(SetupFault::Unreachable("connection refused".to_string()));
            }
            let id = self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(FakeHandle {
                id,
                behavior: self.behavior,
            })
        }

        fn release(&self, _handle: Self::Handle) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Probe for FakeHandle {
        async fn probe(&mut self) -> Result<(), ProbeFault> {
            match self.behavior {
                Behavior::ProbeFails => Err(ProbeFault("permission denied".to_string())),
                Behavior::ProbeHangs => pending().await,
                _ => Ok(()),
            }
        }
    }
}
