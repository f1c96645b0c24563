//! Task processor seam
//!
//! The engine is generic over a caller-supplied [`TaskProcessor`]. A
//! processor is invoked once per attempt per task and must tolerate
//! concurrent invocation from multiple bot workers.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

/// A caller-supplied function that processes one task per invocation.
///
/// Errors returned here are recoverable at the engine level: the owning bot
/// retries up to its configured bound, then records the last error message as
/// data in the task's result. Nothing a processor returns can abort a batch.
#[async_trait]
pub trait TaskProcessor: Send + Sync + 'static {
    /// The opaque task value this processor consumes
    type Task: Clone + Send + Sync + 'static;

    /// The value produced for a successfully processed task
    type Output: Send + Sync + 'static;

    /// Process a single task attempt.
    async fn process(&self, task: Self::Task) -> anyhow::Result<Self::Output>;
}

/// Adapter implementing [`TaskProcessor`] for an async closure.
///
/// Built with [`processor_fn`].
pub struct FnProcessor<F, T, R, Fut> {
    f: F,
    _marker: PhantomData<fn(T) -> (R, Fut)>,
}

impl<F, T, R, Fut> std::fmt::Debug for FnProcessor<F, T, R, Fut> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcessor").finish()
    }
}

/// Wrap an async closure as a [`TaskProcessor`].
pub fn processor_fn<F, T, R, Fut>(f: F) -> FnProcessor<F, T, R, Fut>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    FnProcessor {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, T, R, Fut> TaskProcessor for FnProcessor<F, T, R, Fut>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    type Task = T;
    type Output = R;

    async fn process(&self, task: T) -> anyhow::Result<R> {
        (self.f)(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_closure_adapter_success() {
        let processor = processor_fn(|n: u32| async move { Ok::<_, anyhow::Error>(n + 1) });

        let result = tokio_test::block_on(processor.process(41));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_closure_adapter_error() {
        let processor =
            processor_fn(|n: u32| async move { Err::<u32, _>(anyhow!("cannot process {n}")) });

        let result = tokio_test::block_on(processor.process(7));
        assert_eq!(result.unwrap_err().to_string(), "cannot process 7");
    }
}
