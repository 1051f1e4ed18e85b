//! Progress reporter and batch-completion callback traits.

use crate::types::ProgressEvent;

/// Invoked once per completed batch with cumulative progress.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Blanket impl so closures can be used as progress callbacks.
impl<F: Fn(&ProgressEvent) + Send + Sync> ProgressCallback for F {
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Invoked once per completed batch with only that batch's successful
/// results and its 0-based batch index.
pub trait BatchCallback<R>: Send + Sync {
    fn on_batch(&self, results: &[R], batch_index: usize);
}

impl<R, F: Fn(&[R], usize) + Send + Sync> BatchCallback<R> for F {
    fn on_batch(&self, results: &[R], batch_index: usize) {
        self(results, batch_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn closure_as_progress_callback() {
        let seen = Mutex::new(Vec::new());
        let cb = |e: &ProgressEvent| seen.lock().unwrap().push(e.processed);
        let dyn_cb: &dyn ProgressCallback = &cb;
        dyn_cb.on_progress(&ProgressEvent {
            processed: 4,
            total: 8,
            batch_index: 1,
            total_batches: 2,
            elapsed: Duration::ZERO,
        });
        assert_eq!(*seen.lock().unwrap(), vec![4]);
    }

    #[test]
    fn closure_as_batch_callback() {
        let seen = Mutex::new(Vec::new());
        let cb = |results: &[u32], idx: usize| seen.lock().unwrap().push((results.to_vec(), idx));
        let dyn_cb: &dyn BatchCallback<u32> = &cb;
        dyn_cb.on_batch(&[2, 4], 0);
        assert_eq!(*seen.lock().unwrap(), vec![(vec![2, 4], 0)]);
    }
}
