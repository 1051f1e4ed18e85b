//! Run request: the items plus the caller's optional hooks.

use batchrun_core::{
    cancel::CancellationToken,
    progress::{BatchCallback, ProgressCallback},
    types::ProgressEvent,
};

/// Everything a run needs from the caller apart from the work function.
///
/// `R` is the work function's success type, needed up front so a
/// batch-completion callback can receive `&[R]`.
pub struct BatchRequest<T, R> {
    /// The items to process, in order.
    pub items: Vec<T>,
    /// Optional cumulative progress callback
    pub on_progress: Option<Box<dyn ProgressCallback>>,
    /// Optional per-batch callback receiving that batch's successes
    pub on_batch: Option<Box<dyn BatchCallback<R>>>,
    /// Optional cooperative cancellation token
    pub cancel: Option<CancellationToken>,
}

impl<T, R> BatchRequest<T, R> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            on_progress: None,
            on_batch: None,
            cancel: None,
        }
    }

    pub fn on_progress<F: Fn(&ProgressEvent) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_batch<F: Fn(&[R], usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_batch = Some(Box::new(f));
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T, R> From<Vec<T>> for BatchRequest<T, R> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// Hooks the runners fire after each batch (or window) settles.
pub(crate) struct Hooks<R> {
    pub on_progress: Option<Box<dyn ProgressCallback>>,
    pub on_batch: Option<Box<dyn BatchCallback<R>>>,
}

impl<R> Hooks<R> {
    pub fn batch_done(&self, results: &[R], batch_index: usize) {
        if let Some(cb) = &self.on_batch {
            cb.on_batch(results, batch_index);
        }
    }

    pub fn progress(&self, event: &ProgressEvent) {
        if let Some(cb) = &self.on_progress {
            cb.on_progress(event);
        }
    }
}

impl<T, R> BatchRequest<T, R> {
    pub(crate) fn into_parts(self) -> (Vec<T>, Hooks<R>, Option<CancellationToken>) {
        (
            self.items,
            Hooks {
                on_progress: self.on_progress,
                on_batch: self.on_batch,
            },
            self.cancel,
        )
    }
}
