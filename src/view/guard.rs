use std::ops::{Deref, DerefMut};

use crate::view::StepView;

/// Owns a live view and disposes it exactly once, on every exit path.
pub struct ViewGuard<V: StepView> {
    view: V,
    disposed: bool,
}

impl<V: StepView> ViewGuard<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            disposed: false,
        }
    }

    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.view.dispose();
        }
    }
}

impl<V: StepView> Deref for ViewGuard<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.view
    }
}

impl<V: StepView> DerefMut for ViewGuard<V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

impl<V: StepView> Drop for ViewGuard<V> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::ViewGuard;
    use crate::state::flow::StepIndicator;
    use crate::view::{StepView, ViewButton, ViewEvent};
    use async_trait::async_trait;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingView {
        disposals: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StepView for CountingView {
        fn set_title(&mut self, _title: &str) {}
        fn set_step_indicator(&mut self, _indicator: Option<StepIndicator>) {}
        fn set_buttons(&mut self, _buttons: Vec<ViewButton>) {}
        fn set_ignore_focus_out(&mut self, _ignore: bool) {}
        fn show(&mut self) -> io::Result<()> {
            Ok(())
        }
        async fn next_event(&mut self) -> io::Result<ViewEvent> {
            Ok(ViewEvent::Hide)
        }
        fn dispose(&mut self) {
            self.disposals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting() -> (CountingView, Arc<AtomicUsize>) {
        let disposals = Arc::new(AtomicUsize::new(0));
        (
            CountingView {
                disposals: Arc::clone(&disposals),
            },
            disposals,
        )
    }

    #[test]
    fn explicit_dispose_runs_once() {
        let (view, disposals) = counting();
        let guard = ViewGuard::new(view);
        guard.dispose();
        assert_eq!(disposals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes() {
        let (view, disposals) = counting();
        {
            let _guard = ViewGuard::new(view);
        }
        assert_eq!(disposals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn early_return_with_error_still_disposes() {
        fn fails(view: CountingView) -> io::Result<()> {
            let mut guard = ViewGuard::new(view);
            guard.show()?;
            Err(io::Error::other("boom"))
        }

        let (view, disposals) = counting();
        assert!(fails(view).is_err());
        assert_eq!(disposals.load(Ordering::SeqCst), 1);
    }
}
