//! Navigation port definition.

/// Port for the screen router that hosts the notification list.
pub trait NavigatorPort: Send + Sync {
    /// Opens the notification surface.
    fn open_notifications(&self);
}

#[cfg(test)]
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MockNavigator {
        pub opened: Arc<AtomicUsize>,
    }

    impl MockNavigator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }
    }

    impl NavigatorPort for MockNavigator {
        fn open_notifications(&self) {
            self.opened.fetch_add(1, Ordering::SeqCst);
        }
    }
}
