//! Error presentation for failures that stop the viewer from loading.

use std::sync::Mutex;

/// Surface that shows a fatal startup error in place of the UI.
pub trait ErrorSurface {
    /// Displays `message`. `unrecoverable` disables any retry affordance.
    fn show_error(&self, message: &str, unrecoverable: bool);
}

/// Message shown on the splash screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashError {
    /// Full user-facing text.
    pub message: String,
    /// Whether the viewer can recover without a reload.
    pub unrecoverable: bool,
}

/// Splash screen shown while the viewer loads.
///
/// It logs each error it is asked to display and keeps the latest one.
#[derive(Debug, Default)]
pub struct SplashScreen {
    shown: Mutex<Option<SplashError>>,
}

impl SplashScreen {
    /// Creates a splash screen with no error displayed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Error currently displayed, if any.
    #[must_use]
    pub fn shown(&self) -> Option<SplashError> {
        self.shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ErrorSurface for SplashScreen {
    fn show_error(&self, message: &str, unrecoverable: bool) {
        tracing::error!(
            target: "atlas_bootstrap::splash",
            unrecoverable,
            "{message}"
        );
        *self
            .shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(SplashError {
            message: message.to_owned(),
            unrecoverable,
        });
    }
}

impl<T> ErrorSurface for &T
where
    T: ErrorSurface + ?Sized,
{
    fn show_error(&self, message: &str, unrecoverable: bool) {
        (**self).show_error(message, unrecoverable);
    }
}
