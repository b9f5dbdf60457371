//! Address bar access and the side effect of server resolution.

use std::sync::Mutex;

use crate::resolver::{Resolution, UrlUpdate};

/// Current address split into the parts the resolver cares about.
///
/// The query string is not part of the server path contract; it is dropped
/// when the address is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    fragment: String,
}

impl Location {
    /// Parses an address such as `/maps/survival?x=1#world;flat`.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (before_fragment, fragment) = url
            .find('#')
            .map_or((url, ""), |index| url.split_at(index));
        let path = before_fragment
            .split_once('?')
            .map_or(before_fragment, |(path, _query)| path);
        Self {
            path: path.to_owned(),
            fragment: fragment.to_owned(),
        }
    }

    /// Path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fragment including the leading `#`, or empty.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// Session history of the viewer's address.
pub trait History {
    /// Returns the current address.
    fn location(&self) -> Location;

    /// Replaces the current history entry without navigating.
    fn replace(&self, url: &str);
}

/// Applies the address change decided by the resolver.
///
/// The current fragment is preserved. Nothing is replaced when the resolution
/// leaves the address unchanged.
pub fn apply_resolution<H>(history: &H, resolution: &Resolution)
where
    H: History + ?Sized,
{
    let path = match resolution.url_update() {
        UrlUpdate::Unchanged => return,
        UrlUpdate::TrimTrailingSlash { path } | UrlUpdate::Rewrite { path } => path,
    };
    let location = history.location();
    let url = format!("{path}{}", location.fragment());
    tracing::debug!(
        target: "atlas_bootstrap::history",
        from = %location.path(),
        to = %url,
        "replacing history entry"
    );
    history.replace(&url);
}

/// In-process history holding a single entry.
///
/// Used by the headless binary; records every replacement.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entry: Mutex<String>,
    replacements: Mutex<Vec<String>>,
}

impl MemoryHistory {
    /// Starts the history at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entry: Mutex::new(url.into()),
            replacements: Mutex::default(),
        }
    }

    /// Current entry as a full URL.
    #[must_use]
    pub fn current(&self) -> String {
        lock(&self.entry).clone()
    }

    /// Every URL passed to [`History::replace`], oldest first.
    #[must_use]
    pub fn replacements(&self) -> Vec<String> {
        lock(&self.replacements).clone()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        Location::parse(&lock(&self.entry))
    }

    fn replace(&self, url: &str) {
        url.clone_into(&mut lock(&self.entry));
        lock(&self.replacements).push(url.to_owned());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
