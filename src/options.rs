//! Options controlling how sources are loaded.
//!
//! ## Examples
//!
//! ```rust
//! use csgo_cfg::{load_sources, LoadOptions, Source};
//!
//! let options = LoadOptions::new().with_loose(true).with_insensitive(true);
//! let cfg = load_sources(options, vec![Source::from("NAME cfg"), Source::path("404.cfg")]).unwrap();
//! assert_eq!(cfg.key("", "name").map(|k| k.value()), Some("cfg"));
//! ```

/// How a trailing backslash at the end of a physical line is treated.
///
/// ```rust
/// use csgo_cfg::Continuation;
///
/// assert_eq!(Continuation::default(), Continuation::Verbatim);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Lines are never joined, a trailing `\` stays part of the value.
    #[default]
    Verbatim,
    /// A line ending in `\` is joined with the next line, without the backslash.
    Join,
}

/// Configuration for [`load_sources`](crate::load_sources).
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Skip path sources that do not exist instead of failing.
    pub loose: bool,
    /// Normalize section and key names to lower case.
    pub insensitive: bool,
    pub continuation: Continuation,
}

impl LoadOptions {
    /// Creates default options: strict, case sensitive and without line joining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csgo_cfg::LoadOptions;
    ///
    /// let options = LoadOptions::new();
    /// assert!(!options.loose);
    /// assert!(!options.insensitive);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_loose(mut self, loose: bool) -> Self {
        self.loose = loose;
        self
    }

    #[must_use]
    pub fn with_insensitive(mut self, insensitive: bool) -> Self {
        self.insensitive = insensitive;
        self
    }

    #[must_use]
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = continuation;
        self
    }

    /// Keeps trailing backslashes verbatim. This is also the default.
    ///
    /// ```rust
    /// use csgo_cfg::{load_sources, LoadOptions};
    ///
    /// let options = LoadOptions::new().ignore_continuation();
    /// let cfg = load_sources(options, ["key1 a\\b\\ \nkey2 c\\d\\"]).unwrap();
    /// assert_eq!(cfg.key("", "key1").map(|k| k.value()), Some("a\\b\\"));
    /// ```
    #[must_use]
    pub fn ignore_continuation(self) -> Self {
        self.with_continuation(Continuation::Verbatim)
    }
}
