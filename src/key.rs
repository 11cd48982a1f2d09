//! A single `name value // comment` entry.

use crate::convert::{self, parse_bool, split_list};
use crate::{duration, Error, Result};
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// A key within a [`Section`](crate::Section).
///
/// The value is always stored as text. Typed accessors convert on demand and
/// report failures as [`Error::TypeConversion`] naming the key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Key {
    name: String,
    value: String,
    /// Comment text without the `//` marker.
    pub comment: String,
    quoted: bool,
    anonymous: bool,
}

impl Key {
    pub(crate) fn new(name: String, value: String) -> Self {
        Key {
            name,
            value,
            ..Key::default()
        }
    }

    /// The key name. Anonymous keys are named `#1`, `#2` and so on.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for keys created from a `- value` line or by
    /// [`Section::push_anonymous`](crate::Section::push_anonymous).
    ///
    /// A named key whose name happens to start with `#` is not anonymous.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub(crate) fn mark_anonymous(&mut self) {
        self.anonymous = true;
    }

    /// The raw value, with surrounding quotes already removed.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value. The key is no longer considered quoted.
    pub fn set_value<V: Into<String>>(&mut self, value: V) {
        self.value = value.into();
        self.quoted = false;
    }

    pub(crate) fn set_parsed(&mut self, value: String, quoted: bool) {
        self.value = value;
        self.quoted = quoted;
    }

    /// Whether the value was written between quotes in the source.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Runs the value through `check` and returns its result.
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("bot_quota 10").unwrap();
    /// let key = cfg.key("", "bot_quota").unwrap();
    /// assert_eq!(key.validate(|v| v.trim().to_string()), "10");
    /// ```
    pub fn validate<F>(&self, check: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        check(&self.value)
    }

    fn conversion<R: std::fmt::Display>(&self, reason: R) -> Error {
        Error::conversion(&self.name, &self.value, reason)
    }

    /// Parses the value as a boolean.
    ///
    /// `1`, `t`, `true`, `y`, `yes` and `on` are `true`. `0`, `f`, `false`,
    /// `n`, `no` and `off` are `false`. Words may be lower, upper or title case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("bot_join_after_player on\nsv_cheats maybe").unwrap();
    /// assert!(cfg.key("", "bot_join_after_player").unwrap().bool().unwrap());
    /// assert!(cfg.key("", "sv_cheats").unwrap().bool().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] for any other spelling.
    pub fn bool(&self) -> Result<bool> {
        parse_bool(&self.value).ok_or_else(|| self.conversion("not a boolean"))
    }

    /// Parses the value as an `i32`. Surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("mp_maxrounds 30\nmp_roundtime 1.92").unwrap();
    /// assert_eq!(cfg.key("", "mp_maxrounds").unwrap().int().unwrap(), 30);
    /// assert!(cfg.key("", "mp_roundtime").unwrap().int().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value is not an integer or
    /// does not fit.
    pub fn int(&self) -> Result<i32> {
        self.value.trim().parse().map_err(|e| self.conversion(e))
    }

    /// Like [`Key::int`], for `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value is not an integer or
    /// does not fit.
    pub fn i64(&self) -> Result<i64> {
        self.value.trim().parse().map_err(|e| self.conversion(e))
    }

    /// Like [`Key::int`], for `u64`. A leading `-` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value is not an unsigned
    /// integer or does not fit.
    pub fn u64(&self) -> Result<u64> {
        self.value.trim().parse().map_err(|e| self.conversion(e))
    }

    /// Parses the value as a float.
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("ff_damage_reduction_bullets 0.33").unwrap();
    /// assert_eq!(cfg.key("", "ff_damage_reduction_bullets").unwrap().f64().unwrap(), 0.33);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value is not a number.
    pub fn f64(&self) -> Result<f64> {
        self.value.trim().parse().map_err(|e| self.conversion(e))
    }

    /// Parses the value as an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value is not a timestamp.
    pub fn time(&self) -> Result<DateTime<FixedOffset>> {
        convert::parse_rfc3339(&self.value).map_err(|e| self.conversion(e))
    }

    /// Parses the value with a `strftime`-style format. Formats without an
    /// offset are read as UTC, date-only formats as midnight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] when the value does not match `format`.
    pub fn time_format(&self, format: &str) -> Result<DateTime<FixedOffset>> {
        convert::parse_time_format(&self.value, format).map_err(|e| self.conversion(e))
    }

    /// Parses a duration such as `2h45m`, `1.5s` or `300ms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] for an unknown unit or a malformed number.
    pub fn duration(&self) -> Result<Duration> {
        duration::parse(&self.value).map_err(|e| self.conversion(e))
    }

    /// Splits the value on `delim`, trimming every element.
    #[must_use]
    pub fn strings(&self, delim: char) -> Vec<String> {
        split_list(&self.value, delim)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Splits the value on `delim` and parses every element as an `i64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("Numbers \"10010, 10086\"").unwrap();
    /// assert_eq!(cfg.key("", "Numbers").unwrap().ints(',').unwrap(), vec![10010, 10086]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] if any element fails; no partial list
    /// is returned.
    pub fn ints(&self, delim: char) -> Result<Vec<i64>> {
        split_list(&self.value, delim)
            .into_iter()
            .map(|part| part.parse().map_err(|e| self.conversion(e)))
            .collect()
    }

    /// Like [`Key::ints`], for floats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] if any element fails.
    pub fn f64s(&self, delim: char) -> Result<Vec<f64>> {
        split_list(&self.value, delim)
            .into_iter()
            .map(|part| part.parse().map_err(|e| self.conversion(e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> Key {
        Key::new("k".to_string(), value.to_string())
    }

    #[test]
    fn test_typed_accessors() {
        assert!(key("true").bool().unwrap());
        assert_eq!(key("-42").int().unwrap(), -42);
        assert_eq!(key("0.85").f64().unwrap(), 0.85);
        assert_eq!(key("2h45m").duration().unwrap(), Duration::from_secs(9900));
        assert_eq!(key("1,2, 3").ints(',').unwrap(), vec![1, 2, 3]);
        assert_eq!(key("192.168,10.11").f64s(',').unwrap(), vec![192.168, 10.11]);
        assert_eq!(key("HangZhou|Boston").strings('|'), vec!["HangZhou", "Boston"]);
    }

    #[test]
    fn test_conversion_errors_name_the_key() {
        let err = key("age").int().unwrap_err();
        assert_eq!(
            err,
            Error::TypeConversion {
                field: "k".to_string(),
                raw: "age".to_string(),
                reason: "invalid digit found in string".to_string(),
            }
        );
        assert!(key("5000000000").int().is_err());
        assert!(key("nil").time().is_err());
        assert!(key("1,x").ints(',').is_err());
    }

    #[test]
    fn test_set_value_clears_quoted() {
        let mut k = key("x");
        k.set_parsed("hello world".to_string(), true);
        assert!(k.is_quoted());
        k.set_value("无闻");
        assert_eq!(k.value(), "无闻");
        assert!(!k.is_quoted());
    }
}
