//! Field-name to key-name mappers.
//!
//! Record fields are named by serde (the identifier, or `#[serde(rename)]`).
//! A [`NameMapper`] turns that name into the key name looked up in the
//! document. Words are split on underscores and on lower-to-upper case
//! boundaries, so `package_name` and `PackageName` both map to
//! `PACKAGE_NAME` under [`all_caps_underscore`].

/// Maps a record field name to a key name.
pub type NameMapper = fn(&str) -> String;

fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `PackageName` -> `PACKAGE_NAME`.
///
/// ```rust
/// assert_eq!(csgo_cfg::all_caps_underscore("PackageName"), "PACKAGE_NAME");
/// assert_eq!(csgo_cfg::all_caps_underscore("package_name"), "PACKAGE_NAME");
/// ```
#[must_use]
pub fn all_caps_underscore(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `PackageName` -> `package_name`.
///
/// ```rust
/// assert_eq!(
///     csgo_cfg::title_underscore("CashTeamWinByTimeRunningOutBomb"),
///     "cash_team_win_by_time_running_out_bomb"
/// );
/// ```
#[must_use]
pub fn title_underscore(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub(crate) fn apply(mapper: Option<NameMapper>, name: &str) -> String {
    match mapper {
        Some(map) => map(name),
        None => name.to_string(),
    }
}
