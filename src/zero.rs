//! Zero-value detection for omit-if-empty fields.
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Player {
//!     name: String,
//!     #[serde(skip_serializing_if = "csgo_cfg::is_zero")]
//!     clan: String,
//! }
//!
//! let mut cfg = csgo_cfg::empty();
//! cfg.reflect_from(&Player { name: "Unknwon".into(), clan: String::new() }).unwrap();
//! assert!(cfg.key("", "clan").is_none());
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::cell::Cell;
use std::time::Duration;

thread_local! {
    static KEEP_ZERO: Cell<bool> = const { Cell::new(false) };
}

/// While alive, [`is_zero`] answers `false` on this thread, so omit-if-empty
/// fields are written with their zero value.
pub(crate) struct KeepZeroValues {
    previous: bool,
}

impl KeepZeroValues {
    pub(crate) fn enter() -> Self {
        KeepZeroValues {
            previous: KEEP_ZERO.with(|keep| keep.replace(true)),
        }
    }
}

impl Drop for KeepZeroValues {
    fn drop(&mut self) {
        KEEP_ZERO.with(|keep| keep.set(self.previous));
    }
}

/// Types with a distinguished "empty" value.
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

/// Returns `true` if `value` is its type's zero value.
///
/// [`File::map_to`](crate::File::map_to) suspends this check while it records
/// the target's current values, so omitted fields still keep theirs.
pub fn is_zero<T: IsZero + ?Sized>(value: &T) -> bool {
    !KEEP_ZERO.with(Cell::get) && value.is_zero()
}

macro_rules! impl_numeric {
    ($($ty:ty),*) => {
        $(
            impl IsZero for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0 as $ty
                }
            }
        )*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IsZero + ?Sized> IsZero for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T> IsZero for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl IsZero for Duration {
    fn is_zero(&self) -> bool {
        *self == Duration::ZERO
    }
}

/// The Unix epoch counts as zero.
impl<Tz: TimeZone> IsZero for DateTime<Tz> {
    fn is_zero(&self) -> bool {
        self.timestamp() == 0 && self.timestamp_subsec_nanos() == 0
    }
}

impl IsZero for NaiveDateTime {
    fn is_zero(&self) -> bool {
        self.and_utc().timestamp() == 0 && self.and_utc().timestamp_subsec_nanos() == 0
    }
}

impl IsZero for NaiveDate {
    fn is_zero(&self) -> bool {
        *self == NaiveDate::default()
    }
}
