/// Declares a module usable with `#[serde(with = "...")]` that reads and
/// writes a `DateTime<FixedOffset>` with a `strftime`-style format.
///
/// Formats without an offset are read as UTC.
///
/// ```rust
/// use chrono::{DateTime, FixedOffset};
/// use serde::{Deserialize, Serialize};
///
/// csgo_cfg::time_format!(pub mod day = "%Y-%m-%d %H:%M");
///
/// #[derive(Serialize, Deserialize)]
/// struct Tournament {
///     #[serde(with = "day")]
///     starts: DateTime<FixedOffset>,
/// }
///
/// let cfg = csgo_cfg::load("starts \"2024-03-17 18:30\"").unwrap();
/// let t: Tournament = cfg.decode().unwrap();
/// assert_eq!(t.starts.to_rfc3339(), "2024-03-17T18:30:00+00:00");
/// ```
#[macro_export]
macro_rules! time_format {
    ($vis:vis mod $name:ident = $format:expr) => {
        $vis mod $name {
            use $crate::__private::chrono::{DateTime, FixedOffset};
            use $crate::__private::serde::{de, Deserializer, Serializer};

            const FORMAT: &str = $format;

            pub fn serialize<S>(time: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(&time.format(FORMAT))
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct FormatVisitor;

                impl de::Visitor<'_> for FormatVisitor {
                    type Value = DateTime<FixedOffset>;

                    fn expecting(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        write!(f, "a timestamp formatted as {:?}", FORMAT)
                    }

                    fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                        $crate::convert::parse_time_format(text, FORMAT).map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(FormatVisitor)
            }
        }
    };
}
