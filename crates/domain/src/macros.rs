//! Macro for implementing Display and FromStr for fieldless domain enums
//!
//! Used by the source format and scrape phase enums so their textual form in
//! config files, logs and the database stays in one place.
//!
//! # Example
//!
//! ```rust
//! use campuscal_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Feed {
//!     Html,
//!     Ics,
//! }
//!
//! impl_domain_enum_conversions!(Feed {
//!     Html => "html",
//!     Ics => "ics",
//! });
//!
//! assert_eq!(Feed::Ics.to_string(), "ics");
//! assert_eq!("HTML".parse::<Feed>().unwrap(), Feed::Html);
//! ```

/// Implements Display and FromStr traits for fieldless enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
