//! Macros shared by domain and client code
//!
//! - [`impl_wire_conversions!`](crate::impl_wire_conversions) implements the
//!   string wire representation (`as_str`, `Display`, `FromStr`, serde) for
//!   enums that travel as plain JSON strings.
//! - [`try_outcome!`](crate::try_outcome) unwraps a successful
//!   [`Outcome`](crate::Outcome) or returns its failure from the enclosing
//!   function unchanged.
//!
//! # Example
//!
//! ```rust
//! use courier_domain::impl_wire_conversions;
//!
//! #[derive(Debug, Clone, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Beta,
//! }
//!
//! impl_wire_conversions!(Channel {
//!     Stable => "stable",
//!     Beta => "beta",
//! });
//!
//! assert_eq!(Channel::Beta.to_string(), "beta");
//! assert_eq!("STABLE".parse::<Channel>().unwrap(), Channel::Stable);
//! ```

/// Implements the string wire representation for an enum.
///
/// Two forms are accepted:
///
/// - `Enum { Variant => "wire", .. }` for closed vocabularies. Parsing an
///   unknown string fails with a descriptive message.
/// - `Enum { Variant => "wire", .. } fallback Other` for open vocabularies,
///   where `Other(String)` keeps any unrecognized value verbatim. Parsing
///   never fails.
///
/// Matching is case-insensitive; output is always the lowercase wire form.
#[macro_export]
macro_rules! impl_wire_conversions {
    (@serde $enum_name:ident) => {
        impl $crate::__private::serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw: ::std::string::String =
                    $crate::__private::serde::Deserialize::deserialize(deserializer)?;
                raw.parse::<Self>()
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };

    ($enum_name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Returns the wire representation of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }

        $crate::impl_wire_conversions!(@serde $enum_name);
    };

    ($enum_name:ident { $($variant:ident => $wire:literal),+ $(,)? } fallback $fallback:ident) => {
        impl $enum_name {
            /// Returns the wire representation of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::$fallback(raw) => raw.as_str(),
                }
            }
        }

        impl ::std::convert::From<&str> for $enum_name {
            fn from(s: &str) -> Self {
                match s.to_ascii_lowercase().as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::$fallback(s.to_owned()),
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        $crate::impl_wire_conversions!(@serde $enum_name);
    };
}

/// Unwraps `Outcome::Success` or returns the `Outcome::Failure` unchanged.
///
/// The enclosing function must return an `Outcome`; the failure is re-wrapped
/// with the caller's payload type, so the carried `ClientError` is identical.
#[macro_export]
macro_rules! try_outcome {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(value) => value,
            $crate::Outcome::Failure(error) => return $crate::Outcome::Failure(error),
        }
    };
}
