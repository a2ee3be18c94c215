//! Declarative builders for the repetitive value-object families

/// Closed-set string value object
///
/// The wrapped `&'static str` always points into `ALLOWED`, or is empty for
/// the zero value.
macro_rules! enum_value_object {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal,
        values = [ $( $konst:ident => $lit:literal ),+ $(,)? ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(&'static str);

        impl $name {
            $( pub const $konst: Self = Self($lit); )+

            /// Every accepted value, in canonical order
            pub const ALLOWED: &'static [&'static str] = &[ $( $lit ),+ ];

            /// Trim `raw` and look it up in the allowed set
            pub fn new(raw: &str) -> $crate::errors::DomainResult<Self> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err($crate::errors::DomainError::required($field));
                }
                Self::ALLOWED
                    .iter()
                    .copied()
                    .find(|candidate| *candidate == trimmed)
                    .map(Self)
                    .ok_or_else(|| {
                        $crate::errors::DomainError::invalid(
                            $field,
                            format!("unsupported value {:?}", trimmed),
                        )
                    })
            }

            pub fn value(&self) -> &'static str {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_empty()
            }

            pub fn validate(&self) -> $crate::errors::DomainResult<()> {
                if Self::ALLOWED.contains(&self.0) {
                    Ok(())
                } else {
                    Err($crate::errors::DomainError::invalid(
                        $field,
                        format!("unsupported value {:?}", self.0),
                    ))
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

/// Integer value object that rejects below `MIN` and clamps above `MAX`
macro_rules! clamped_value_object {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal, min = $min:expr, max = $max:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(i32);

        impl $name {
            pub const MIN: i32 = $min;
            pub const MAX: i32 = $max;

            pub fn new(value: i32) -> $crate::errors::DomainResult<Self> {
                if value < Self::MIN {
                    return Err($crate::errors::DomainError::out_of_range(
                        $field,
                        format!("must be at least {}", Self::MIN),
                    ));
                }
                Ok(Self(value.min(Self::MAX)))
            }

            pub fn value(&self) -> i32 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == 0
            }

            pub fn validate(&self) -> $crate::errors::DomainResult<()> {
                if (Self::MIN..=Self::MAX).contains(&self.0) {
                    Ok(())
                } else {
                    Err($crate::errors::DomainError::out_of_range(
                        $field,
                        format!("must be between {} and {}", Self::MIN, Self::MAX),
                    ))
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Trimmed free text, optionally capped at a number of Unicode code points
macro_rules! text_value_object {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal $(, max_chars = $max:expr)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(String);

        impl $name {
            $( pub const MAX_CHARS: usize = $max; )?

            pub fn new(raw: &str) -> $crate::errors::DomainResult<Self> {
                let trimmed = raw.trim();
                Self::check(trimmed)?;
                Ok(Self(trimmed.to_string()))
            }

            pub fn value(&self) -> &str {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_empty()
            }

            pub fn validate(&self) -> $crate::errors::DomainResult<()> {
                Self::check(&self.0)
            }

            #[allow(unused_variables)]
            fn check(text: &str) -> $crate::errors::DomainResult<()> {
                $(
                    if text.chars().count() > $max {
                        return Err($crate::errors::DomainError::TooLong {
                            field: $field.to_string(),
                            max: $max,
                        });
                    }
                )?
                Ok(())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// 24-hex document identifier
macro_rules! object_id_value_object {
    ($(#[$meta:meta])* $name:ident, field = $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(String);

        impl $name {
            /// Length of the rendered identifier
            pub const LEN: usize = 24;

            /// Trim, lowercase and check the 24-hex shape
            pub fn parse(raw: &str) -> $crate::errors::DomainResult<Self> {
                let normalized = raw.trim().to_ascii_lowercase();
                if normalized.is_empty() {
                    return Err($crate::errors::DomainError::required($field));
                }
                Self::check(&normalized)?;
                Ok(Self(normalized))
            }

            /// Render raw ObjectId bytes; always valid
            pub fn from_bytes(bytes: [u8; 12]) -> Self {
                Self(hex::encode(bytes))
            }

            pub fn value(&self) -> &str {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_empty()
            }

            pub fn validate(&self) -> $crate::errors::DomainResult<()> {
                Self::check(&self.0)
            }

            fn check(candidate: &str) -> $crate::errors::DomainResult<()> {
                if candidate.len() != Self::LEN {
                    return Err($crate::errors::DomainError::format(
                        $field,
                        format!("expected {} hex characters, got {}", Self::LEN, candidate.len()),
                    ));
                }
                if candidate.bytes().any(|b| b.is_ascii_uppercase()) || hex::decode(candidate).is_err() {
                    return Err($crate::errors::DomainError::format($field, "not a hex string"));
                }
                Ok(())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

/// Score in [0, 5] rounded half-up to one decimal
macro_rules! rating_value_object {
    ($(#[$meta:meta])* $name:ident, field = $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name(f64);

        impl $name {
            pub const MIN: f64 = 0.0;
            pub const MAX: f64 = 5.0;

            pub fn new(value: f64) -> $crate::errors::DomainResult<Self> {
                if value.is_nan() || !(Self::MIN..=Self::MAX).contains(&value) {
                    return Err($crate::errors::DomainError::out_of_range(
                        $field,
                        format!("must be between {} and {}", Self::MIN, Self::MAX),
                    ));
                }
                Ok(Self((value * 10.0).round() / 10.0))
            }

            pub fn value(&self) -> f64 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == 0.0
            }

            pub fn validate(&self) -> $crate::errors::DomainResult<()> {
                if (Self::MIN..=Self::MAX).contains(&self.0) {
                    Ok(())
                } else {
                    Err($crate::errors::DomainError::out_of_range(
                        $field,
                        format!("must be between {} and {}", Self::MIN, Self::MAX),
                    ))
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.1}", self.0)
            }
        }
    };
}
