//! Declarative macros for reducing score type boilerplate.
//!
//! Every field-based score type stores an `init_score: i32` followed by its
//! `i64` levels. These macros generate the ordering, arithmetic, scaling and
//! slash-separated parsing those types share.

/// Generates `Ord`, `PartialOrd`, `Add`, `Sub`, and `Neg` for a field-based score type.
///
/// Fields are compared in the order they are listed, after the init score.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft });
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ }) => {
        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.init_score
                    .cmp(&other.init_score)
                    $( .then_with(|| self.$field.cmp(&other.$field)) )+
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type {
                    init_score: self.init_score + other.init_score,
                    $( $field: self.$field + other.$field ),+
                }
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type {
                    init_score: self.init_score - other.init_score,
                    $( $field: self.$field - other.$field ),+
                }
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type {
                    init_score: -self.init_score,
                    $( $field: -self.$field ),+
                }
            }
        }
    };
}

/// Generates the init score accessors and the `multiply`, `divide`, `power`
/// and `abs` methods of the `Score` trait.
///
/// Intended to be used *inside* an `impl Score for Type { ... }` block.
/// Each operation floors its result, init score included.
///
/// # Usage
/// ```ignore
/// impl Score for HardSoftScore {
///     // ...other methods...
///     impl_score_scale!(HardSoftScore { hard, soft });
/// }
/// ```
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ }) => {
        #[inline]
        fn init_score(&self) -> i32 {
            self.init_score
        }

        #[inline]
        fn with_init_score(&self, init_score: i32) -> Self {
            $type { init_score, ..*self }
        }

        fn multiply(&self, multiplicand: f64) -> Self {
            $type {
                init_score: $crate::score::traits::floor_i32(self.init_score as f64 * multiplicand),
                $( $field: $crate::score::traits::floor_i64(self.$field as f64 * multiplicand) ),+
            }
        }

        fn divide(&self, divisor: f64) -> Self {
            $type {
                init_score: $crate::score::traits::floor_i32(self.init_score as f64 / divisor),
                $( $field: $crate::score::traits::floor_i64(self.$field as f64 / divisor) ),+
            }
        }

        fn power(&self, exponent: f64) -> Self {
            $type {
                init_score: $crate::score::traits::floor_i32((self.init_score as f64).powf(exponent)),
                $( $field: $crate::score::traits::floor_i64((self.$field as f64).powf(exponent)) ),+
            }
        }

        fn abs(&self) -> Self {
            $type {
                init_score: self.init_score.abs(),
                $( $field: self.$field.abs() ),+
            }
        }
    };
}

/// Generates `Display` and `ParseableScore` for scores using the
/// `"[<n>init/]Xsuffix/Ysuffix"` format.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" });
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ }) => {
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::score::traits::write_init_prefix(f, self.init_score)?;
                let parts: &[String] = &[ $( format!("{}{}", self.$field, $suffix) ),+ ];
                f.write_str(&parts.join("/"))
            }
        }

        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let (init_score, levels) = $crate::score::traits::split_init_score(s)?;
                let parts: Vec<&str> = levels.split('/').collect();
                let suffixes: &[&str] = &[ $($suffix),+ ];

                if parts.len() != suffixes.len() {
                    return Err($crate::score::traits::ScoreParseError::new(format!(
                        "Invalid {} format '{}': expected {} parts separated by '/'",
                        stringify!($type), s, suffixes.len()
                    )));
                }

                let mut parts = parts.into_iter();
                $(
                    let $field = {
                        let part = parts.next().unwrap_or_default().trim();
                        let number = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "{} part '{}' must end with '{}'",
                                stringify!($field), part, $suffix
                            ))
                        })?;
                        number.parse::<i64>().map_err(|e| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "Invalid {} score '{}': {}",
                                $suffix, number, e
                            ))
                        })?
                    };
                )+

                Ok($type { init_score, $($field),+ })
            }
        }
    };
}

// Macros are used via #[macro_use] on the module declaration.
