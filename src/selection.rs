use std::fmt;
use std::str::FromStr;

use clap::builder::PossibleValue;
use clap::ValueEnum;

use crate::TransformError;

/// Declares a transformation axis enum whose first variant is the "no transformation" sentinel.
macro_rules! axis_options {
    (
        $(#[$meta:meta])*
        $name:ident, $axis:expr, {
            None => $none_label:literal,
            $($variant:ident => ($token:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            #[default]
            None,
            $($variant),+
        }

        impl $name {
            /// Lower-case wire token, `None` for the sentinel
            pub fn token(&self) -> Option<&'static str> {
                match self {
                    $name::None => None,
                    $($name::$variant => Some($token)),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $name::None => $none_label,
                    $($name::$variant => $label),+
                }
            }

            pub fn is_none(&self) -> bool {
                matches!(self, $name::None)
            }

            pub fn all() -> &'static [$name] {
                &[$name::None, $($name::$variant),+]
            }
        }

        impl FromStr for $name {
            type Err = TransformError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    "none" => Ok($name::None),
                    $($token => Ok($name::$variant),)+
                    _ => Err(TransformError::UnknownOption {
                        axis: $axis.as_str(),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token().unwrap_or("none"))
            }
        }

        impl ValueEnum for $name {
            fn value_variants<'a>() -> &'a [Self] {
                $name::all()
            }

            fn to_possible_value(&self) -> Option<PossibleValue> {
                Some(PossibleValue::new(self.token().unwrap_or("none")).help(self.label()))
            }
        }
    };
}

axis_options! {
    /// Vegetarian axis
    Vegetarian, Axis::Veg, {
        None => "Non-vegetarian",
        Veg => ("veg", "Vegetarian"),
    }
}

axis_options! {
    /// Cuisine the recipe should be rewritten towards
    Cuisine, Axis::Cuisine, {
        None => "No cuisine transformation",
        Indian => ("indian", "Indian"),
        German => ("german", "German"),
        French => ("french", "French"),
        African => ("african", "African"),
    }
}

axis_options! {
    /// Health target
    Health, Axis::Health, {
        None => "No health transformation",
        Healthy => ("healthy", "Healthy"),
        LowFat => ("lowfat", "Low fat"),
        LowCal => ("lowcal", "Low calorie"),
    }
}

/// Identifies one of the three transformation axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Veg,
    Cuisine,
    Health,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Veg => "veg",
            Axis::Cuisine => "cuisine",
            Axis::Health => "health",
        }
    }
}

impl FromStr for Axis {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veg" | "vegetarian" => Ok(Axis::Veg),
            "cuisine" => Ok(Axis::Cuisine),
            "health" => Ok(Axis::Health),
            _ => Err(TransformError::UnknownAxis(s.to_string())),
        }
    }
}

/// A value for one axis; the variant names the axis it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationOption {
    Vegetarian(Vegetarian),
    Cuisine(Cuisine),
    Health(Health),
}

impl TransformationOption {
    /// Parse `value` as an option of `axis`
    pub fn parse(axis: Axis, value: &str) -> Result<Self, TransformError> {
        Ok(match axis {
            Axis::Veg => TransformationOption::Vegetarian(value.parse()?),
            Axis::Cuisine => TransformationOption::Cuisine(value.parse()?),
            Axis::Health => TransformationOption::Health(value.parse()?),
        })
    }
}

impl From<Vegetarian> for TransformationOption {
    fn from(value: Vegetarian) -> Self {
        TransformationOption::Vegetarian(value)
    }
}

impl From<Cuisine> for TransformationOption {
    fn from(value: Cuisine) -> Self {
        TransformationOption::Cuisine(value)
    }
}

impl From<Health> for TransformationOption {
    fn from(value: Health) -> Self {
        TransformationOption::Health(value)
    }
}

/// The recipe address as typed plus the chosen value of every axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationSelection {
    query: String,
    vegetarian: Vegetarian,
    cuisine: Cuisine,
    health: Health,
}

impl TransformationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query verbatim; no trimming
    pub fn set_query(&mut self, value: impl Into<String>) {
        self.query = value.into();
    }

    pub fn set_option(&mut self, option: impl Into<TransformationOption>) {
        match option.into() {
            TransformationOption::Vegetarian(v) => self.vegetarian = v,
            TransformationOption::Cuisine(c) => self.cuisine = c,
            TransformationOption::Health(h) => self.health = h,
        }
    }

    /// Set an axis from its textual name and value.
    ///
    /// Unknown axes and values are rejected and leave the selection untouched.
    pub fn set_option_named(&mut self, axis: &str, value: &str) -> Result<(), TransformError> {
        let axis: Axis = axis.parse()?;
        let option = TransformationOption::parse(axis, value)?;
        self.set_option(option);
        Ok(())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn vegetarian(&self) -> Vegetarian {
        self.vegetarian
    }

    pub fn cuisine(&self) -> Cuisine {
        self.cuisine
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn option(&self, axis: Axis) -> TransformationOption {
        match axis {
            Axis::Veg => self.vegetarian.into(),
            Axis::Cuisine => self.cuisine.into(),
            Axis::Health => self.health.into(),
        }
    }
}
