//! Keyword types and the enum_property! macro.
//!
//! These are the small closed vocabularies that appear in chart documents,
//! style payloads, and UI messages.

use std::fmt;

/// Macro for defining keyword enums with string conversion and serde support.
///
/// Each variant maps to the exact keyword used on the wire. Serialization
/// writes the keyword; deserialization rejects anything else.
///
/// # Example
///
/// ```ignore
/// enum_property! {
///     /// Stroke line style.
///     pub enum StrokeStyle {
///         #[default]
///         Solid => "solid",
///         Dash => "dash",
///     }
/// }
/// ```
macro_rules! enum_property {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $keyword:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Returns the wire keyword for this value.
            #[inline]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $keyword,)*
                }
            }

            /// Parse a wire keyword into this enum.
            #[inline]
            pub fn from_keyword(s: &str) -> Option<Self> {
                match s {
                    $($keyword => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                $name::from_keyword(&s)
                    .ok_or_else(|| serde::de::Error::unknown_variant(&s, &[$($keyword),*]))
            }
        }
    };
}

enum_property! {
    /// Stroke line style. Anything other than these two keywords is dropped
    /// during normalization.
    pub enum StrokeStyle {
        #[default]
        Solid => "solid",
        Dash => "dash",
    }
}

enum_property! {
    /// Chart kinds a document can describe.
    pub enum ChartType {
        #[default]
        Bar => "bar",
        StackedBar => "stackedBar",
        Line => "line",
    }
}

enum_property! {
    /// How raw values map to bar heights.
    pub enum ValueMode {
        /// Values are scaled against the largest value in the document.
        #[default]
        Raw => "raw",
        /// Values are percentages of the plot height.
        Percent => "percent",
    }
}

enum_property! {
    /// Visual slots that receive an injected style.
    pub enum StyleSlot {
        #[default]
        CellFill => "cellFill",
        CellTop => "cellTop",
        TabRight => "tabRight",
        GridContainer => "gridContainer",
        AssistLine => "assistLine",
        Mark => "mark",
    }
}

impl ChartType {
    /// Whether the first data row is reserved as the header/legend row.
    #[inline]
    pub fn reserves_header_row(&self) -> bool {
        matches!(self, ChartType::StackedBar)
    }

    /// Name prefix of the frames that carry one value each.
    #[inline]
    pub fn target_prefix(&self) -> &'static str {
        match self {
            ChartType::Bar | ChartType::StackedBar => "bar",
            ChartType::Line => "point",
        }
    }
}
