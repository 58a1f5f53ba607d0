//! OOXML attribute literals
//!
//! Every closed set of attribute values (border styles, width units, merge
//! states, ...) is modelled as a plain enum. Parsing is lenient: a literal
//! that is not part of the set maps to the enum's documented fallback
//! variant instead of failing, both from XML and from JSON.

/// Declare an enum backed by OOXML literal strings.
///
/// The variant named after `fallback` is returned by `from_literal` for any
/// unrecognized input and is also the `Default` value.
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident fallback $fallback:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// The literal written to XML for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $lit ),+
                }
            }

            #[doc = concat!("Map an XML literal to a value; unknown literals become `", stringify!($fallback), "`.")]
            pub fn from_literal(value: &str) -> Self {
                match value {
                    $( $lit => $name::$variant, )+
                    _ => $name::$fallback,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$fallback
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from_literal(value)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_literal(&value))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
