//! Macros for declaring slice action enums.

/// Declare a closed action enum with one unique string tag per variant.
///
/// Generates the enum (adjacently tagged as `{"type": tag, "payload": {...}}`
/// on the wire), a `TAGS` constant listing every tag and a `tag()` accessor.
///
/// # Example
///
/// ```
/// use statecraft::action_enum;
///
/// action_enum! {
///     pub enum CounterAction {
///         Increment { by: u32 } = "[Counter] Increment",
///         Reset = "[Counter] Reset",
///     }
/// }
///
/// assert_eq!(CounterAction::Reset.tag(), "[Counter] Reset");
/// assert_eq!(CounterAction::TAGS.len(), 2);
/// ```
#[macro_export]
macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $ty:ty),* $(,)? })? = $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(tag = "type", content = "payload")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $tag)]
                $variant $({ $($field: $ty),* })?
            ),*
        }

        impl $name {
            /// Every tag this enum can carry, in declaration order.
            pub const TAGS: &'static [&'static str] = &[$($tag),*];

            /// The unique tag of this action.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => $tag),*
                }
            }
        }
    };
}
