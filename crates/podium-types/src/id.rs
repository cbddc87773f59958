use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Opaque: any non-empty string read from a document is kept as is.
        /// Fresh identifiers are UUID v7 strings, so they sort by creation time.
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new time-ordered identifier (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short representation (first 8 characters).
            pub fn short_id(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(TypeError::InvalidId(s.to_string()));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

entity_id! {
    /// Stable identifier of a competing team.
    TeamId
}

entity_id! {
    /// Stable identifier of a festival event.
    EventId
}

entity_id! {
    /// Stable identifier of an event category.
    CategoryId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let a = TeamId::new();
        let b = TeamId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn short_id_is_prefix_of_display() {
        let id = EventId::new();
        assert_eq!(id.short_id().len(), 8);
        assert!(id.to_string().starts_with(id.short_id()));
    }

    #[test]
    fn parse_display_roundtrip() {
        let id = CategoryId::new();
        let parsed: CategoryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_blank() {
        let err = "  ".parse::<TeamId>().unwrap_err();
        assert_eq!(err, TypeError::InvalidId("  ".into()));
    }

    #[test]
    fn legacy_timestamp_ids_are_accepted() {
        let id: TeamId = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(id.as_str(), "1700000000000");
        assert_eq!(id.short_id(), "17000000");
        assert_eq!("1700000000000".parse::<TeamId>().unwrap(), id);
    }

    #[test]
    fn short_id_of_short_value_is_whole() {
        let id: EventId = "e1".parse().unwrap();
        assert_eq!(id.short_id(), "e1");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TeamId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn debug_uses_type_name() {
        let id = TeamId::new();
        assert!(format!("{id:?}").starts_with("TeamId("));
    }
}
