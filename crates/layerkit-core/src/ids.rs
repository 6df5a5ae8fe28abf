//! Identifiers for documents and layers
//!
//! Both are UUIDs with a kind prefix in their textual form
//! (`document-<uuid>`, `layer-<uuid>`), so ids of different kinds can never
//! be confused in logs or persisted keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Textual prefix used by `Display` and `FromStr`.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .ok_or_else(|| format!("Expected '{}-' prefix: {}", Self::PREFIX, s))?;
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|e| format!("Invalid {} id '{}': {}", Self::PREFIX, s, e))
            }
        }
    };
}

prefixed_id!(
    /// Identifier of an open document.
    DocumentId,
    "document"
);

prefixed_id!(
    /// Identifier of a layer, unique across all documents.
    LayerId,
    "layer"
);
