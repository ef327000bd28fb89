//! Identifiers
//!
//! Catalog identifiers are opaque strings handed to us by the catalog or the
//! offer resolver. Each kind gets its own newtype so a store id can never be
//! passed where a product id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Product identifier
    ProductId
);

string_id!(
    /// Store identifier (a single physical store)
    StoreId
);

string_id!(
    /// Chainstore identifier
    ChainstoreId
);

string_id!(
    /// Category identifier
    CategoryId
);

string_id!(
    /// Brand identifier
    BrandId
);
