//! Strongly-typed identifiers for documents and document types.

/// Prefix the content store uses for unpublished working copies.
pub const DRAFT_PREFIX: &str = "drafts.";

/// Define a non-empty string identifier.
///
/// Generates the struct, a `Deserialize` impl that rejects empty strings,
/// `try_new()`, `as_str()`, and the usual string conversions.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($Name), " must not be empty"))
                })
            }
        }

        impl $Name {
            /// Returns `None` for empty or whitespace-only input.
            pub fn try_new(value: impl Into<String>) -> Option<Self> {
                let s = value.into();
                if s.trim().is_empty() {
                    None
                } else {
                    Some(Self(s))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_identifier! {
    /// Unique document identity (`_id`)
    pub struct DocumentId;
}

define_identifier! {
    /// Named document type (`_type`), e.g. `villa` or `equipment`
    pub struct DocumentType;
}

impl DocumentId {
    /// Whether this is the ID of a draft working copy.
    pub fn is_draft(&self) -> bool {
        self.0.starts_with(DRAFT_PREFIX)
    }

    /// The canonical published identity (strips the draft prefix).
    pub fn published(&self) -> DocumentId {
        match self.0.strip_prefix(DRAFT_PREFIX) {
            Some(rest) if !rest.is_empty() => DocumentId(rest.to_string()),
            _ => self.clone(),
        }
    }

    /// The draft counterpart of this identity.
    pub fn draft(&self) -> DocumentId {
        if self.is_draft() {
            self.clone()
        } else {
            DocumentId(format!("{DRAFT_PREFIX}{}", self.0))
        }
    }
}
