/// Catalog-assigned identifier of a local tag.
///
/// Stash hands ids out as decimal strings over GraphQL; they are kept opaque
/// here so the same type can carry ids from any catalog implementation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagId(pub String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        TagId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TagId {
    fn from(value: &str) -> Self {
        TagId(value.to_string())
    }
}

impl From<String> for TagId {
    fn from(value: String) -> Self {
        TagId(value)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
