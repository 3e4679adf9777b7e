use crate::{
    error::{ModelError, Result},
    ids::TagId,
};

/// Tag record published by the remote stash-box service.
///
/// Canonical tags are ground truth for naming and aliasing and are never
/// mutated during a run. They are identified by `name`; the remote `id` is
/// kept for reference only and never sent to the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalTag {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl CanonicalTag {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyTagName);
        }
        Ok(Self {
            id: String::new(),
            name,
            aliases: Vec::new(),
            description: None,
        })
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description with blank values folded to `None`.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Tag owned by the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalTag {
    pub id: TagId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl LocalTag {
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|existing| existing == alias)
    }

    /// True when `value` is this tag's primary name or one of its aliases.
    pub fn answers_to(&self, value: &str) -> bool {
        self.name == value || self.has_alias(value)
    }

    pub fn to_ref(&self) -> TagRef {
        TagRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Lightweight tag handle as embedded in media payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRef {
    pub id: TagId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_tag_rejects_blank_name() {
        assert_eq!(CanonicalTag::new("  "), Err(ModelError::EmptyTagName));
    }

    #[test]
    fn blank_description_reads_as_none() {
        let tag = CanonicalTag::new("Feet").unwrap().with_description("   ");
        assert_eq!(tag.description(), None);
    }

    #[test]
    fn alias_matching_is_case_sensitive() {
        let tag = LocalTag {
            id: TagId::from("1"),
            name: "Feet".into(),
            aliases: vec!["Foot Fetish".into()],
            description: None,
        };
        assert!(tag.answers_to("Foot Fetish"));
        assert!(tag.answers_to("Feet"));
        assert!(!tag.answers_to("foot fetish"));
    }
}
