use std::fmt;

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub tag_created: usize,
    pub alias_created: usize,
    pub tag_merged: usize,
    /// Aliases moved from one local tag to another.
    pub alias_migrated: usize,
    pub media_updated: usize,
    pub tag_updated: usize,
    pub tag_not_updated: usize,
    pub conflicts: usize,
    pub failures: usize,
}

impl RunStats {
    /// Number of writes issued against the catalog.
    pub fn mutations(&self) -> usize {
        self.tag_created
            + self.alias_created
            + self.tag_merged
            + self.alias_migrated
            + self.media_updated
            + self.tag_updated
    }

    pub fn summary_lines(&self) -> Vec<String> {
        const RULE: &str = "------------------------:";
        let row = |label: &str, value: usize| format!("{label:<24}: {value}");
        vec![
            RULE.to_string(),
            row("Tags Created", self.tag_created),
            row("Aliases Created", self.alias_created),
            row("Tags Merged", self.tag_merged),
            row("Mismatched Aliases Fixed", self.alias_migrated),
            row("Media Updated", self.media_updated),
            RULE.to_string(),
            row("Tags Updated", self.tag_updated),
            row("Tags Not Updated", self.tag_not_updated),
            RULE.to_string(),
            row("Unresolved Conflicts", self.conflicts),
            row("Failed Tags", self.failures),
            RULE.to_string(),
        ]
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_aligns_labels() {
        let stats = RunStats {
            tag_created: 3,
            alias_migrated: 1,
            ..RunStats::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Tags Created            : 3"));
        assert!(rendered.contains("Mismatched Aliases Fixed: 1"));
        assert_eq!(stats.mutations(), 4);
    }
}
