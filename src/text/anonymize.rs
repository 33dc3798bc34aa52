use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Placeholder substituted for participant names in generated text
pub const DEFAULT_PLACEHOLDER: &str = "un participante";

/// Compiled-size budget for the single pattern holding every alias
pub const ALIAS_PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Whole-word, case-insensitive replacement of participant names
#[derive(Debug, Clone)]
pub struct Anonymizer {
    /// One combined pattern, or one pattern per alias (longest first) when
    /// the combined one exceeds its size budget
    aliases: Vec<Regex>,
    repeats: Regex,
    placeholder: String,
}

impl Anonymizer {
    /// Build from participant names with the default placeholder
    pub fn new(participants: &[String]) -> Result<Self, regex::Error> {
        Self::with_placeholder(participants, DEFAULT_PLACEHOLDER)
    }

    pub fn with_placeholder(
        participants: &[String],
        placeholder: &str,
    ) -> Result<Self, regex::Error> {
        Self::build(participants, placeholder, ALIAS_PATTERN_SIZE_LIMIT)
    }

    fn build(
        participants: &[String],
        placeholder: &str,
        combined_size_limit: usize,
    ) -> Result<Self, regex::Error> {
        let names = build_aliases(participants);
        let aliases = if names.is_empty() {
            Vec::new()
        } else {
            match alias_pattern(&names, Some(combined_size_limit)) {
                Ok(regex) => vec![regex],
                Err(e) => {
                    warn!(
                        "Combined name pattern rejected ({}); matching {} aliases one at a time",
                        e,
                        names.len()
                    );
                    names
                        .iter()
                        .map(|name| alias_pattern(std::slice::from_ref(name), None))
                        .collect::<Result<Vec<_>, _>>()?
                }
            }
        };

        let escaped = regex::escape(placeholder);
        let repeats = RegexBuilder::new(&format!(r"{}(?:[\s,]+{})+", escaped, escaped))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            aliases,
            repeats,
            placeholder: placeholder.to_string(),
        })
    }

    /// True when there is nothing to replace
    pub fn is_noop(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        if self.is_noop() {
            return text.to_string();
        }
        let mut replaced = text.to_string();
        for alias in &self.aliases {
            replaced = alias
                .replace_all(&replaced, self.placeholder.as_str())
                .into_owned();
        }
        self.repeats
            .replace_all(&replaced, self.placeholder.as_str())
            .into_owned()
    }
}

fn alias_pattern(names: &[String], size_limit: Option<usize>) -> Result<Regex, regex::Error> {
    let pattern = names
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|");
    let mut builder = RegexBuilder::new(&format!(r"\b(?:{})\b", pattern));
    builder.case_insensitive(true);
    if let Some(limit) = size_limit {
        builder.size_limit(limit);
    }
    builder.build()
}

/// Full names plus every name fragment longer than two characters,
/// longest first so full names win over their parts
pub fn build_aliases(participants: &[String]) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    for name in participants {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        aliases.push(name.to_string());
        for part in name.split_whitespace() {
            if part.chars().count() > 2 {
                aliases.push(part.to_string());
            }
        }
    }

    aliases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    aliases.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());
    aliases
}
