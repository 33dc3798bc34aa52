/// Punctuation removed before comparing titles and bullet lines
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '¡', '¿', '?', '-', '(', ')', '[', ']', '{', '}', '"', '\'', '`',
];

/// Canonical comparison form of a title or bullet line
///
/// Lowercases, collapses whitespace runs to a single space, drops the
/// punctuation set above and trims.
pub fn normalize_text(text: &str) -> String {
    let collapsed = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    collapsed
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Remove a leading "-" or "*" bullet marker and surrounding whitespace
pub fn strip_bullet_prefix(line: &str) -> &str {
    let line = line.trim_start();
    let line = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .unwrap_or(line);
    line.trim()
}

/// Comparison form of a bullet line
pub fn normalize_bullet(line: &str) -> String {
    normalize_text(strip_bullet_prefix(line))
}

/// Deduplication key of a topic: normalized title and trimmed time
pub fn topic_key(title: &str, time: Option<&str>) -> String {
    format!("{}|{}", normalize_text(title), time.unwrap_or("").trim())
}

/// Force every non-blank line to start with "- "
///
/// Indented sub-bullets keep their indentation and get the marker after it.
pub fn ensure_bullets(text: &str) -> String {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let indent = &line[..line.len() - line.trim_start().len()];
            let body = strip_bullet_prefix(line);
            format!("{}- {}", indent, body)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Presupuesto  "), "presupuesto");
        assert_eq!(normalize_text("¿Qué   PASA?"), "qué pasa");
        assert_eq!(normalize_text("Plan (v2): revisión."), "plan v2 revisión");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_strip_bullet_prefix() {
        assert_eq!(strip_bullet_prefix("- Se aprueba"), "Se aprueba");
        assert_eq!(strip_bullet_prefix("  * Se aprueba "), "Se aprueba");
        assert_eq!(strip_bullet_prefix("Se aprueba"), "Se aprueba");
    }

    #[test]
    fn test_bullet_variants_normalize_equal() {
        assert_eq!(
            normalize_bullet("- Se aprueba el presupuesto."),
            normalize_bullet("*  se aprueba el Presupuesto")
        );
    }

    #[test]
    fn test_topic_key() {
        assert_eq!(topic_key("Presupuesto ", Some(" 05:00")), "presupuesto|05:00");
        assert_eq!(topic_key("Presupuesto", None), "presupuesto|");
    }

    #[test]
    fn test_ensure_bullets() {
        let text = "Primera idea\n\n- Segunda idea\n  * detalle";
        assert_eq!(
            ensure_bullets(text),
            "- Primera idea\n- Segunda idea\n  - detalle"
        );
    }
}
