use tracing::{debug, warn};

use crate::llm::{Generator, build_backfill_prompt, build_backfill_system};
use crate::models::{MinutesDetail, MinutesDocument, Topic};
use crate::text::{ensure_bullets, extract_segment_lines, sort_key};

use super::MinutesConfig;

/// Transcript window `[start, end)` of the point at `index`, in seconds
///
/// A point runs until the next point starts, or to the end of the
/// transcript. A point without a parseable time gets an empty window.
pub fn point_window(points: &[Topic], index: usize) -> (u32, u32) {
    let start = sort_key(points[index].time.as_deref());
    let end = points
        .get(index + 1)
        .map(|next| sort_key(next.time.as_deref()))
        .unwrap_or(u32::MAX);
    (start, end)
}

/// Transcript lines for the point at `index`
///
/// Falls back to the first `fallback_lines` lines when the window matches nothing.
pub fn point_segment(
    transcript: &str,
    points: &[Topic],
    index: usize,
    fallback_lines: usize,
) -> String {
    let (start, end) = point_window(points, index);
    let segment = extract_segment_lines(transcript.lines(), start, end);
    if !segment.trim().is_empty() {
        return segment;
    }

    transcript
        .lines()
        .take(fallback_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bullet text from a free-text completion, without code fences
fn clean_bullets(text: &str) -> String {
    let body = text
        .lines()
        .filter(|l| !l.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");
    ensure_bullets(&body)
}

fn is_thin(detail: Option<&MinutesDetail>, min_chars: usize) -> bool {
    detail.is_none_or(|d| d.content.trim().chars().count() < min_chars)
}

/// Regenerate missing or thin point details from their transcript windows
///
/// One bounded request per thin point. A failed request leaves the existing
/// detail as it was. Returns how many details were replaced.
pub async fn backfill_details<G: Generator + ?Sized>(
    generator: &G,
    minutes: &mut MinutesDocument,
    transcript: &str,
    config: &MinutesConfig,
) -> usize {
    let system = build_backfill_system();
    let mut filled = 0;

    for index in 0..minutes.main_points.len() {
        let topic = &minutes.main_points[index];
        if !is_thin(minutes.details.get(&topic.id), config.min_detail_chars) {
            continue;
        }

        let segment = point_segment(transcript, &minutes.main_points, index, config.fallback_lines);
        if segment.trim().is_empty() {
            continue;
        }

        let prompt = build_backfill_prompt(&topic.title, &segment);
        let bullets = match generator.generate_text(&system, &prompt).await {
            Ok(text) => clean_bullets(&text),
            Err(e) => {
                warn!("Detail backfill for {} failed: {:#}", topic.id, e);
                continue;
            }
        };
        if bullets.is_empty() {
            continue;
        }

        debug!("Backfilled detail for {} ({} chars)", topic.id, bullets.len());
        let title = minutes
            .details
            .get(&topic.id)
            .map(|d| d.title.clone())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| topic.title.clone());
        minutes.details.insert(
            topic.id.clone(),
            MinutesDetail {
                title,
                content: bullets,
            },
        );
        filled += 1;
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "[00:00] Bienvenida\n[01:00] Cifras del trimestre\ncontinuación\n[02:30] Más cifras\n[04:00] Contratos\n[05:10] Cierre";

    fn points() -> Vec<Topic> {
        vec![
            Topic::new("p1", "Apertura", Some("00:00")),
            Topic::new("p2", "Cifras", Some("01:00")),
            Topic::new("p3", "Contratos", Some("04:00")),
        ]
    }

    #[test]
    fn test_point_window() {
        let points = points();
        assert_eq!(point_window(&points, 0), (0, 60));
        assert_eq!(point_window(&points, 1), (60, 240));
        assert_eq!(point_window(&points, 2), (240, u32::MAX));
    }

    #[test]
    fn test_point_segment() {
        let points = points();
        assert_eq!(
            point_segment(TRANSCRIPT, &points, 1, 300),
            "[01:00] Cifras del trimestre\n[02:30] Más cifras"
        );
        assert_eq!(
            point_segment(TRANSCRIPT, &points, 2, 300),
            "[04:00] Contratos\n[05:10] Cierre"
        );
    }

    #[test]
    fn test_untimed_point_falls_back_to_first_lines() {
        let points = vec![Topic::new("p1", "Sin hora", None)];
        assert_eq!(
            point_segment(TRANSCRIPT, &points, 0, 2),
            "[00:00] Bienvenida\n[01:00] Cifras del trimestre"
        );
    }

    #[test]
    fn test_clean_bullets() {
        let text = "```\nPrimera\n- Segunda\n  * sub\n```";
        assert_eq!(clean_bullets(text), "- Primera\n- Segunda\n  - sub");
    }

    #[test]
    fn test_is_thin() {
        let short = MinutesDetail {
            title: String::new(),
            content: "- corto".to_string(),
        };
        let long = MinutesDetail {
            title: String::new(),
            content: "x".repeat(80),
        };
        assert!(is_thin(None, 80));
        assert!(is_thin(Some(&short), 80));
        assert!(!is_thin(Some(&long), 80));
    }
}
