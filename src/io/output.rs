use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{MinutesRecord, StructuredDocument};

/// Write any document as pretty JSON
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", text)?;
    Ok(())
}

fn time_suffix(time: Option<&str>) -> String {
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!(" [{}]", t),
        None => String::new(),
    }
}

/// Markdown view of a structured summary
pub struct HumanSummary<'a> {
    document: &'a StructuredDocument,
}

impl<'a> HumanSummary<'a> {
    pub fn new(document: &'a StructuredDocument) -> Self {
        Self { document }
    }

    pub fn format(&self) -> String {
        let doc = self.document;
        let mut output = format!("# {}\n\n", doc.metadata.title);

        if !doc.metadata.participants.is_empty() {
            output.push_str(&format!(
                "**Participants:** {}\n\n",
                doc.metadata.participants.join(", ")
            ));
        }

        output.push_str("## Main points\n\n");
        for (i, topic) in doc.main_points.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}{}\n",
                i + 1,
                topic.title,
                time_suffix(topic.time.as_deref())
            ));
        }

        output.push_str("\n## Details\n");
        for topic in &doc.main_points {
            output.push_str(&format!(
                "\n### {}{}\n\n",
                topic.title,
                time_suffix(topic.time.as_deref())
            ));
            if let Some(detail) = doc.detail_for(topic) {
                for line in detail.lines() {
                    output.push_str(line);
                    output.push('\n');
                }
                for kt in &detail.key_timestamps {
                    output.push_str(&format!(
                        "\n> {}{}",
                        kt.description,
                        time_suffix(kt.time.as_deref())
                    ));
                }
                if !detail.key_timestamps.is_empty() {
                    output.push('\n');
                }
            }
        }

        if !doc.tasks_and_objectives.is_empty() {
            output.push_str("\n## Tasks and objectives\n\n");
            for item in &doc.tasks_and_objectives {
                output.push_str(&format!("- **{}**", item.task));
                if !item.description.is_empty() {
                    output.push_str(&format!(": {}", item.description));
                }
                output.push('\n');
            }
        }

        output
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        write_text(path, &self.format())
    }
}

/// Markdown view of composed minutes
pub struct HumanMinutes<'a> {
    record: &'a MinutesRecord,
}

impl<'a> HumanMinutes<'a> {
    pub fn new(record: &'a MinutesRecord) -> Self {
        Self { record }
    }

    pub fn format(&self) -> String {
        let record = self.record;
        let mut output = format!("# {}\n\n", record.metadata.title);

        if let Some(date) = &record.metadata.date {
            output.push_str(&format!("**Date:** {}\n", date));
        }
        if let Some(seconds) = record.metadata.duration_seconds {
            output.push_str(&format!("**Duration:** {} min\n", seconds / 60));
        }
        if !record.participants.is_empty() {
            let names: Vec<&str> = record.participants.iter().map(|p| p.name.as_str()).collect();
            output.push_str(&format!("**Participants:** {}\n", names.join(", ")));
        }

        if let Some(objective) = &record.objective {
            output.push_str(&format!("\n## Objective\n\n{}\n", objective));
        }

        output.push_str("\n## Key points\n");
        for point in &record.key_points {
            output.push_str(&format!(
                "\n### {}{}\n\n",
                point.title,
                time_suffix(point.time.as_deref())
            ));
            if let Some(detail) = record.details.get(&point.id) {
                output.push_str(detail.content.trim_end());
                output.push('\n');
            }
        }

        if !record.tasks_and_objectives.is_empty() {
            output.push_str("\n## Tasks and objectives\n\n");
            for item in &record.tasks_and_objectives {
                output.push_str(&format!("- **{}**", item.task));
                if !item.description.is_empty() {
                    output.push_str(&format!(": {}", item.description));
                }
                output.push('\n');
            }
        }

        output
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        write_text(path, &self.format())
    }
}
