//! Image report generation
//!
//! This module turns a [`ParseResult`] into the formats the command line
//! can print: a terminal table, CSV, JSON and Markdown. It also provides
//! the search filter and summary statistics shown alongside them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::extract::{ImageReference, ParseResult};
use crate::utils::truncate_string;

const CSV_HEADER: [&str; 6] = [
    "image",
    "resourceKind",
    "resourceName",
    "namespace",
    "containerType",
    "sourceFile",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatistics {
    pub total_references: usize,
    pub unique_images: usize,
    /// Images without any `:` (no tag, no digest)
    pub missing_tag_count: usize,
}

pub fn compute_statistics(references: &[ImageReference]) -> ImageStatistics {
    let unique: HashSet<&str> = references.iter().map(|r| r.image.as_str()).collect();
    let missing_tag_count = references
        .iter()
        .filter(|r| !r.image.contains(':'))
        .count();

    ImageStatistics {
        total_references: references.len(),
        unique_images: unique.len(),
        missing_tag_count,
    }
}

/// Case-insensitive search over image, kind, name, namespace and source.
///
/// A blank query matches everything.
pub fn filter_references<'a>(
    references: &'a [ImageReference],
    query: &str,
) -> Vec<&'a ImageReference> {
    if query.trim().is_empty() {
        return references.iter().collect();
    }

    let keyword = query.to_lowercase();
    references
        .iter()
        .filter(|r| {
            [
                r.image.as_str(),
                r.resource_kind.as_str(),
                r.resource_name.as_str(),
                r.namespace.as_str(),
                r.source_file.as_str(),
            ]
            .join(" ")
            .to_lowercase()
            .contains(&keyword)
        })
        .collect()
}

pub fn generate_csv(references: &[&ImageReference]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for r in references {
        writer.write_record([
            r.image.as_str(),
            r.resource_kind.as_str(),
            r.resource_name.as_str(),
            r.namespace.as_str(),
            r.container_type.as_str(),
            r.source_file.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn generate_json(references: &[&ImageReference]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(references)
}

pub fn generate_markdown_report(result: &ParseResult, references: &[&ImageReference]) -> String {
    let stats = compute_statistics(&result.references);

    let mut lines = vec![
        "# Container Image Report".to_string(),
        String::new(),
        format!("**Date**: {}", chrono::Local::now().format("%Y-%m-%d")),
        String::new(),
        "## Summary".to_string(),
        "| Metric | Count |".to_string(),
        "|--------|-------|".to_string(),
        format!("| Files | {} |", result.file_count),
        format!("| Text entries | {} |", result.text_entry_count),
        format!("| References | {} |", stats.total_references),
        format!("| Unique images | {} |", stats.unique_images),
        format!("| Missing tag | {} |", stats.missing_tag_count),
        format!("| Errors | {} |", result.errors.len()),
        String::new(),
    ];

    if references.is_empty() {
        lines.push("## No images found".to_string());
        lines.push(String::new());
    } else {
        lines.push("## Images".to_string());
        lines.push(String::new());
        lines.push("| Image | Resource | Namespace | Type | Source |".to_string());
        lines.push("|-------|----------|-----------|------|--------|".to_string());
        for r in references {
            lines.push(format!(
                "| {} | {} {} | {} | {} | {} |",
                escape_markdown_cell(&r.image),
                escape_markdown_cell(&r.resource_kind),
                escape_markdown_cell(&r.resource_name),
                escape_markdown_cell(&r.namespace),
                r.container_type.as_str(),
                escape_markdown_cell(&r.source_file)
            ));
        }
        lines.push(String::new());
    }

    if !result.errors.is_empty() {
        lines.push("## Errors".to_string());
        lines.push(String::new());
        for error in &result.errors {
            lines.push(format!("- **{}**: {}", error.file, error.message));
        }
    }

    lines.join("\n")
}

/// Fixed-width table for terminal output. Cells longer than `max_width`
/// characters are truncated with an ellipsis.
pub fn generate_table(references: &[&ImageReference], max_width: usize) -> String {
    let header = ["IMAGE", "RESOURCE", "NAMESPACE", "TYPE", "SOURCE"];
    let rows: Vec<[String; 5]> = references
        .iter()
        .map(|r| {
            [
                truncate_string(&r.image, max_width),
                truncate_string(&format!("{}/{}", r.resource_kind, r.resource_name), max_width),
                truncate_string(&r.namespace, max_width),
                r.container_type.as_str().to_string(),
                truncate_string(&r.source_file, max_width),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(header.iter().copied(), &widths));
    for row in &rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }

    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn escape_markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('`', "\\`")
}
