//! Image reference extraction from pod specs

use super::context::ResourceContext;
use super::locator::{SpecCandidate, locate_specs};
use super::{ContainerType, ImageReference};
use crate::parsers::Document;

/// Extract every image reference from one document.
///
/// Candidates are scanned in locator order; within each one, `containers`
/// come before `initContainers`.
pub fn extract_images(
    doc: &Document,
    source_name: &str,
    context: &ResourceContext,
) -> Vec<ImageReference> {
    locate_specs(doc)
        .iter()
        .flat_map(|candidate| images_in_spec(candidate, source_name, context))
        .collect()
}

/// Extract image references from a single spec candidate.
pub fn images_in_spec(
    candidate: &SpecCandidate<'_>,
    source_name: &str,
    context: &ResourceContext,
) -> Vec<ImageReference> {
    let mut references = Vec::new();

    if !candidate.spec.is_mapping() {
        return references;
    }

    for container_type in [ContainerType::Container, ContainerType::InitContainer] {
        let Some(entries) = candidate
            .spec
            .get(container_type.field_name())
            .and_then(Document::as_sequence)
        else {
            continue;
        };

        for entry in entries {
            let Some(image) = image_of(entry) else {
                continue;
            };

            references.push(ImageReference {
                image: image.to_string(),
                resource_kind: context.kind.clone(),
                resource_name: display_name(context, container_name(entry)),
                namespace: context.namespace.clone(),
                source_file: source_name.to_string(),
                container_type,
            });
        }
    }

    references
}

/// The trimmed `image` of a container entry, if it is a non-blank string.
fn image_of(entry: &Document) -> Option<&str> {
    let image = entry.get("image")?.as_str()?.trim();
    (!image.is_empty()).then_some(image)
}

fn container_name(entry: &Document) -> Option<&str> {
    entry
        .get("name")
        .and_then(Document::as_str)
        .filter(|name| !name.is_empty())
}

/// `web / app` when the container name adds information, `web` otherwise.
fn display_name(context: &ResourceContext, container: Option<&str>) -> String {
    match container {
        Some(container) if container != context.name => {
            format!("{} / {container}", context.name)
        }
        _ => context.name.clone(),
    }
}
