//! Pod spec discovery
//!
//! Workload kinds nest their pod spec at different depths. Rather than
//! matching on `kind`, every known location is probed on every document,
//! so unknown or custom kinds that reuse a standard layout still work.

use crate::parsers::Document;

/// A known location of an object holding `containers` / `initContainers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecPath {
    /// `spec.template.spec` (Deployment, DaemonSet, StatefulSet, ReplicaSet, Job)
    WorkloadTemplate,
    /// `spec.jobTemplate.spec.template.spec` (CronJob)
    CronJobTemplate,
    /// `spec` (Pod)
    PodSpec,
    /// `template.spec` (PodTemplate)
    PodTemplate,
    /// `spec.taskTemplate.spec` (task-style templates)
    TaskTemplate,
}

impl SpecPath {
    /// Probe order. Results keep this order.
    pub const ALL: [SpecPath; 5] = [
        SpecPath::WorkloadTemplate,
        SpecPath::CronJobTemplate,
        SpecPath::PodSpec,
        SpecPath::PodTemplate,
        SpecPath::TaskTemplate,
    ];

    /// Field names to follow from the document root.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            SpecPath::WorkloadTemplate => &["spec", "template", "spec"],
            SpecPath::CronJobTemplate => &["spec", "jobTemplate", "spec", "template", "spec"],
            SpecPath::PodSpec => &["spec"],
            SpecPath::PodTemplate => &["template", "spec"],
            SpecPath::TaskTemplate => &["spec", "taskTemplate", "spec"],
        }
    }

    /// Dotted form, e.g. `spec.template.spec`.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecPath::WorkloadTemplate => "spec.template.spec",
            SpecPath::CronJobTemplate => "spec.jobTemplate.spec.template.spec",
            SpecPath::PodSpec => "spec",
            SpecPath::PodTemplate => "template.spec",
            SpecPath::TaskTemplate => "spec.taskTemplate.spec",
        }
    }

    /// Resolve this path in `doc`. Missing and null values are absent.
    pub fn resolve(self, doc: &Document) -> Option<&Document> {
        self.keys()
            .iter()
            .try_fold(doc, |node, key| node.get(*key))
            .filter(|node| !node.is_null())
    }
}

/// An object found at one of the known locations.
#[derive(Debug, Clone, Copy)]
pub struct SpecCandidate<'a> {
    pub path: SpecPath,
    pub spec: &'a Document,
}

/// Every candidate present in `doc`, in [`SpecPath::ALL`] order.
///
/// The same containers can be reachable from two paths on hybrid documents;
/// no deduplication is done here.
pub fn locate_specs(doc: &Document) -> Vec<SpecCandidate<'_>> {
    SpecPath::ALL
        .iter()
        .filter_map(|&path| path.resolve(doc).map(|spec| SpecCandidate { path, spec }))
        .collect()
}
