//! Per-component analysis results handed over by the source extractors.
//!
//! One [`ComponentAnalysis`] per analyzed markup bundle or page, each carrying
//! a flat list of [`RawDependency`] mentions. The graph builder consumes these
//! as-is; nothing here parses source text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::id;
use crate::model::kind::{DependencyKind, NodeKind};

/// A single dependency mention found while analyzing a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDependency {
    /// Identifier (or bare name) of the referenced component.
    pub target: String,
    pub kind: DependencyKind,
    /// 1-based source line of the mention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Literal expression text the reference came from, e.g. `{!c.handleClick}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

impl RawDependency {
    #[must_use]
    pub fn new(target: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            target: target.into(),
            kind,
            line: None,
            expression: None,
            bidirectional: None,
        }
    }

    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

/// Extraction output for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAnalysis {
    pub id: String,
    /// Display name. Derived from `id` when empty.
    #[serde(default)]
    pub name: String,
    /// Declared kind. Inferred from `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    /// Source path of the bundle or page.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub dependencies: Vec<RawDependency>,
    /// Externally supplied effort estimate for converting this component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

impl ComponentAnalysis {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: None,
            path: String::new(),
            dependencies: Vec::new(),
            estimated_hours: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub const fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn depends_on(mut self, target: impl Into<String>, kind: DependencyKind) -> Self {
        self.dependencies.push(RawDependency::new(target, kind));
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, dependency: RawDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Declared kind, or the kind implied by the identifier.
    #[must_use]
    pub fn resolved_kind(&self) -> NodeKind {
        self.kind.unwrap_or_else(|| id::infer_kind(&self.id))
    }

    /// Declared name, or the name part of the identifier.
    #[must_use]
    pub fn resolved_name(&self) -> &str {
        if self.name.trim().is_empty() {
            id::display_name(&self.id)
        } else {
            &self.name
        }
    }

    /// Identifier this analysis contributes to the graph, or `None` when it
    /// cannot name a node.
    #[must_use]
    pub fn normalized_id(&self) -> Option<String> {
        id::normalize_id(&self.id, self.resolved_kind())
    }

    /// Drop repeated `(target, kind)` mentions, keeping the first occurrence.
    ///
    /// Targets are compared after normalization, so `card` and `c:card`
    /// under the same component tag are one mention. Returns the number of
    /// mentions removed. The same target mentioned under different kinds is
    /// kept once per kind.
    pub fn dedup_dependencies(&mut self) -> usize {
        let before = self.dependencies.len();
        let mut seen: HashSet<(String, DependencyKind)> = HashSet::with_capacity(before);
        self.dependencies.retain(|dep| {
            let target = id::normalize_target(&dep.target, dep.kind)
                .unwrap_or_else(|| dep.target.trim().to_string());
            seen.insert((target, dep.kind))
        });
        before - self.dependencies.len()
    }
}

/// Failure to read an analysis input file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Accepted top-level shapes of an analysis file.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnalysisFile {
    Bare(Vec<ComponentAnalysis>),
    Wrapped { components: Vec<ComponentAnalysis> },
}

/// Parse analyses from JSON text and apply extraction-side dedup.
///
/// Accepts either a bare array of analyses or an object with a
/// `components` array.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if the text is not a valid
/// analysis document.
pub fn parse_analyses(json: &str) -> Result<Vec<ComponentAnalysis>, serde_json::Error> {
    let file: AnalysisFile = serde_json::from_str(json)?;
    let mut analyses = match file {
        AnalysisFile::Bare(list) | AnalysisFile::Wrapped { components: list } => list,
    };

    let removed: usize = analyses
        .iter_mut()
        .map(ComponentAnalysis::dedup_dependencies)
        .sum();
    if removed > 0 {
        debug!(removed, "dropped repeated dependency mentions");
    }

    Ok(analyses)
}

/// Load analyses from a JSON file on disk.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be read and
/// [`InputError::Parse`] if it is not a valid analysis document.
#[instrument]
pub fn load_analyses(path: &Path) -> Result<Vec<ComponentAnalysis>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let analyses = parse_analyses(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(count = analyses.len(), "loaded component analyses");
    Ok(analyses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_kind_fall_back_to_identifier() {
        let analysis = ComponentAnalysis::new("page:AccountView");
        assert_eq!(analysis.resolved_name(), "AccountView");
        assert_eq!(analysis.resolved_kind(), NodeKind::Page);

        let declared = ComponentAnalysis::new("acme:thing")
            .with_name("Thing")
            .with_kind(NodeKind::Page);
        assert_eq!(declared.resolved_name(), "Thing");
        assert_eq!(declared.resolved_kind(), NodeKind::Page);
    }

    #[test]
    fn dedup_keeps_one_mention_per_target_and_kind() {
        let mut analysis = ComponentAnalysis::new("c:card")
            .with_dependency(RawDependency::new("c:icon", DependencyKind::ComponentReference).at_line(3))
            .with_dependency(RawDependency::new("c:icon", DependencyKind::ComponentReference).at_line(9))
            .depends_on("c:icon", DependencyKind::Event)
            .depends_on(" c:icon ", DependencyKind::Event);

        let removed = analysis.dedup_dependencies();

        assert_eq!(removed, 2);
        assert_eq!(analysis.dependencies.len(), 2);
        assert_eq!(analysis.dependencies[0].line, Some(3), "first occurrence wins");
        assert_eq!(analysis.dependencies[1].kind, DependencyKind::Event);
    }

    #[test]
    fn dedup_compares_normalized_targets() {
        let json = r#"[{"id": "c:a", "dependencies": [
            {"target": "card", "kind": "component-reference"},
            {"target": "c:card", "kind": "component-reference"},
            {"target": "card", "kind": "event"}
        ]}]"#;
        let analyses = parse_analyses(json).expect("parse");
        let deps = &analyses[0].dependencies;
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].target, "card");
        assert_eq!(deps[1].kind, DependencyKind::Event);
    }

    #[test]
    fn normalized_id_prefixes_bare_identifiers() {
        assert_eq!(ComponentAnalysis::new("card").normalized_id().as_deref(), Some("c:card"));
        assert_eq!(
            ComponentAnalysis::new("Home")
                .with_kind(NodeKind::Page)
                .normalized_id()
                .as_deref(),
            Some("page:Home")
        );
        assert_eq!(
            ComponentAnalysis::new(" acme:widget ").normalized_id().as_deref(),
            Some("acme:widget")
        );
        assert_eq!(ComponentAnalysis::new("  ").normalized_id(), None);
    }

    #[test]
    fn parses_bare_array() {
        let json = r#"[
            {"id": "c:card", "kind": "component", "path": "aura/card/card.cmp",
             "dependencies": [{"target": "c:icon", "kind": "component-reference", "line": 4}]}
        ]"#;
        let analyses = parse_analyses(json).expect("parse");
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].dependencies[0].line, Some(4));
        assert_eq!(analyses[0].kind, Some(NodeKind::Component));
    }

    #[test]
    fn parses_wrapped_object_and_dedups() {
        let json = r#"{"components": [
            {"id": "c:card", "dependencies": [
                {"target": "c:icon", "kind": "event"},
                {"target": "c:icon", "kind": "event"}
            ]}
        ]}"#;
        let analyses = parse_analyses(json).expect("parse");
        assert_eq!(analyses[0].dependencies.len(), 1);
    }

    #[test]
    fn unknown_dependency_tag_survives_parsing() {
        let json = r#"[{"id": "c:card", "dependencies": [{"target": "c:x", "kind": "hologram"}]}]"#;
        let analyses = parse_analyses(json).expect("parse");
        assert_eq!(analyses[0].dependencies[0].kind, DependencyKind::Unrecognized);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_analyses(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").expect("write");
        let err = load_analyses(&path).unwrap_err();
        assert!(matches!(err, InputError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
