use crate::error::{Result, ToolingError};
use crate::maven::VersionComparator;
use crate::maven::version::Version;
use crate::pom::document::{NodeId, PomDocument};
use crate::repository::VersionOracle;
use tracing::{debug, info};

pub const PROJECT_GROUP_ID_PLACEHOLDER: &str = "${project.groupId}";
pub const PROJECT_VERSION_PLACEHOLDER: &str = "${project.version}";

/// View over a `parent` or `dependency` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    version_node: NodeId,
}

impl DependencyDeclaration {
    /// Reads the coordinates of `element`. Every declaration is expected to
    /// carry `groupId`, `artifactId` and `version`.
    pub fn read(doc: &PomDocument, element: NodeId) -> Result<Self> {
        let (_, group_id) = required_text(doc, element, "groupId")?;
        let (_, artifact_id) = required_text(doc, element, "artifactId")?;
        let (version_node, version) = required_text(doc, element, "version")?;

        Ok(Self {
            group_id,
            artifact_id,
            version,
            version_node,
        })
    }

    /// Whether the declaration points at an organizational artifact with a
    /// pinned version. Self-references through `${project.version}` never are.
    pub fn is_manageable(&self, managed_group_id: &str) -> bool {
        let managed_group =
            self.group_id == managed_group_id || self.group_id == PROJECT_GROUP_ID_PLACEHOLDER;
        managed_group && self.version != PROJECT_VERSION_PLACEHOLDER
    }

    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

fn required_text(doc: &PomDocument, element: NodeId, name: &str) -> Result<(NodeId, String)> {
    let node = doc
        .find_child(element, name)
        .ok_or_else(|| ToolingError::MissingElement(name.to_string()))?;

    match doc.text(node) {
        Some(text) if !text.trim().is_empty() => Ok((node, text.trim().to_string())),
        _ => Err(ToolingError::MissingElementText(name.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUpdate {
    pub group_id: String,
    pub artifact_id: String,
    pub old_version: String,
    pub new_version: String,
}

/// Walks a POM, bumping organizational dependencies to their latest release.
pub struct DependencyScanner<'a> {
    oracle: &'a dyn VersionOracle,
    managed_group_id: &'a str,
}

impl<'a> DependencyScanner<'a> {
    pub fn new(oracle: &'a dyn VersionOracle, managed_group_id: &'a str) -> Self {
        Self {
            oracle,
            managed_group_id,
        }
    }

    /// Returns true iff at least one version text was rewritten.
    pub fn scan_and_update(&self, doc: &mut PomDocument) -> Result<bool> {
        Ok(!self.scan(doc)?.is_empty())
    }

    /// Updates the root `parent` and every `dependency` element, wherever it
    /// lives under the project, and reports what was changed.
    pub fn scan(&self, doc: &mut PomDocument) -> Result<Vec<AppliedUpdate>> {
        let root = doc.root();
        let parent = doc
            .find_child(root, "parent")
            .ok_or_else(|| ToolingError::MissingRequiredElement("parent".to_string()))?;

        let mut declarations = vec![parent];
        declarations.extend(doc.find_descendants(root, "dependency"));

        let mut applied = Vec::new();
        for element in declarations {
            if let Some(update) = self.update_declaration(doc, element)? {
                applied.push(update);
            }
        }

        Ok(applied)
    }

    fn update_declaration(
        &self,
        doc: &mut PomDocument,
        element: NodeId,
    ) -> Result<Option<AppliedUpdate>> {
        let declaration = DependencyDeclaration::read(doc, element)?;
        let section = doc
            .parent(element)
            .and_then(|p| doc.name(p))
            .unwrap_or("project");

        if !declaration.is_manageable(self.managed_group_id) {
            debug!(
                coordinate = %declaration.coordinate(),
                section,
                "Skipping unmanaged declaration"
            );
            return Ok(None);
        }

        let latest = self.oracle.fetch_latest_version(&declaration.artifact_id)?;
        if latest.is_empty() {
            return Ok(None);
        }
        for version in [&declaration.version, &latest] {
            if !Version::parse(version).is_known() {
                return Err(ToolingError::InvalidVersion {
                    coordinate: declaration.coordinate(),
                    version: version.clone(),
                });
            }
        }

        if !VersionComparator::is_newer(&latest, &declaration.version) {
            debug!(
                coordinate = %declaration.coordinate(),
                current = %declaration.version,
                %latest,
                "Already on the latest version"
            );
            return Ok(None);
        }

        doc.set_text(declaration.version_node, &latest);
        let update = AppliedUpdate {
            group_id: declaration.group_id,
            artifact_id: declaration.artifact_id,
            old_version: declaration.version,
            new_version: latest,
        };
        info!(
            "Updating {}:{} from {} to {}",
            update.group_id, update.artifact_id, update.old_version, update.new_version
        );

        Ok(Some(update))
    }
}
