use crate::error::{Result, ToolingError};
use crate::maven::VersionComparator;
use crate::pom::document::{NodeId, PomDocument};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Sets the project version of every POM in a working copy.
pub struct PomVersionSetter;

impl PomVersionSetter {
    pub fn update_pom_versions(&self, repo_root: &Path, new_version: &str) -> Result<()> {
        info!(
            "Updating pom.xml files under {} to version {}",
            repo_root.display(),
            new_version
        );

        for pom_path in Self::find_poms(repo_root) {
            Self::update_pom_version(&pom_path, new_version)?;
        }
        Ok(())
    }

    /// The root `pom.xml` plus every `*pom.xml` one directory below it.
    /// Deeper files such as test fixtures are left alone.
    fn find_poms(repo_root: &Path) -> Vec<PathBuf> {
        let mut poms = BTreeSet::new();
        let root_pom = repo_root.join("pom.xml");

        for entry in WalkDir::new(repo_root)
            .max_depth(2)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| e.ok())
        {
            let is_pom = entry.depth() == 2
                && entry.file_type().is_file()
                && entry.file_name().to_string_lossy().ends_with("pom.xml");
            if is_pom {
                poms.insert(entry.into_path());
            }
        }

        let mut ordered = vec![root_pom];
        ordered.extend(poms);
        ordered
    }

    fn update_pom_version(pom_path: &Path, new_version: &str) -> Result<()> {
        let mut doc = PomDocument::parse(pom_path)?;
        let version_node = Self::version_element(&doc).ok_or_else(|| {
            ToolingError::InvalidPomVersion(format!(
                "Could not locate a version element in {} - cannot update",
                pom_path.display()
            ))
        })?;

        let current = doc.text(version_node).unwrap_or_default();
        if !VersionComparator::is_newer(new_version, current.trim()) {
            return Err(ToolingError::InvalidPomVersion(format!(
                "New POM version of {new_version} must be > {} - cannot update",
                current.trim()
            )));
        }

        doc.set_text(version_node, new_version);
        doc.write(pom_path)?;
        info!("Updated {}", pom_path.display());
        Ok(())
    }

    /// `project/version`, or `project/parent/version` for modules that inherit it.
    fn version_element(doc: &PomDocument) -> Option<NodeId> {
        let root = doc.root();
        doc.find_child(root, "version").or_else(|| {
            doc.find_child(root, "parent")
                .and_then(|parent| doc.find_child(parent, "version"))
        })
    }
}
