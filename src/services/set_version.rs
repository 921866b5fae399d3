use crate::error::Result;
use crate::pom::PomVersionSetter;
use crate::scm::SourceRepository;
use std::sync::Arc;
use tracing::info;

/// Sets the project version across every POM of a repository and pushes the
/// change straight to the checked-out branch.
pub struct SetVersionService {
    source: Arc<dyn SourceRepository>,
    setter: PomVersionSetter,
}

impl SetVersionService {
    pub fn new(source: Arc<dyn SourceRepository>) -> Self {
        Self {
            source,
            setter: PomVersionSetter,
        }
    }

    pub fn set_version(
        &self,
        repository_name: &str,
        new_version: &str,
        jira_number: &str,
        branch: &str,
    ) -> Result<()> {
        let workspace = tempfile::tempdir()?;
        let repo = self
            .source
            .clone_checkout(repository_name, workspace.path(), branch)?;

        self.setter.update_pom_versions(&repo.path, new_version)?;
        self.source.commit(
            &repo,
            jira_number,
            &format!("updating pom version to {new_version}"),
        )?;
        self.source.push(&repo, repository_name)?;

        info!(repository_name, new_version, branch, "POM version pushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolingError;
    use crate::pom::scanner::tests::pom;
    use crate::services::fakes::FakeSourceRepository;

    const MODULE_POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <parent>
        <groupId>com.rbs.digital.mobile</groupId>
        <artifactId>mobile-image</artifactId>
        <version>4.11.1-SNAPSHOT</version>
    </parent>
    <artifactId>mobile-image-acceptance</artifactId>
</project>"#;

    #[test]
    fn commits_and_pushes_new_version() {
        let source = Arc::new(
            FakeSourceRepository::with_pom(&pom("")).with_file("acceptance/pom.xml", MODULE_POM),
        );

        SetVersionService::new(source.clone())
            .set_version("mobile-image", "4.12.0", "MPLAT-12345", "develop")
            .unwrap();

        assert_eq!(
            source.calls(),
            vec![
                "clone_checkout mobile-image develop",
                "commit MPLAT-12345: updating pom version to 4.12.0",
                "push mobile-image",
            ]
        );
        let committed = source.committed_pom().unwrap();
        assert!(committed.contains("<version>4.12.0</version>"));
        assert!(committed.contains("<version>3.146.0</version>"));
    }

    #[test]
    fn older_version_is_never_committed() {
        let source = Arc::new(FakeSourceRepository::with_pom(&pom("")));

        let err = SetVersionService::new(source.clone())
            .set_version("mobile-image", "4.11.0", "MPLAT-12345", "develop")
            .unwrap_err();

        assert!(matches!(err, ToolingError::InvalidPomVersion(_)));
        assert_eq!(err.http_status(), 500);
        assert_eq!(source.calls(), vec!["clone_checkout mobile-image develop"]);
    }
}
