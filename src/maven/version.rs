use std::cmp::Ordering;

pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Maven version with the trailing `-SNAPSHOT` marker already stripped.
#[derive(Debug, Clone)]
pub struct Version {
    pub parsed: VersionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionType {
    Semantic(semver::Version),
    Numeric(Vec<u64>),
    Unknown(String),
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let normalized = strip_snapshot(version.trim());
        let parsed = if let Ok(v) = semver::Version::parse(normalized) {
            VersionType::Semantic(v)
        } else if let Some(numeric) = Self::parse_numeric(normalized) {
            VersionType::Numeric(numeric)
        } else {
            VersionType::Unknown(normalized.to_string())
        };

        Version { parsed }
    }

    fn parse_numeric(version: &str) -> Option<Vec<u64>> {
        let mut numbers = Vec::new();

        for part in version.split('.') {
            numbers.push(part.parse::<u64>().ok()?);
        }

        if numbers.is_empty() {
            None
        } else {
            Some(numbers)
        }
    }

    /// Whether the version could be understood as a release number at all.
    pub fn is_known(&self) -> bool {
        !matches!(self.parsed, VersionType::Unknown(_))
    }

    fn release_segments(&self) -> Option<Vec<u64>> {
        match &self.parsed {
            VersionType::Semantic(v) => Some(vec![v.major, v.minor, v.patch]),
            VersionType::Numeric(parts) => Some(parts.clone()),
            VersionType::Unknown(_) => None,
        }
    }

    fn is_pre_release(&self) -> bool {
        matches!(&self.parsed, VersionType::Semantic(v) if !v.pre.is_empty())
    }
}

/// Removes a single trailing `-SNAPSHOT` marker, if present.
pub fn strip_snapshot(version: &str) -> &str {
    version.strip_suffix(SNAPSHOT_SUFFIX).unwrap_or(version)
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (VersionType::Semantic(a), VersionType::Semantic(b)) => a.cmp(b),
            (VersionType::Unknown(a), VersionType::Unknown(b)) => a.cmp(b),
            (VersionType::Unknown(_), _) => Ordering::Less,
            (_, VersionType::Unknown(_)) => Ordering::Greater,
            _ => {
                let (Some(a), Some(b)) = (self.release_segments(), other.release_segments()) else {
                    return Ordering::Equal;
                };
                compare_segments(&a, &b).then_with(|| {
                    // 1.0.0-rc.1 sorts below the plain 1.0 release
                    other.is_pre_release().cmp(&self.is_pre_release())
                })
            }
        }
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Check if version `a` is newer than version `b`
    pub fn is_newer(a: &str, b: &str) -> bool {
        Version::parse(a) > Version::parse(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v1 = Version::parse("3.28.0");
        let v2 = Version::parse("3.100.0");
        assert!(v2 > v1);
        assert!(matches!(v1.parsed, VersionType::Semantic(_)));
    }

    #[test]
    fn snapshot_marker_is_ignored() {
        assert!(VersionComparator::is_newer("4.11.12", "4.11.1-SNAPSHOT"));
        assert!(!VersionComparator::is_newer("4.11.0-SNAPSHOT", "4.11.1-SNAPSHOT"));
        assert_eq!(Version::parse("1.2.3-SNAPSHOT"), Version::parse("1.2.3"));
    }

    #[test]
    fn numeric_and_semantic_versions_compare() {
        assert!(VersionComparator::is_newer("3.147", "3.146.0"));
        assert!(VersionComparator::is_newer("100", "99.9.9"));
        assert_eq!(Version::parse("3.146"), Version::parse("3.146.0"));
        assert!(VersionComparator::is_newer("1.0.0.1", "1.0.0"));
    }

    #[test]
    fn pre_release_sorts_below_release() {
        assert!(VersionComparator::is_newer("2.0.0", "2.0.0-rc.1"));
        assert!(VersionComparator::is_newer("2.0", "2.0.0-rc.1"));
    }

    #[test]
    fn unknown_versions_are_flagged() {
        assert!(!Version::parse("not-a-version").is_known());
        assert!(!Version::parse("").is_known());
        assert!(Version::parse("4.11.1-SNAPSHOT").is_known());
        assert!(!Version::parse("${revision}").is_known());
    }
}
