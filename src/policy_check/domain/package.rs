use crate::shared::Result;

/// Maximum length for package names (npm registry limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 256;

/// NewType wrapper for an npm package name with validation
///
/// Accepts plain names (`left-pad`) and scoped names (`@types/node`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        let bare = match name.strip_prefix('@') {
            Some(scoped) => {
                let (scope, rest) = scoped.split_once('/').ok_or_else(|| {
                    anyhow::anyhow!("Scoped package name '{}' is missing the '/' separator", name)
                })?;
                if scope.is_empty() || rest.is_empty() {
                    anyhow::bail!("Scoped package name '{}' has an empty segment", name);
                }
                if !Self::valid_segment(scope) {
                    anyhow::bail!(
                        "Package scope contains invalid characters. Only alphanumeric, hyphens, underscores, dots, and tildes are allowed."
                    );
                }
                rest
            }
            None => name.as_str(),
        };

        // Security: the unscoped part must be a single path segment
        if bare.starts_with('.') || !Self::valid_segment(bare) {
            anyhow::bail!(
                "Package name contains invalid characters. Only alphanumeric, hyphens, underscores, dots, and tildes are allowed."
            );
        }

        Ok(Self(name))
    }

    fn valid_segment(segment: &str) -> bool {
        segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a resolved package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if !version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            anyhow::bail!(
                "Package version contains invalid characters. Only alphanumeric, dots, hyphens, and plus are allowed."
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One installed package extracted from the lockfile
///
/// Identified by `name@version`; the install path is the first location the
/// lockfile listed it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: PackageName,
    version: Version,
    install_path: String,
    declared_license: Option<String>,
}

impl Dependency {
    pub fn new(
        name: String,
        version: String,
        install_path: String,
        declared_license: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            install_path,
            declared_license,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn install_path(&self) -> &str {
        &self.install_path
    }

    pub fn declared_license(&self) -> Option<&str> {
        self.declared_license.as_deref()
    }

    /// `name@version`
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}
