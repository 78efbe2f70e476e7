use crate::policy_check::domain::{
    Dependency, Policy, RegistryRecord, VersionMeta, Warning, WarningKind, LIFECYCLE_SCRIPTS,
};
use crate::policy_check::services::age::{format_elapsed, format_threshold};
use crate::shared::error::RegistryError;
use chrono::{DateTime, Utc};

/// Cache key used for license warnings when the package declares no license
pub const NO_LICENSE_KEY: &str = "no license";

/// Warnings and failures of one dependency's evaluation
///
/// A rule that cannot run records its error; the other rules still report.
#[derive(Debug, Default)]
pub struct Evaluation {
    pub warnings: Vec<Warning>,
    pub errors: Vec<RegistryError>,
}

impl Evaluation {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// PolicyEvaluator - applies the policy rules to one dependency
///
/// Pure: the caller supplies registry data (`None` when the record could not
/// be fetched), the download count (`None` when the count could not be
/// determined) and the evaluation time.
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Evaluates every enabled rule family and returns the union of their warnings
    ///
    /// Script and license rules need the version's registry entry and the age
    /// rule needs its publish time; a missing or invalid entry is recorded in
    /// `errors` without discarding the warnings of the remaining rules.
    pub fn evaluate(
        dependency: &Dependency,
        policy: &Policy,
        record: Option<&RegistryRecord>,
        weekly_downloads: Option<u64>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        if let Some(record) = record {
            match record.version_meta(dependency.name(), dependency.version()) {
                Ok(meta) => {
                    evaluation
                        .warnings
                        .extend(Self::script_warnings(dependency, meta));
                    evaluation
                        .warnings
                        .extend(Self::license_warning(dependency, policy, meta));
                }
                Err(e) => evaluation.errors.push(e),
            }

            match Self::age_warning(dependency, policy, record, now) {
                Ok(warning) => evaluation.warnings.extend(warning),
                Err(e) => evaluation.errors.push(e),
            }
        }

        evaluation
            .warnings
            .extend(Self::popularity_warning(dependency, policy, weekly_downloads));

        evaluation
    }

    /// One warning per install-time script; the body is part of the identity
    fn script_warnings(dependency: &Dependency, meta: &VersionMeta) -> Vec<Warning> {
        LIFECYCLE_SCRIPTS
            .iter()
            .filter_map(|script| {
                let body = meta.scripts.get(*script)?;
                Some(Warning::new(
                    dependency.name().to_string(),
                    WarningKind::Script,
                    format!("{} runs \"{}\" on install: {}", dependency.id(), script, body),
                    format!("{}: {}", script, body),
                ))
            })
            .collect()
    }

    fn license_warning(
        dependency: &Dependency,
        policy: &Policy,
        meta: &VersionMeta,
    ) -> Option<Warning> {
        if !policy.checks_licenses() {
            return None;
        }

        let license = meta
            .license
            .as_deref()
            .or_else(|| dependency.declared_license())
            .map(str::trim)
            .filter(|l| !l.is_empty());

        match license {
            None => Some(Warning::new(
                dependency.name().to_string(),
                WarningKind::License,
                format!("{} does not declare a license", dependency.id()),
                NO_LICENSE_KEY.to_string(),
            )),
            Some(license) if policy.licenses.contains(license) => None,
            Some(license) => Some(Warning::new(
                dependency.name().to_string(),
                WarningKind::License,
                format!(
                    "{} is licensed under \"{}\", which is not in the allowed list",
                    dependency.id(),
                    license
                ),
                license.to_string(),
            )),
        }
    }

    /// The cache key is the version: once approved, a young version stays
    /// approved even though its age keeps changing
    fn age_warning(
        dependency: &Dependency,
        policy: &Policy,
        record: &RegistryRecord,
        now: DateTime<Utc>,
    ) -> Result<Option<Warning>, RegistryError> {
        if !policy.checks_age() {
            return Ok(None);
        }

        let published = record.published_at(dependency.name(), dependency.version())?;
        let elapsed = now.signed_duration_since(published);
        if elapsed >= policy.min_package_age {
            return Ok(None);
        }

        Ok(Some(Warning::new(
            dependency.name().to_string(),
            WarningKind::MinPackageAge,
            format!(
                "{} was published {} (minimum age: {})",
                dependency.id(),
                format_elapsed(elapsed),
                format_threshold(policy.min_package_age)
            ),
            dependency.version().to_string(),
        )))
    }

    /// The cache key is the threshold, not the measured count
    fn popularity_warning(
        dependency: &Dependency,
        policy: &Policy,
        weekly_downloads: Option<u64>,
    ) -> Option<Warning> {
        if !policy.checks_popularity() {
            return None;
        }

        let downloads = weekly_downloads?;
        if downloads >= policy.min_weekly_downloads {
            return None;
        }

        Some(Warning::new(
            dependency.name().to_string(),
            WarningKind::MinWeeklyDownloads,
            format!(
                "{} has {} weekly downloads (minimum: {})",
                dependency.name(),
                downloads,
                policy.min_weekly_downloads
            ),
            format!("minWeeklyDownloads={}", policy.min_weekly_downloads),
        ))
    }
}
