//! Pick the best published version of a step for a [`VersionConstraint`].
//!
//! | Lock type     | Candidates                     | Winner                 |
//! |---------------|--------------------------------|------------------------|
//! | `Fixed`       | the exact key `X.Y.Z`          | that key               |
//! | `MinorLocked` | same major and minor           | highest patch          |
//! | `MajorLocked` | same major                     | highest `minor.patch`  |
//! | `Latest`      | the group's latest marker      | that key               |
//!
//! Version keys that are not plain `X.Y.Z` are skipped. Distinct valid keys
//! always parse to distinct versions, so the winner never depends on the
//! iteration order of the version map.

use stepman_core::spec::{Step, StepGroup};

use crate::version::{ConstraintError, LockType, Semver, VersionConstraint};

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct StepVersionMatch<'a> {
    /// The winning key of the group's version map.
    pub version: String,
    pub step: &'a Step,
    /// The group's latest marker, passed through unchanged.
    pub latest_version: String,
}

/// Resolve `constraint` against one step's published versions.
///
/// Returns `None` when nothing satisfies the constraint.
pub fn resolve<'a>(
    constraint: &VersionConstraint,
    group: &'a StepGroup,
) -> Option<StepVersionMatch<'a>> {
    let pinned = constraint.version();
    match constraint.lock_type() {
        LockType::Fixed => exact(group, &pinned.to_string()),
        LockType::Latest => {
            if group.latest_version_number.is_empty() {
                return None;
            }
            exact(group, &group.latest_version_number)
        }
        LockType::MinorLocked => highest(group, |v| {
            v.major() == pinned.major() && v.minor() == pinned.minor()
        }),
        LockType::MajorLocked => highest(group, |v| v.major() == pinned.major()),
    }
}

/// Parse `input` and resolve it in one step.
pub fn resolve_str<'a>(
    input: &str,
    group: &'a StepGroup,
) -> Result<Option<StepVersionMatch<'a>>, ConstraintError> {
    let constraint = VersionConstraint::parse(input)?;
    Ok(resolve(&constraint, group))
}

/// All well-formed versions of a group, ascending.
pub fn sorted_versions(group: &StepGroup) -> Vec<Semver> {
    let mut versions: Vec<Semver> = candidates(group).map(|(v, _, _)| v).collect();
    versions.sort();
    versions
}

fn exact<'a>(group: &'a StepGroup, key: &str) -> Option<StepVersionMatch<'a>> {
    group.versions.get(key).map(|step| StepVersionMatch {
        version: key.to_string(),
        step,
        latest_version: group.latest_version_number.clone(),
    })
}

fn highest<'a>(
    group: &'a StepGroup,
    accepts: impl Fn(&Semver) -> bool,
) -> Option<StepVersionMatch<'a>> {
    let mut best: Option<(Semver, &'a String, &'a Step)> = None;
    for (version, key, step) in candidates(group) {
        if !accepts(&version) {
            continue;
        }
        if best.as_ref().map_or(true, |(current, _, _)| version > *current) {
            best = Some((version, key, step));
        }
    }
    best.map(|(_, key, step)| StepVersionMatch {
        version: key.clone(),
        step,
        latest_version: group.latest_version_number.clone(),
    })
}

fn candidates(group: &StepGroup) -> impl Iterator<Item = (Semver, &String, &Step)> {
    group
        .versions
        .iter()
        .filter_map(|(key, step)| match key.parse::<Semver>() {
            Ok(version) => Some((version, key, step)),
            Err(e) => {
                tracing::warn!("Skipping version `{key}`: {e}");
                None
            }
        })
}
