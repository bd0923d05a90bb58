//! Command implementations.

pub mod export;
pub mod inspect;
pub mod list;
pub mod save;
pub mod show;
pub mod source;

pub use self::export::execute_export;
pub use self::inspect::execute_inspect;
pub use self::list::execute_list;
pub use self::save::execute_save;
pub use self::show::execute_show;
pub use self::source::execute_source;

use crate::error::Result;
use confprov_config::{ExperimentConfig, LoaderSettings};
use confprov_domain::{ProvenanceEntry, ProvenanceIndex};
use std::path::Path;
use tracing::debug;

/// Load an experiment directory with provenance tracking on.
pub fn load_tracked(dir: &Path, settings: &LoaderSettings) -> Result<ExperimentConfig> {
    debug!("Loading experiment configuration from {}", dir.display());
    let mut config = ExperimentConfig::new(dir, settings.clone());
    config.set_track_provenance(true);
    config.reload()?;
    Ok(config)
}

/// Entries of `index` in path order, limited to `prefix` and its children.
pub fn entries_under<'a>(index: &'a ProvenanceIndex, prefix: Option<&str>) -> Vec<(String, &'a ProvenanceEntry)> {
    index
        .iter()
        .filter(|(path, _)| prefix.is_none_or(|prefix| is_under(path, prefix)))
        .map(|(path, entry)| (path.to_string(), entry))
        .collect()
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(confprov_domain::PATH_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matches_whole_segments() {
        let mut index = ProvenanceIndex::new();
        index.record("JOBS.SIM.WALLCLOCK", "/a.yml", None, None);
        index.record("JOBS_EXTRA.X", "/a.yml", None, None);
        index.record("DEFAULT.EXPID", "/a.yml", None, None);

        let paths: Vec<String> = entries_under(&index, Some("JOBS"))
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(paths, vec!["JOBS.SIM.WALLCLOCK"]);
        assert_eq!(entries_under(&index, None).len(), 3);
    }
}
