use std::collections::HashSet;

pub struct NameSimilarityChecker;

impl NameSimilarityChecker {
    /// True when every present name is the same after lower-casing.
    /// With no names at all there is nothing to agree on, so the check fails.
    pub fn all_agree(names: &[Option<&str>]) -> bool {
        let distinct: HashSet<String> = names
            .iter()
            .flatten()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_lowercase())
            .collect();

        distinct.len() == 1
    }
}
