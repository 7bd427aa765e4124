use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{ClauseGroup, CoreItemId, PrerequisiteClause};

/// Collapse clause rows into one alternative set per clause group.
pub fn group_clauses(clauses: &[PrerequisiteClause]) -> BTreeMap<ClauseGroup, BTreeSet<CoreItemId>> {
    let mut grouped: BTreeMap<ClauseGroup, BTreeSet<CoreItemId>> = BTreeMap::new();
    for clause in clauses {
        grouped
            .entry(clause.group)
            .or_default()
            .extend(clause.members.iter().copied());
    }
    grouped
}

/// AND over clause groups of OR over each group's members.
///
/// An empty clause list never unlocks. Members that name no known core item
/// simply never match.
pub fn is_satisfied(clauses: &[PrerequisiteClause], selected: &BTreeSet<CoreItemId>) -> bool {
    let grouped = group_clauses(clauses);
    if grouped.is_empty() {
        return false;
    }
    grouped
        .values()
        .all(|members| members.iter().any(|id| selected.contains(id)))
}

/// Clause groups that currently have no selected member.
pub fn unmet_groups(
    clauses: &[PrerequisiteClause],
    selected: &BTreeSet<CoreItemId>,
) -> Vec<ClauseGroup> {
    group_clauses(clauses)
        .into_iter()
        .filter(|(_, members)| members.is_disjoint(selected))
        .map(|(group, _)| group)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::fixtures::clause;

    fn ids(raw: &[i64]) -> BTreeSet<CoreItemId> {
        raw.iter().copied().map(CoreItemId).collect()
    }

    #[test]
    fn and_of_ors() {
        // G1 = {a, b}, G2 = {c}
        let clauses = vec![clause(1, &[1, 2]), clause(2, &[3])];
        assert!(is_satisfied(&clauses, &ids(&[1, 3])));
        assert!(is_satisfied(&clauses, &ids(&[2, 3])));
        assert!(!is_satisfied(&clauses, &ids(&[1, 2])));
        assert!(!is_satisfied(&clauses, &ids(&[3])));
        assert!(!is_satisfied(&clauses, &ids(&[])));
    }

    #[test]
    fn empty_clause_list_never_unlocks() {
        assert!(!is_satisfied(&[], &ids(&[1, 2, 3])));
    }

    #[test]
    fn rows_sharing_a_group_are_alternatives() {
        let clauses = vec![clause(5, &[1]), clause(5, &[2])];
        assert!(is_satisfied(&clauses, &ids(&[2])));
    }

    #[test]
    fn unknown_members_fail_closed() {
        let clauses = vec![clause(1, &[404])];
        assert!(!is_satisfied(&clauses, &ids(&[1, 2, 3])));
        assert_eq!(unmet_groups(&clauses, &ids(&[1])), vec![ClauseGroup(1)]);
    }

    #[test]
    fn inputs_are_untouched() {
        let clauses = vec![clause(1, &[1]), clause(2, &[2])];
        let selected = ids(&[1]);
        let _ = is_satisfied(&clauses, &selected);
        assert_eq!(selected, ids(&[1]));
        assert_eq!(clauses.len(), 2);
    }
}
