//! Compliance with the canonical identifier scheme.

use std::collections::HashSet;

/// Flag each candidate that exactly equals a canonical identifier.
///
/// The result has one entry per candidate. Null candidates never comply;
/// null canonical entries are ignored.
pub fn is_compliant(candidates: &[Option<String>], canonical: &[Option<String>]) -> Vec<bool> {
    let canonical: HashSet<&str> = canonical.iter().flatten().map(String::as_str).collect();
    candidates
        .iter()
        .map(|c| c.as_deref().is_some_and(|c| canonical.contains(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_exact_membership() {
        let canonical = ids(&[Some("ENSG1"), Some("ENSG2")]);
        let candidates = ids(&[Some("ENSG2"), Some("ensg1"), Some("TP53"), Some("ENSG1")]);
        assert_eq!(is_compliant(&candidates, &canonical), vec![true, false, false, true]);
    }

    #[test]
    fn test_null_never_complies() {
        let canonical = ids(&[Some("ENSG1"), None]);
        let candidates = ids(&[None, Some("ENSG1")]);
        assert_eq!(is_compliant(&candidates, &canonical), vec![false, true]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(is_compliant(&[], &ids(&[Some("ENSG1")])).is_empty());
        assert_eq!(is_compliant(&ids(&[Some("ENSG1")]), &[]), vec![false]);
    }

    #[test]
    fn test_matches_membership_for_every_position() {
        let canonical = ids(&[Some("a"), Some("b"), Some("c")]);
        let candidates = ids(&[Some("c"), Some("x"), Some("a"), None, Some("b"), Some("b")]);
        let flags = is_compliant(&candidates, &canonical);
        assert_eq!(flags.len(), candidates.len());
        for (flag, candidate) in flags.iter().zip(&candidates) {
            assert_eq!(*flag, candidate.is_some() && canonical.contains(candidate));
        }
    }
}
