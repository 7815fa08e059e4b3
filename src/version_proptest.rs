//! Property-based tests for the best-match rule and tag parsing.
//!
//! These tests use proptest to generate random version sets and verify that
//! the compatibility invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::version::{best_match, parse_tag, releases_from_tags};
    use proptest::prelude::*;
    use semver::Version;

    fn version_strategy() -> impl Strategy<Value = Version> {
        (0u64..5, 0u64..5, 0u64..5).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
    }

    // ============================================================================
    // best_match property tests
    // ============================================================================

    proptest! {
        /// Property: best_match never crosses into another major line
        #[test]
        fn best_match_keeps_major(
            required in version_strategy(),
            available in prop::collection::vec(version_strategy(), 0..20),
        ) {
            if let Some(chosen) = best_match(&required, &available) {
                prop_assert_eq!(chosen.major, required.major);
            }
        }

        /// Property: best_match never returns a version below the minimum
        #[test]
        fn best_match_respects_minimum(
            required in version_strategy(),
            available in prop::collection::vec(version_strategy(), 0..20),
        ) {
            if let Some(chosen) = best_match(&required, &available) {
                prop_assert!(chosen >= &required);
            }
        }

        /// Property: no compatible candidate is greater than the chosen one
        #[test]
        fn best_match_is_greatest_compatible(
            required in version_strategy(),
            available in prop::collection::vec(version_strategy(), 0..20),
        ) {
            match best_match(&required, &available) {
                Some(chosen) => {
                    for candidate in &available {
                        if candidate.major == required.major && candidate >= &required {
                            prop_assert!(candidate <= chosen);
                        }
                    }
                }
                None => {
                    for candidate in &available {
                        prop_assert!(candidate.major != required.major || candidate < &required);
                    }
                }
            }
        }

        /// Property: best_match does not depend on candidate order
        #[test]
        fn best_match_is_order_independent(
            required in version_strategy(),
            available in prop::collection::vec(version_strategy(), 0..20),
        ) {
            let mut reversed = available.clone();
            reversed.reverse();
            prop_assert_eq!(
                best_match(&required, &available),
                best_match(&required, &reversed)
            );
        }
    }

    // ============================================================================
    // tag parsing property tests
    // ============================================================================

    proptest! {
        /// Property: a printed version parses back with or without a `v` prefix
        #[test]
        fn parse_tag_accepts_printed_versions(version in version_strategy()) {
            prop_assert_eq!(parse_tag(&version.to_string()), Some(version.clone()));
            prop_assert_eq!(parse_tag(&format!("v{}", version)), Some(version));
        }

        /// Property: releases_from_tags only ever keeps parseable tags
        #[test]
        fn releases_from_tags_only_keeps_semver(tags in prop::collection::vec("[v0-9a-z.]{0,8}", 0..20)) {
            let releases = releases_from_tags(&tags);
            for (version, release) in &releases {
                let parsed = parse_tag(&release.tag);
                prop_assert_eq!(parsed.as_ref(), Some(version));
            }
        }
    }
}
