//! Property-based tests for descriptor ownership and prefix stripping.

use proptest::prelude::*;

use davit_core::DescriptorMarkers;

fn markers() -> DescriptorMarkers {
    DescriptorMarkers::new("cadence", "cad").unwrap()
}

proptest! {
    /// Ownership holds exactly when the identifier carries the registered
    /// prefix or suffix, over arbitrary identifier text.
    #[test]
    fn prop_owns_iff_marked(id in any::<String>()) {
        let m = markers();
        let expected = id.starts_with("cadence:") || id.ends_with(".cad");
        prop_assert_eq!(m.owns(&id), expected);
    }

    /// Bases free of marker characters never match, and become owned once
    /// either marker is attached.
    #[test]
    fn prop_attaching_markers_grants_ownership(base in "[a-z0-9_/]{1,24}") {
        // The base alphabet has no `:` or `.`, so neither marker can occur.
        let m = markers();
        let prefixed = format!("cadence:{base}");
        let suffixed = format!("{base}.cad");
        prop_assert!(!m.owns(&base));
        prop_assert!(m.owns(&prefixed));
        prop_assert!(m.owns(&suffixed));
    }

    /// Stripping removes the prefix exactly once.
    #[test]
    fn prop_strip_removes_prefix_once(base in "[a-z0-9_/.]{0,24}") {
        let m = markers();
        let tagged = format!("cadence:{base}");
        prop_assert_eq!(m.strip_prefix(&tagged), base.as_str());
    }

    /// Stripping twice is a no-op when the prefix does not recur.
    #[test]
    fn prop_strip_is_idempotent_without_recurring_prefix(base in "[a-z0-9_/.]{0,24}") {
        let m = markers();
        prop_assume!(!base.starts_with("cadence:"));

        let tagged = format!("cadence:{base}");
        let once = m.strip_prefix(&tagged);
        prop_assert_eq!(m.strip_prefix(once), once);
    }

    /// Identifiers without the prefix pass through stripping unchanged.
    #[test]
    fn prop_strip_without_prefix_is_identity(id in any::<String>()) {
        let m = markers();
        prop_assume!(!id.starts_with("cadence:"));
        prop_assert_eq!(m.strip_prefix(&id), id.as_str());
    }
}
