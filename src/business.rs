// 🏢 Business Context - Which business the classifiers work for
// A user can belong to several businesses plus their own personal space.
// The active context is selected once and threaded into entry points
// explicitly instead of being re-derived per screen.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the memberships map the backend returns, keyed by
/// business id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default)]
    pub business_name: String,

    /// The user's own personal space, not a trading business.
    #[serde(default)]
    pub personal: bool,
}

/// The resolved active business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessContext {
    pub business_id: String,
    pub business_name: String,
}

/// Picks the active business: the first non-personal membership in key
/// order. Key order makes the choice stable across calls; `None` means the
/// user only has a personal space.
pub fn select_active_business(
    memberships: &BTreeMap<String, Membership>,
) -> Option<BusinessContext> {
    memberships
        .iter()
        .find(|(_, m)| !m.personal)
        .map(|(id, m)| BusinessContext {
            business_id: id.clone(),
            business_name: m.business_name.clone(),
        })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(name: &str, personal: bool) -> Membership {
        Membership {
            business_name: name.to_string(),
            personal,
        }
    }

    #[test]
    fn test_skips_personal_memberships() {
        let mut memberships = BTreeMap::new();
        memberships.insert("biz_a".to_string(), membership("Personal", true));
        memberships.insert("biz_b".to_string(), membership("Corner Bakery", false));

        let context = select_active_business(&memberships).unwrap();
        assert_eq!(context.business_id, "biz_b");
        assert_eq!(context.business_name, "Corner Bakery");
    }

    #[test]
    fn test_selection_is_stable_in_key_order() {
        let mut memberships = BTreeMap::new();
        memberships.insert("biz_z".to_string(), membership("Second", false));
        memberships.insert("biz_a".to_string(), membership("First", false));

        let context = select_active_business(&memberships).unwrap();
        assert_eq!(context.business_id, "biz_a");
    }

    #[test]
    fn test_personal_only_yields_none() {
        let mut memberships = BTreeMap::new();
        memberships.insert("biz_a".to_string(), membership("Personal", true));

        assert!(select_active_business(&memberships).is_none());
        assert!(select_active_business(&BTreeMap::new()).is_none());
    }
}
