use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{slugify, Service};
use crate::CoreError;

/// How a vendor's free-form service labels are compared with a service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceMatchMode {
    /// A label matches when, lowercased, it contains the first word of the
    /// lowercased service name. `"Dead Cattle Removal"` therefore matches any
    /// label containing `"dead"`.
    #[default]
    FirstToken,
    /// A label matches when it equals the service name ignoring case, or
    /// when its slug equals the service slug.
    Exact,
}

impl ServiceMatchMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceMatchMode::FirstToken => "first-token",
            ServiceMatchMode::Exact => "exact",
        }
    }

    /// Whether any of `labels` matches a catalog service.
    #[must_use]
    pub fn matches_service(self, labels: &[String], service: &Service) -> bool {
        match self {
            ServiceMatchMode::FirstToken => first_token_match(labels, service.display_name),
            ServiceMatchMode::Exact => labels.iter().any(|label| {
                label.trim().eq_ignore_ascii_case(service.display_name)
                    || slugify(label) == service.slug
            }),
        }
    }

    /// Whether any of `labels` matches a free-text service term.
    #[must_use]
    pub fn matches_term(self, labels: &[String], term: &str) -> bool {
        match self {
            ServiceMatchMode::FirstToken => first_token_match(labels, term),
            ServiceMatchMode::Exact => {
                let term = term.trim();
                let term_slug = slugify(term);
                labels.iter().any(|label| {
                    label.trim().eq_ignore_ascii_case(term) || slugify(label) == term_slug
                })
            }
        }
    }
}

/// A blank name has no first token and matches nothing.
fn first_token_match(labels: &[String], name: &str) -> bool {
    let lowered = name.to_lowercase();
    let Some(token) = lowered.split_whitespace().next() else {
        return false;
    };
    labels
        .iter()
        .any(|label| label.to_lowercase().contains(token))
}

impl std::fmt::Display for ServiceMatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceMatchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-token" | "first_token" | "loose" => Ok(ServiceMatchMode::FirstToken),
            "exact" | "strict" => Ok(ServiceMatchMode::Exact),
            _ => Err(CoreError::InvalidServiceMatchMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATTLE: Service = Service {
        slug: "dead-cattle-removal",
        display_name: "Dead Cattle Removal",
    };
    const FARM: Service = Service {
        slug: "farm-cleanup-services",
        display_name: "Farm Cleanup Services",
    };

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn first_token_overmatches_on_shared_first_word() {
        let horse_only = labels(&["Dead Horse Removal"]);
        assert!(ServiceMatchMode::FirstToken.matches_service(&horse_only, &CATTLE));
        assert!(!ServiceMatchMode::Exact.matches_service(&horse_only, &CATTLE));
    }

    #[test]
    fn first_token_is_a_substring_match() {
        let labels = labels(&["Large farmstead cleanup"]);
        assert!(ServiceMatchMode::FirstToken.matches_service(&labels, &FARM));
    }

    #[test]
    fn exact_accepts_display_name_or_slug_form() {
        let mode = ServiceMatchMode::Exact;
        assert!(mode.matches_service(&labels(&["dead cattle removal"]), &CATTLE));
        assert!(mode.matches_service(&labels(&["Dead  Cattle   Removal"]), &CATTLE));
        assert!(!mode.matches_service(&labels(&["Cattle Removal"]), &CATTLE));
    }

    #[test]
    fn empty_labels_never_match() {
        for mode in [ServiceMatchMode::FirstToken, ServiceMatchMode::Exact] {
            assert!(!mode.matches_service(&[], &CATTLE));
            assert!(!mode.matches_term(&[], "horse"));
        }
    }

    #[test]
    fn free_text_terms_follow_the_same_policy() {
        let labels = labels(&["Horse Hauling"]);
        assert!(ServiceMatchMode::FirstToken.matches_term(&labels, "HORSE removal"));
        assert!(!ServiceMatchMode::Exact.matches_term(&labels, "horse removal"));
        assert!(ServiceMatchMode::Exact.matches_term(&labels, " horse hauling "));
    }

    #[test]
    fn first_token_skips_leading_whitespace() {
        let cattle_only = labels(&["Cattle Hauling"]);
        let mode = ServiceMatchMode::FirstToken;
        assert!(!mode.matches_term(&cattle_only, " horse"));
        assert!(!mode.matches_term(&cattle_only, "\thorse removal"));
        assert!(mode.matches_term(&cattle_only, "  cattle\tremoval "));
        assert!(!mode.matches_term(&cattle_only, "   "));
    }

    #[test]
    fn parses_from_config_values() {
        assert_eq!(
            "first-token".parse::<ServiceMatchMode>().unwrap(),
            ServiceMatchMode::FirstToken
        );
        assert_eq!("EXACT".parse::<ServiceMatchMode>().unwrap(), ServiceMatchMode::Exact);
        assert!("fuzzy".parse::<ServiceMatchMode>().is_err());
    }
}
