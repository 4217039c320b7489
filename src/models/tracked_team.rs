//! Identification of the team whose perspective defines win and loss.

use serde::{Deserialize, Serialize};

use super::TeamResult;

/// What to do when the tracked team cannot be found among a match's teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Assume the first listed team is the tracked one. Can misattribute
    /// results when upstream omits identifying fields.
    #[default]
    FirstTeam,
    /// Leave the match out of every aggregate.
    Exclude,
}

/// The tracked team, located by slug, code or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTeam {
    /// Exact slug, e.g. `flyquest`
    pub slug: Option<String>,

    /// Exact code, e.g. `FLY`
    pub code: Option<String>,

    /// Case-insensitive substring of the display name
    pub name: Option<String>,

    pub fallback: FallbackPolicy,
}

impl TrackedTeam {
    pub fn new(
        slug: Option<String>,
        code: Option<String>,
        name: Option<String>,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            slug: non_empty(slug),
            code: non_empty(code),
            name: non_empty(name),
            fallback,
        }
    }

    /// Use one identifier as slug, code and name substring at once.
    pub fn from_identifier(id: &str) -> Self {
        let id = Some(id.trim().to_string());
        Self::new(id.clone(), id.clone(), id, FallbackPolicy::default())
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Whether any identifier is set.
    pub fn is_identifiable(&self) -> bool {
        self.slug.is_some() || self.code.is_some() || self.name.is_some()
    }

    /// Whether this team matches by any identifier.
    pub fn matches(&self, team: &TeamResult) -> bool {
        self.matches_slug(team) || self.matches_code(team) || self.matches_name(team)
    }

    /// Find the tracked team's index. Slug matches are tried across all
    /// teams first, then codes, then name substrings; if nothing matches
    /// the fallback policy decides.
    pub fn locate(&self, teams: &[TeamResult]) -> Option<usize> {
        teams
            .iter()
            .position(|t| self.matches_slug(t))
            .or_else(|| teams.iter().position(|t| self.matches_code(t)))
            .or_else(|| teams.iter().position(|t| self.matches_name(t)))
            .or_else(|| match self.fallback {
                FallbackPolicy::FirstTeam if !teams.is_empty() => Some(0),
                _ => None,
            })
    }

    fn matches_slug(&self, team: &TeamResult) -> bool {
        matches!((&self.slug, &team.slug), (Some(want), Some(have)) if want == have)
    }

    fn matches_code(&self, team: &TeamResult) -> bool {
        matches!((&self.code, &team.code), (Some(want), Some(have)) if want == have)
    }

    fn matches_name(&self, team: &TeamResult) -> bool {
        match &self.name {
            Some(needle) => team.name.to_lowercase().contains(&needle.to_lowercase()),
            None => false,
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flyquest() -> TrackedTeam {
        TrackedTeam::new(
            Some("flyquest".to_string()),
            Some("FLY".to_string()),
            Some("FlyQuest".to_string()),
            FallbackPolicy::FirstTeam,
        )
    }

    #[test]
    fn test_locate_by_slug() {
        let teams = vec![
            TeamResult::new("Cloud9").with_slug("cloud9"),
            TeamResult::new("Some Sponsor Name").with_slug("flyquest"),
        ];
        assert_eq!(flyquest().locate(&teams), Some(1));
    }

    #[test]
    fn test_locate_by_code() {
        let teams = vec![
            TeamResult::new("Team Liquid").with_code("TL"),
            TeamResult::new("FQ Esports").with_code("FLY"),
        ];
        assert_eq!(flyquest().locate(&teams), Some(1));
    }

    #[test]
    fn test_locate_by_name_substring_case_insensitive() {
        let teams = vec![TeamResult::new("Team Liquid"), TeamResult::new("FLYQUEST")];
        assert_eq!(flyquest().locate(&teams), Some(1));
    }

    #[test]
    fn test_slug_takes_priority_over_name() {
        // First team's name contains the substring, but the second has the slug.
        let teams = vec![
            TeamResult::new("FlyQuest Academy"),
            TeamResult::new("FQ").with_slug("flyquest"),
        ];
        assert_eq!(flyquest().locate(&teams), Some(1));
    }

    #[test]
    fn test_fallback_first_team() {
        let teams = vec![TeamResult::new("Team Liquid"), TeamResult::new("Cloud9")];
        assert_eq!(flyquest().locate(&teams), Some(0));
    }

    #[test]
    fn test_fallback_exclude() {
        let teams = vec![TeamResult::new("Team Liquid"), TeamResult::new("Cloud9")];
        let team = flyquest().with_fallback(FallbackPolicy::Exclude);
        assert_eq!(team.locate(&teams), None);
    }

    #[test]
    fn test_fallback_on_empty_teams() {
        assert_eq!(flyquest().locate(&[]), None);
    }

    #[test]
    fn test_empty_identifiers_match_nothing() {
        let team = TrackedTeam::new(
            Some(" ".to_string()),
            None,
            Some(String::new()),
            FallbackPolicy::Exclude,
        );
        assert!(!team.is_identifiable());
        assert_eq!(team.locate(&[TeamResult::new("Anything")]), None);
    }

    #[test]
    fn test_from_identifier() {
        let team = TrackedTeam::from_identifier("FLY");
        assert!(team.matches(&TeamResult::new("Whoever").with_code("FLY")));
        assert!(team.matches(&TeamResult::new("FlyQuest")));
        assert!(!team.matches(&TeamResult::new("Cloud9").with_code("C9")));
    }

    #[test]
    fn test_fallback_policy_serde() {
        let p: FallbackPolicy = serde_json::from_str("\"exclude\"").unwrap();
        assert_eq!(p, FallbackPolicy::Exclude);
        assert_eq!(
            serde_json::to_string(&FallbackPolicy::FirstTeam).unwrap(),
            "\"first-team\""
        );
    }
}
