use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted by the roster, copied onto the account at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Qualifier,
    TeamLead,
}

impl AccountRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Qualifier => "qualifier",
            TeamLead => "team_lead",
        }
    }

    /// Label shown to users
    #[inline]
    pub const fn label(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Qualifier => "Calificador Tributario",
            TeamLead => "Jefe De Equipo",
        }
    }

    /// Landing route after a successful login
    #[inline]
    pub const fn home_path(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Qualifier => "/qualifier",
            TeamLead => "/team-lead",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use AccountRole::*;
        match code {
            "qualifier" => Some(Qualifier),
            "team_lead" => Some(TeamLead),
            _ => None,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for role in [AccountRole::Qualifier, AccountRole::TeamLead] {
            assert_eq!(AccountRole::from_code(role.code()), Some(role));
        }
        assert_eq!(AccountRole::from_code("admin"), None);
    }

    #[test]
    fn test_serde_matches_code() {
        assert_eq!(
            serde_json::to_string(&AccountRole::TeamLead).unwrap(),
            "\"team_lead\""
        );
        assert_eq!(AccountRole::TeamLead.home_path(), "/team-lead");
        assert_eq!(AccountRole::Qualifier.label(), "Calificador Tributario");
    }
}
