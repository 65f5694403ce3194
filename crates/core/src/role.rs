//! Role policy for overlay authoring
//!
//! Participant roles of the conference portal collapse to two capabilities:
//! authors may place, edit and delete comments, everyone else only views them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability of the current viewer over the annotation overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Can only read comments
    #[default]
    ViewerOnly,
    /// Can create, edit and delete comments
    AuthorCapable,
}

impl Role {
    /// Map a participant tag from the hosting page to a role.
    ///
    /// Reviewers and coordinators author comments, students read them.
    /// Anything unrecognized is viewer-only.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "avaliador" | "reviewer" | "coordenador" | "coordinator" | "author-capable" => {
                Role::AuthorCapable
            }
            _ => Role::ViewerOnly,
        }
    }

    pub fn can_author(self) -> bool {
        can_author(self)
    }
}

/// Whether `role` may enter placement mode, edit or delete.
pub fn can_author(role: Role) -> bool {
    matches!(role, Role::AuthorCapable)
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from_tag(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ViewerOnly => write!(f, "viewer-only"),
            Role::AuthorCapable => write!(f, "author-capable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_tags() {
        assert_eq!(Role::from_tag("avaliador"), Role::AuthorCapable);
        assert_eq!(Role::from_tag("coordenador"), Role::AuthorCapable);
        assert_eq!(Role::from_tag("aluno"), Role::ViewerOnly);
        assert_eq!(Role::from_tag(" Reviewer "), Role::AuthorCapable);
    }

    #[test]
    fn test_unknown_tags_fail_closed() {
        assert_eq!(Role::from_tag(""), Role::ViewerOnly);
        assert_eq!(Role::from_tag("admin"), Role::ViewerOnly);
        assert!(!can_author(Role::from_tag("root")));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for role in [Role::ViewerOnly, Role::AuthorCapable] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_can_author() {
        assert!(can_author(Role::AuthorCapable));
        assert!(!can_author(Role::ViewerOnly));
        assert_eq!(Role::default(), Role::ViewerOnly);
    }
}
