//! Navigation Icon Names

use serde::{Deserialize, Serialize};

/// Symbolic icon names understood by the dashboard's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconName {
    LayoutDashboard,
    Package,
    FileText,
    Link,
    Bot,
    Users,
    Settings,
    /// Neutral placeholder used when a name is not recognized.
    Circle,
}

impl IconName {
    /// Icon used for unrecognized names.
    pub const DEFAULT: Self = Self::Circle;

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::LayoutDashboard,
            Self::Package,
            Self::FileText,
            Self::Link,
            Self::Bot,
            Self::Users,
            Self::Settings,
            Self::Circle,
        ]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LayoutDashboard => "layout-dashboard",
            Self::Package => "package",
            Self::FileText => "file-text",
            Self::Link => "link",
            Self::Bot => "bot",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Circle => "circle",
        }
    }

    /// Resolve a symbolic name, falling back to [`IconName::DEFAULT`].
    ///
    /// Accepts both the kebab-case form (`layout-dashboard`) and the
    /// `PascalCase` form used by component libraries (`LayoutDashboard`).
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::all()
            .iter()
            .copied()
            .find(|icon| icon.as_str().replace('-', "") == normalized)
            .unwrap_or(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kebab_case() {
        assert_eq!(IconName::parse("layout-dashboard"), IconName::LayoutDashboard);
        assert_eq!(IconName::parse("file-text"), IconName::FileText);
    }

    #[test]
    fn test_parse_pascal_case() {
        assert_eq!(IconName::parse("LayoutDashboard"), IconName::LayoutDashboard);
        assert_eq!(IconName::parse("Bot"), IconName::Bot);
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        assert_eq!(IconName::parse("rocket"), IconName::DEFAULT);
        assert_eq!(IconName::parse(""), IconName::DEFAULT);
    }

    #[test]
    fn test_serialized_form_matches_as_str() {
        for icon in IconName::all() {
            let json = serde_json::to_string(icon).unwrap();
            assert_eq!(json, format!("\"{}\"", icon.as_str()));
        }
    }
}
