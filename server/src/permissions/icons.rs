//! Icon lookup for navigation tabs.

use designos_common::IconName;
use serde::Serialize;

/// Renderable icon reference handed to the navigation UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconRef {
    /// Symbolic name.
    pub name: IconName,
    /// Asset path inside the dashboard's icon sprite.
    pub asset: &'static str,
}

/// Resolve a symbolic icon name. Unknown names resolve to
/// [`IconName::DEFAULT`]; this never fails.
#[must_use]
pub fn get_icon(name: &str) -> IconRef {
    let icon = IconName::parse(name);
    if icon == IconName::DEFAULT && !name.trim().eq_ignore_ascii_case(IconName::DEFAULT.as_str()) {
        tracing::debug!(name, "Unknown icon name, using default");
    }
    icon_ref(icon)
}

/// Reference for an already-parsed icon name.
#[must_use]
pub const fn icon_ref(name: IconName) -> IconRef {
    let asset = match name {
        IconName::LayoutDashboard => "/icons/sprite.svg#layout-dashboard",
        IconName::Package => "/icons/sprite.svg#package",
        IconName::FileText => "/icons/sprite.svg#file-text",
        IconName::Link => "/icons/sprite.svg#link",
        IconName::Bot => "/icons/sprite.svg#bot",
        IconName::Users => "/icons/sprite.svg#users",
        IconName::Settings => "/icons/sprite.svg#settings",
        IconName::Circle => "/icons/sprite.svg#circle",
    };
    IconRef { name, asset }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_icon() {
        let icon = get_icon("bot");
        assert_eq!(icon.name, IconName::Bot);
        assert!(icon.asset.ends_with("#bot"));
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        assert_eq!(get_icon("sparkles"), icon_ref(IconName::DEFAULT));
    }

    #[test]
    fn test_every_asset_names_its_icon() {
        for name in IconName::all() {
            let icon = icon_ref(*name);
            assert!(icon.asset.ends_with(name.as_str()));
        }
    }
}
