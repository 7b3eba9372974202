//! Embed Configuration
//!
//! The script tag is the entire wire contract between a host page and the
//! widget: `data-slug` (required), `data-position`, `data-theme`. The
//! service origin is derived from the `src` the script was loaded from.

use crate::widget::host::HostEnv;

/// Launcher corner on the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    BottomLeft,
    BottomRight,
}

impl Position {
    fn parse(value: Option<&str>) -> Position {
        match value {
            Some("bottom-left") => Position::BottomLeft,
            _ => Position::BottomRight,
        }
    }
}

/// Theme hint forwarded to the content frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    fn parse(value: Option<&str>) -> Theme {
        match value {
            Some("light") => Theme::Light,
            Some("dark") => Theme::Dark,
            _ => Theme::System,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// Configuration read from the invoking script tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    pub slug: String,
    pub position: Position,
    pub theme: Theme,
    pub origin: String,
}

impl EmbedConfig {
    /// Read the embed configuration from the invoking script tag.
    ///
    /// A missing `data-slug` is a silent no-op: the widget logs a warning
    /// through the host and never surfaces an error to the page.
    pub fn from_script_tag(env: &dyn HostEnv) -> Option<EmbedConfig> {
        let slug = match env.script_attr("data-slug") {
            Some(slug) if !slug.is_empty() => slug,
            _ => {
                env.warn("[Updeck] Missing data-slug attribute on widget script tag.");
                return None;
            }
        };

        let position = Position::parse(env.script_attr("data-position").as_deref());
        let theme = Theme::parse(env.script_attr("data-theme").as_deref());

        let origin = env
            .script_src()
            .map(|src| match src.find("/widget.js") {
                Some(idx) => src[..idx].to_string(),
                None => src,
            })
            .unwrap_or_default();

        Some(EmbedConfig {
            slug,
            position,
            theme,
            origin,
        })
    }

    /// Content frame URL: the remote "what's new" view for this project,
    /// themed to match the embed. Slugs are lowercase alphanumeric with
    /// hyphens (enforced at project creation), so no escaping is needed.
    pub fn frame_url(&self) -> String {
        format!(
            "{}/widget/{}?theme={}",
            self.origin,
            self.slug,
            self.theme.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::host::fake::FakeHost;

    #[test]
    fn reads_full_configuration() {
        let host = FakeHost::with_script(&[
            ("data-slug", "acme"),
            ("data-position", "bottom-left"),
            ("data-theme", "dark"),
            ("src", "https://updeck.example/widget.js?v=2"),
        ]);

        let config = EmbedConfig::from_script_tag(&host).unwrap();
        assert_eq!(config.slug, "acme");
        assert_eq!(config.position, Position::BottomLeft);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.origin, "https://updeck.example");
    }

    #[test]
    fn defaults_apply_when_attributes_absent() {
        let host = FakeHost::with_script(&[
            ("data-slug", "acme"),
            ("src", "https://updeck.example/widget.js"),
        ]);

        let config = EmbedConfig::from_script_tag(&host).unwrap();
        assert_eq!(config.position, Position::BottomRight);
        assert_eq!(config.theme, Theme::System);
    }

    #[test]
    fn unknown_attribute_values_fall_back_to_defaults() {
        let host = FakeHost::with_script(&[
            ("data-slug", "acme"),
            ("data-position", "top-center"),
            ("data-theme", "neon"),
        ]);

        let config = EmbedConfig::from_script_tag(&host).unwrap();
        assert_eq!(config.position, Position::BottomRight);
        assert_eq!(config.theme, Theme::System);
    }

    #[test]
    fn missing_slug_warns_and_aborts() {
        let host = FakeHost::with_script(&[("src", "https://updeck.example/widget.js")]);

        assert!(EmbedConfig::from_script_tag(&host).is_none());
        assert_eq!(host.warnings.borrow().len(), 1);
        assert!(host.warnings.borrow()[0].contains("data-slug"));
    }

    #[test]
    fn frame_url_carries_slug_and_theme() {
        let host = FakeHost::with_script(&[
            ("data-slug", "acme"),
            ("data-theme", "light"),
            ("src", "https://updeck.example/widget.js"),
        ]);

        let config = EmbedConfig::from_script_tag(&host).unwrap();
        assert_eq!(
            config.frame_url(),
            "https://updeck.example/widget/acme?theme=light"
        );
    }
}
