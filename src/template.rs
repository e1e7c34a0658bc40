//! Selection of the localization call template by source file type.

use crate::settings::Settings;

/// Template used for file types without a configured template.
pub const FALLBACK_TEMPLATE: &str = "{{ '%s'|trans }}";

/// Placeholder replaced by the unit id.
pub const PLACEHOLDER: &str = "%s";

/// Source file types with a dedicated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Twig,
    Php,
    Js,
    Other,
}

const EXTENSIONS: &[(&str, SourceKind)] = &[
    ("twig", SourceKind::Twig),
    ("php", SourceKind::Php),
    ("js", SourceKind::Js),
];

impl SourceKind {
    /// Resolves the kind from a file extension, without the leading dot.
    pub fn from_extension(extension: Option<&str>) -> Self {
        extension
            .and_then(|ext| EXTENSIONS.iter().find(|(known, _)| *known == ext))
            .map_or(SourceKind::Other, |(_, kind)| *kind)
    }

    /// Resolves the kind from a `/`-separated file path.
    pub fn from_path(path: Option<&str>) -> Self {
        let extension = path
            .map(|p| p.rsplit_once('/').map_or(p, |(_, name)| name))
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext);
        Self::from_extension(extension)
    }

    /// The template configured for this kind.
    pub fn template<'a>(&self, settings: &'a Settings) -> &'a str {
        match self {
            SourceKind::Twig => &settings.twig_template,
            SourceKind::Php => &settings.php_template,
            SourceKind::Js => &settings.js_template,
            SourceKind::Other => FALLBACK_TEMPLATE,
        }
    }
}

/// Substitutes the first `%s` in `template` with `id`. The id is not escaped.
pub fn apply(template: &str, id: &str) -> String {
    template.replacen(PLACEHOLDER, id, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SourceKind::from_extension(Some("twig")), SourceKind::Twig);
        assert_eq!(SourceKind::from_extension(Some("php")), SourceKind::Php);
        assert_eq!(SourceKind::from_extension(Some("js")), SourceKind::Js);
        assert_eq!(SourceKind::from_extension(Some("ts")), SourceKind::Other);
        assert_eq!(SourceKind::from_extension(Some("TWIG")), SourceKind::Other);
        assert_eq!(SourceKind::from_extension(None), SourceKind::Other);
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            SourceKind::from_path(Some("/templates/home.html.twig")),
            SourceKind::Twig
        );
        assert_eq!(SourceKind::from_path(Some("src/app.js")), SourceKind::Js);
        assert_eq!(SourceKind::from_path(Some("/a.b/README")), SourceKind::Other);
        assert_eq!(SourceKind::from_path(None), SourceKind::Other);
    }

    #[test]
    fn test_default_templates() {
        let settings = Settings::default();
        assert_eq!(SourceKind::Twig.template(&settings), "{{ '%s'|trans }}");
        assert_eq!(SourceKind::Php.template(&settings), "__('%s')");
        assert_eq!(SourceKind::Js.template(&settings), "t('%s')");
        assert_eq!(SourceKind::Other.template(&settings), FALLBACK_TEMPLATE);
    }

    #[test]
    fn test_other_ignores_configured_templates() {
        let settings = Settings {
            twig_template: "{% trans %}%s{% endtrans %}".to_string(),
            ..Settings::default()
        };
        assert_eq!(SourceKind::Other.template(&settings), FALLBACK_TEMPLATE);
        assert_eq!(
            SourceKind::Twig.template(&settings),
            "{% trans %}%s{% endtrans %}"
        );
    }

    #[test]
    fn test_apply_substitutes_once() {
        assert_eq!(apply("__('%s')", "home.hi"), "__('home.hi')");
        assert_eq!(apply("%s / %s", "a"), "a / %s");
        assert_eq!(apply("no placeholder", "a"), "no placeholder");
    }

    #[test]
    fn test_apply_does_not_escape() {
        assert_eq!(apply("t('%s')", "it's"), "t('it's')");
    }
}
