use std::path::Path;

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use unic_langid::LanguageIdentifier;

const FALLBACK_LANG: &str = "en";
const SUPPORTED_LANGS: &[&str] = &["en", "de"];

/// Fluent-based UI strings.
pub struct I18n {
    bundle: FluentBundle<FluentResource>,
}

impl I18n {
    /// Load `<lang>.ftl` from the resources directory for the system language.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let wanted = pick_language(sys_locale::get_locale().as_deref());

        for lang in [wanted, FALLBACK_LANG] {
            if let Some(i18n) = Self::try_load(dir, lang) {
                tracing::debug!(lang, "translations loaded");
                return i18n;
            }
        }

        tracing::warn!(dir = %dir.display(), "no translations found, showing message ids");
        Self::empty()
    }

    fn empty() -> Self {
        let langid: LanguageIdentifier = FALLBACK_LANG
            .parse()
            .unwrap_or_else(|_| LanguageIdentifier::default());
        Self {
            bundle: FluentBundle::new(vec![langid]),
        }
    }

    fn try_load(dir: &Path, lang: &str) -> Option<Self> {
        let path = dir.join(format!("{lang}.ftl"));
        let source = std::fs::read_to_string(&path).ok()?;
        Self::from_source(lang, source)
    }

    /// Build a bundle from FTL text. Syntax errors are logged; the valid entries are kept.
    fn from_source(lang: &str, source: String) -> Option<Self> {
        let resource = FluentResource::try_new(source).unwrap_or_else(
            |(partial, errors): (FluentResource, Vec<fluent_syntax::parser::ParserError>)| {
                for e in &errors {
                    tracing::warn!(lang, error = ?e, "ftl syntax error");
                }
                partial
            },
        );
        let langid: LanguageIdentifier = lang.parse().ok()?;
        let mut bundle = FluentBundle::new(vec![langid]);
        // Unicode isolation marks would show up around arguments in GTK labels.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).ok()?;
        Some(Self { bundle })
    }

    /// Translated message, or the id itself if missing.
    pub fn t(&self, id: &str) -> String {
        self.format(id, None)
    }

    pub fn t_args(&self, id: &str, args: &FluentArgs) -> String {
        self.format(id, Some(args))
    }

    #[cfg(test)]
    pub fn has(&self, id: &str) -> bool {
        self.bundle.has_message(id)
    }

    fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|m| m.value()) else {
            return id.to_string();
        };
        let mut errors = vec![];
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(id, ?errors, "message formatted with errors");
        }
        text.into_owned()
    }
}

/// Map a system locale such as `de_DE.UTF-8` to a supported language code.
fn pick_language(locale: Option<&str>) -> &'static str {
    let locale = locale.unwrap_or(FALLBACK_LANG).to_lowercase();
    SUPPORTED_LANGS
        .iter()
        .copied()
        .find(|lang| locale.starts_with(lang))
        .unwrap_or(FALLBACK_LANG)
}
