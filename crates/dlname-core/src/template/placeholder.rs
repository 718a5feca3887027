//! Placeholder syntax: `{domain}`, `{title}`, `{date}`, `{year}`, `{ext}`, `{original_name}`.

use super::TokenSet;

/// A recognized template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Domain,
    Title,
    Date,
    Year,
    Ext,
    OriginalName,
}

impl Placeholder {
    pub const ALL: [Placeholder; 6] = [
        Placeholder::Domain,
        Placeholder::Title,
        Placeholder::Date,
        Placeholder::Year,
        Placeholder::Ext,
        Placeholder::OriginalName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Domain => "domain",
            Placeholder::Title => "title",
            Placeholder::Date => "date",
            Placeholder::Year => "year",
            Placeholder::Ext => "ext",
            Placeholder::OriginalName => "original_name",
        }
    }

    /// Canonical `{name}` form.
    pub fn tag(self) -> String {
        format!("{{{}}}", self.name())
    }

    /// Pre-version-2 `%name%` form.
    pub fn legacy_tag(self) -> String {
        format!("%{}%", self.name())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Substitutes every recognized placeholder in a single left-to-right pass.
///
/// Token values are never rescanned, so a value that happens to contain
/// `{title}` is emitted literally. Unrecognized `{...}` text is kept as is.
pub(super) fn apply_pattern(pattern: &str, tokens: &TokenSet) -> String {
    let mut out = String::with_capacity(pattern.len() + 64);
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let placeholder = tail[1..]
            .split_once('}')
            .and_then(|(name, _)| Placeholder::from_name(name));
        match placeholder {
            Some(p) => {
                out.push_str(tokens.get(p));
                rest = &tail[p.name().len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// `{...}` groups in `pattern` that are not recognized placeholders.
pub fn unknown_placeholders(pattern: &str) -> Vec<String> {
    let mut unknown = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let tail = &rest[open + 1..];
        match tail.split_once('}') {
            Some((name, after)) if !name.contains('{') => {
                if Placeholder::from_name(name).is_none() {
                    unknown.push(format!("{{{name}}}"));
                }
                rest = after;
            }
            Some(_) => rest = tail,
            None => break,
        }
    }

    unknown
}

/// True when `pattern` uses any `%name%` placeholder.
pub fn is_legacy_pattern(pattern: &str) -> bool {
    Placeholder::ALL
        .into_iter()
        .any(|p| pattern.contains(&p.legacy_tag()))
}

/// Rewrites `%name%` placeholders to `{name}`.
pub fn migrate_legacy_pattern(pattern: &str) -> String {
    Placeholder::ALL
        .into_iter()
        .fold(pattern.to_string(), |acc, p| acc.replace(&p.legacy_tag(), &p.tag()))
}
