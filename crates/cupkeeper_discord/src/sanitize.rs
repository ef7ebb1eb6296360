//! Normalization of user-supplied tokens.
//!
//! Map names, side tokens and channel-name fragments all pass through here
//! before they reach the draft engine, so `!ban D-17`, `!ban d17` and a
//! captain with a fancy Unicode team name all land on the same canonical
//! form.

/// Fold common accented latin characters to their ascii base.
pub fn translit_input(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            'ñ' => 'n',
            'ç' => 'c',
            'ß' => 's',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ñ' => 'N',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Lowercase and strip everything but `[a-z0-9_-]`.
pub fn sanitize_input(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// A channel-name-safe fragment: transliterate, sanitize, and make sure
/// something survives.
pub fn channel_fragment(input: &str) -> String {
    let fragment = sanitize_input(&translit_input(input));
    if fragment.is_empty() {
        "team".to_string()
    } else {
        fragment
    }
}

/// Canonical comparison key for a map or side token: alphanumerics only, so
/// `d17` and `D-17` collide on purpose.
pub fn token_key(input: &str) -> String {
    translit_input(input)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Resolve a user-typed token against the configured map names.
///
/// Returns the canonical configured name so the draft engine compares exact
/// strings; unresolvable tokens stay as typed and the engine refuses them.
pub fn resolve_map_token<'a>(maps: &'a [String], token: &str) -> Option<&'a str> {
    let key = token_key(token);
    maps.iter()
        .find(|m| token_key(m) == key)
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitize_strips_markdown_and_spaces() {
        assert_eq!(sanitize_input("D-17 **ruins**"), "d-17ruins");
        assert_eq!(sanitize_input("Team Spaces"), "teamspaces");
    }

    #[test]
    fn translit_folds_accents() {
        assert_eq!(translit_input("Équipe Française"), "Equipe Francaise");
    }

    #[test]
    fn channel_fragment_never_empty() {
        assert_eq!(channel_fragment("💀💀💀"), "team");
        assert_eq!(channel_fragment("Crème Brûlée"), "cremebrulee");
    }

    #[test]
    fn map_tokens_resolve_to_canonical_names() {
        let maps = vec!["D-17".to_string(), "Pyramid".to_string()];
        assert_eq!(resolve_map_token(&maps, "d17"), Some("D-17"));
        assert_eq!(resolve_map_token(&maps, "PYRAMID"), Some("Pyramid"));
        assert_eq!(resolve_map_token(&maps, "yard"), None);
    }
}
