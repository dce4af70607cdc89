//! Suggestions for templates that reference missing secrets

/// Maximum Levenshtein distance for a "did you mean" hint
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Filters registered on the environment
pub const AVAILABLE_FILTERS: &[&str] = &["b64encode", "b64decode", "quote", "indent", "nindent"];

/// Secret names referenced as `secrets.name`, `secrets["name"]` or `secrets['name']`
pub fn referenced_secrets(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = source;

    while let Some(pos) = rest.find("secrets") {
        let after = &rest[pos + "secrets".len()..];
        let preceded_by_ident = rest[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');

        if !preceded_by_ident {
            if let Some(name) = parse_reference(after) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        rest = after;
    }

    names
}

fn parse_reference(after: &str) -> Option<String> {
    if let Some(attr) = after.strip_prefix('.') {
        let name: String = attr
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        return (!name.is_empty()).then_some(name);
    }

    let inner = after.strip_prefix('[')?.trim_start();
    let quote = inner.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &inner[1..];
    let end = inner.find(quote)?;
    Some(inner[..end].to_string())
}

/// Closest known name for a misspelled one
pub fn closest_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, strsim::levenshtein(input, c)))
        .filter(|(_, d)| *d > 0 && *d <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Build a help line for secrets the template needs but the map lacks
pub fn suggest_missing_secrets(source: &str, available: &[&str]) -> Option<String> {
    let missing: Vec<String> = referenced_secrets(source)
        .into_iter()
        .filter(|name| !available.contains(&name.as_str()))
        .collect();

    if missing.is_empty() {
        return None;
    }

    let described: Vec<String> = missing
        .iter()
        .map(|name| match closest_match(name, available) {
            Some(close) => format!("`{}` (did you mean `{}`?)", name, close),
            None => format!("`{}`", name),
        })
        .collect();

    let available_list = if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    };

    Some(format!(
        "Missing secret file(s): {}. Available secrets: {}",
        described.join(", "),
        available_list
    ))
}
