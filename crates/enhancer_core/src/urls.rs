use url::Url;

/// Resolves `reference` against `base`. Relative references stay as written when there is
/// no usable base; the fetcher reports those as invalid.
pub(crate) fn resolve(base: Option<&str>, reference: &str) -> String {
    let trimmed = reference.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return url.into();
    }
    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(trimmed).ok())
        .map(Into::into)
        .unwrap_or_else(|| trimmed.to_string())
}

/// Replaces the query of `target` with the urlencoded `pairs`.
pub(crate) fn with_query(target: &str, pairs: &[(String, String)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();
    match Url::parse(target) {
        Ok(mut url) => {
            url.set_query(if query.is_empty() { None } else { Some(&query) });
            url.into()
        }
        Err(_) => {
            let path = target.split('?').next().unwrap_or(target);
            if query.is_empty() {
                path.to_string()
            } else {
                format!("{path}?{query}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, with_query};

    #[test]
    fn resolves_relative_against_base() {
        assert_eq!(
            resolve(Some("https://example.com/a/page.html"), "frag.html"),
            "https://example.com/a/frag.html"
        );
        assert_eq!(resolve(None, " /frag.html "), "/frag.html");
        assert_eq!(
            resolve(None, "https://cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn query_replaces_existing_one() {
        let pairs = vec![("q".to_string(), "rust lang".to_string())];
        assert_eq!(
            with_query("https://example.com/search?old=1", &pairs),
            "https://example.com/search?q=rust+lang"
        );
        assert_eq!(with_query("/search?old=1", &pairs), "/search?q=rust+lang");
        assert_eq!(with_query("/search", &[]), "/search");
    }
}
