use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn last_page_regex() -> &'static Regex {
    static LAST_PAGE: OnceLock<Regex> = OnceLock::new();
    LAST_PAGE.get_or_init(|| Regex::new(r#"page=(\d+)>; *rel="last""#).expect("valid regex"))
}

/// Extracts the page number of the `rel="last"` entry of a `Link` header.
///
/// A missing header, a header without a `last` relation, or a page number
/// that does not fit in a `u32` all yield `0`, meaning "no further pages".
pub fn parse_last_page(link_header: Option<&str>) -> u32 {
    let Some(header) = link_header else {
        return 0;
    };

    let last_page = last_page_regex()
        .captures(header)
        .and_then(|captures| captures.get(1))
        .and_then(|page| page.as_str().parse::<u32>().ok());

    match last_page {
        Some(page) => page,
        None => {
            debug!("Link header carries no usable last page: {}", header);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_link_header() {
        let header = r#"<https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=34>; rel="last""#;
        assert_eq!(parse_last_page(Some(header)), 34);
    }

    #[test]
    fn test_search_link_header_with_query_before_page() {
        let header = r#"<https://api.github.com/search/issues?q=repo%3Aacme%2Fwidgets+is%3Aopen&page=2>; rel="next", <https://api.github.com/search/issues?q=repo%3Aacme%2Fwidgets+is%3Aopen&page=7>; rel="last""#;
        assert_eq!(parse_last_page(Some(header)), 7);
    }

    #[test]
    fn test_missing_header_means_no_more_pages() {
        assert_eq!(parse_last_page(None), 0);
    }

    #[test]
    fn test_header_without_last_relation() {
        let header = r#"<https://api.github.com/repositories/1/commits?page=1>; rel="prev", <https://api.github.com/repositories/1/commits?page=1>; rel="first""#;
        assert_eq!(parse_last_page(Some(header)), 0);
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(parse_last_page(Some("garbage")), 0);
        assert_eq!(
            parse_last_page(Some(r#"<x?page=99999999999>; rel="last""#)),
            0
        );
    }
}
