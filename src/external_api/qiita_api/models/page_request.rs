use reqwest::Url;

/// Query parameters of one page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u32,
    pub sort: String,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u32, sort: &str) -> Self {
        Self {
            page,
            per_page,
            sort: sort.to_string(),
        }
    }

    /// Replaces the query of `url` with `page`, `per_page` and `sort`
    pub fn apply(&self, url: &mut Url) {
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &self.page.to_string())
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("sort", &self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2, "count", "https://qiita.com/api/v2/tags?page=1&per_page=2&sort=count")]
    #[case(17, 100, "name", "https://qiita.com/api/v2/tags?page=17&per_page=100&sort=name")]
    fn test_apply(
        #[case] page: u64,
        #[case] per_page: u32,
        #[case] sort: &str,
        #[case] exp_url: &str,
    ) {
        let mut url = Url::parse("https://qiita.com/api/v2/tags").unwrap();
        PageRequest::new(page, per_page, sort).apply(&mut url);
        assert_eq!(url.as_str(), exp_url);
    }

    #[test]
    fn test_apply_replaces_existing_query() {
        let mut url = Url::parse("https://qiita.com/api/v2/tags?page=9&token=x").unwrap();
        PageRequest::new(1, 2, "count").apply(&mut url);
        assert_eq!(url.query(), Some("page=1&per_page=2&sort=count"));
    }
}
