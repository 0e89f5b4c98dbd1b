use garde::Validate;
use kisahloka_dal::PageRequest;
use serde::Deserialize;

/// List query. Unparsable or non-positive numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[garde(allow_unvalidated)]
pub struct Paging {
    page: Option<String>,
    #[serde(rename = "pageSize", alias = "page_size")]
    page_size: Option<String>,
    #[garde(length(max = 255))]
    keyword: Option<String>,
}

pub(crate) fn lenient_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

impl Paging {
    pub fn into_request(self, default_page_size: u64) -> PageRequest {
        let page = lenient_number(self.page.as_deref()).unwrap_or(1);
        let page_size = lenient_number(self.page_size.as_deref())
            .filter(|size| *size >= 1)
            .unwrap_or(default_page_size as i64);
        PageRequest::new(page, page_size).with_keyword(self.keyword)
    }
}
