//! List options forwarded to Atlas as query parameters

use url::form_urlencoded;

/// Pagination and filtering options accepted by every list endpoint
///
/// Unset fields are never sent, so `ListOptions::default()` adds nothing
/// to the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page_num: Option<u32>,
    pub items_per_page: Option<u32>,
    pub include_count: Option<bool>,
    /// Ask Atlas to wrap the response in a `{status, content}` envelope
    pub envelope: Option<bool>,
    pub pretty: Option<bool>,
    pub include_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
}

impl ListOptions {
    pub fn page(page_num: u32, items_per_page: u32) -> Self {
        Self {
            page_num: Some(page_num),
            items_per_page: Some(items_per_page),
            ..Default::default()
        }
    }

    /// Query pairs in the order they are appended to a path
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(page) = self.page_num {
            pairs.push(("pageNum", page.to_string()));
        }
        if let Some(items) = self.items_per_page {
            pairs.push(("itemsPerPage", items.to_string()));
        }
        if let Some(include_count) = self.include_count {
            pairs.push(("includeCount", include_count.to_string()));
        }
        if let Some(envelope) = self.envelope {
            pairs.push(("envelope", envelope.to_string()));
        }
        if let Some(pretty) = self.pretty {
            pairs.push(("pretty", pretty.to_string()));
        }
        if !self.include_fields.is_empty() {
            pairs.push(("includeFields", self.include_fields.join(",")));
        }
        if !self.exclude_fields.is_empty() {
            pairs.push(("excludeFields", self.exclude_fields.join(",")));
        }

        pairs
    }
}

/// Append `options` to `path` as query parameters
///
/// Existing query pairs keep their position; a key set again by the options
/// replaces the old value in place, new keys are appended.
pub fn set_list_options(path: &str, options: Option<&ListOptions>) -> String {
    let Some(options) = options else {
        return path.to_string();
    };

    let pairs = options.query_pairs();
    if pairs.is_empty() {
        return path.to_string();
    }

    let (base, query) = match path.split_once('?') {
        Some((base, query)) => (base, query),
        None => (path, ""),
    };

    let mut merged: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    for (key, value) in pairs {
        match merged.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = value,
            None => merged.push((key.to_string(), value)),
        }
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(merged)
        .finish();

    format!("{}?{}", base, encoded)
}
