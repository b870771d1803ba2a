use url::Url;

/// Query parameters grouped by name
///
/// Names keep their first-seen order and each maps to the ordered sequence
/// of its values. Parameters with blank values are dropped, so `?a=&b=1`
/// groups to just `b -> ["1"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Groups the (percent-decoded) query pairs of a URL
    pub fn from_url(url: &Url) -> Self {
        let mut grouped = Self::default();
        for (name, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            grouped.push(&name, &value);
        }
        grouped
    }

    fn push(&mut self, name: &str, value: &str) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .params
                .push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// Number of distinct parameter names
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(n, _)| n.as_str())
    }

    /// Values recorded for a parameter name
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// First parameter whose value list repeats a value
    pub fn first_repeated_value(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(_, values)| {
                values
                    .iter()
                    .enumerate()
                    .any(|(i, v)| values[..i].contains(v))
            })
            .map(|(n, _)| n.as_str())
    }
}
