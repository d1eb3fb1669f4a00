//! Ordered request parameters and URL template binding.

use crate::error::{Result, TwitterError};

/// Ordered list of request parameters.
///
/// Keys may repeat and insertion order is kept; every pair ends up in the
/// signed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Push a list value the way the API expects it: comma separated.
    pub fn push_list<I, T>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.0.push((key.into(), joined));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove and return the first value stored under `key`.
    pub fn remove_first(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for Params {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Fill `:name` segments of `template` from `params`.
///
/// Each placeholder consumes the first parameter with the same key; the
/// remaining parameters are returned in their original order. A placeholder
/// without a matching parameter is an error.
pub fn bind(template: &str, params: Params) -> Result<(String, Params)> {
    let mut remaining = params;
    let mut segments = Vec::new();

    for segment in template.split('/') {
        match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                let value = remaining
                    .remove_first(name)
                    .ok_or_else(|| TwitterError::MissingRequiredParameter(name.to_string()))?;
                segments.push(urlencoding::encode(&value).into_owned());
            }
            _ => segments.push(segment.to_string()),
        }
    }

    Ok((segments.join("/"), remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn binds_single_placeholder() {
        let (path, rest) = bind("statuses/show/:id", Params::new().with("id", 42)).unwrap();
        assert_eq!(path, "statuses/show/42");
        assert!(rest.is_empty());
    }

    #[test]
    fn binding_resolved_path_is_identity() {
        let (path, rest) = bind("statuses/show/:id", Params::new().with("id", 42)).unwrap();
        let (again, rest_again) = bind(&path, rest.clone()).unwrap();
        assert_eq!(again, path);
        assert_eq!(rest_again, rest);
    }

    #[test]
    fn placeholder_in_middle_of_path() {
        let params = Params::new().with("count", 5).with("id", 7).with("page", 2);
        let (path, rest) = bind("statuses/:id/retweeted_by/ids", params).unwrap();
        assert_eq!(path, "statuses/7/retweeted_by/ids");
        assert_eq!(
            rest.into_vec(),
            vec![
                ("count".to_string(), "5".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn missing_placeholder_fails_fast() {
        let err = bind("statuses/show/:id", Params::new().with("count", 1)).unwrap_err();
        assert!(matches!(err, TwitterError::MissingRequiredParameter(ref n) if n == "id"));
    }

    #[test]
    fn only_first_duplicate_is_consumed() {
        let params = Params::new().with("id", 1).with("id", 2);
        let (path, rest) = bind("statuses/show/:id", params).unwrap();
        assert_eq!(path, "statuses/show/1");
        assert_eq!(rest.get("id"), Some("2"));
    }

    #[test]
    fn substituted_value_is_escaped() {
        let params = Params::new().with("screen_name", "a b/c");
        let (path, _) = bind("users/profile_image/:screen_name", params).unwrap();
        assert_eq!(path, "users/profile_image/a%20b%2Fc");
    }

    #[test]
    fn push_list_joins_with_commas() {
        let mut params = Params::new();
        params.push_list("user_id", [1u64, 2, 3]);
        assert_eq!(params.get("user_id"), Some("1,2,3"));
    }
}
