use serde::Deserialize;

/// Query for `GET /services/{service}/authorize`.
///
/// `capabilities` is comma-separated; blanks are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeQuery {
    #[serde(default)]
    pub capabilities: Option<String>,
}

impl AuthorizeQuery {
    pub fn capabilities(&self) -> Vec<&str> {
        self.capabilities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_drops_blanks() {
        let q = AuthorizeQuery {
            capabilities: Some("read, write,,".to_string()),
        };

        assert_eq!(q.capabilities(), vec!["read", "write"]);
    }

    #[test]
    fn absent_means_none_required() {
        assert!(AuthorizeQuery::default().capabilities().is_empty());
    }
}
