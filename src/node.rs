use crate::error::{CreditReportError, Result};
use std::collections::BTreeMap;

/// Key under which an element's own text is stored when it also carries
/// attributes or child elements.
pub const TEXT_KEY: &str = "_";

/// A parsed document value. Built once per input and discarded after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Scalar(String),
    Node(BTreeMap<String, RawNode>),
    List(Vec<RawNode>),
}

impl RawNode {
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::Scalar(text.into())
    }

    pub fn child(&self, key: &str) -> Option<&RawNode> {
        match self {
            RawNode::Node(map) => map.get(key),
            _ => None,
        }
    }

    /// Walks a dot-delimited path. Any absent segment, or a step into a
    /// Scalar/List where a Node was expected, yields `None`.
    ///
    /// Numeric segments index into a List. A lone Node answers index `0` with
    /// itself, since a collection that repeats once serializes without the List.
    pub fn get(&self, path: &str) -> Option<&RawNode> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.step(segment))
    }

    /// Same walk as [`RawNode::get`], returning `fallback` instead of `None`.
    pub fn get_or<'a>(&'a self, path: &str, fallback: &'a RawNode) -> &'a RawNode {
        self.get(path).unwrap_or(fallback)
    }

    fn step(&self, segment: &str) -> Option<&RawNode> {
        let index = segment.parse::<usize>().ok();
        match (self, index) {
            (RawNode::Node(map), None) => map.get(segment),
            (RawNode::Node(_), Some(0)) => Some(self),
            (RawNode::List(items), Some(i)) => items.get(i),
            _ => None,
        }
    }

    /// Text carried by this value. A List yields its first non-blank text, or
    /// its first element's text when every entry is blank. Returns `None` for
    /// structured values with no text of their own.
    pub fn text(&self) -> Option<&str> {
        match self {
            RawNode::Scalar(text) => Some(text.as_str()),
            RawNode::List(items) => items
                .iter()
                .filter_map(RawNode::text)
                .find(|text| !text.trim().is_empty())
                .or_else(|| items.first().and_then(RawNode::text)),
            RawNode::Node(map) => map.get(TEXT_KEY).and_then(RawNode::text),
        }
    }

    /// Trimmed, non-empty text at `path`.
    ///
    /// Absent paths and blank text are `Ok(None)`. A path that lands on a
    /// record without text is an extraction anomaly for `field`.
    pub fn text_at(&self, path: &str, field: &str) -> Result<Option<&str>> {
        let Some(node) = self.get(path) else {
            return Ok(None);
        };

        match node.text() {
            Some(text) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then_some(trimmed))
            }
            None => Err(CreditReportError::anomaly(
                field,
                format!("'{}' holds a nested record where text was expected", path),
            )),
        }
    }

    /// Views a collection-shaped value as a list: a List yields its items,
    /// anything else becomes a one-element sequence.
    pub fn as_list(&self) -> Vec<&RawNode> {
        match self {
            RawNode::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawNode::Scalar(text) => text.trim().is_empty(),
            RawNode::Node(map) => map.is_empty(),
            RawNode::List(items) => items.iter().all(RawNode::is_blank),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, RawNode::Node(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(entries: Vec<(&str, RawNode)>) -> RawNode {
        RawNode::Node(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn sample() -> RawNode {
        node(vec![(
            "Accounts",
            node(vec![(
                "Account",
                RawNode::List(vec![
                    node(vec![("Bank", RawNode::scalar("HDFC"))]),
                    node(vec![("Bank", RawNode::scalar("SBI"))]),
                ]),
            )]),
        )])
    }

    #[test]
    fn test_nested_lookup() {
        let root = sample();
        let bank = root.get("Accounts.Account.1.Bank").unwrap();
        assert_eq!(bank.text(), Some("SBI"));
    }

    #[test]
    fn test_missing_segment_returns_fallback() {
        let root = sample();
        let fallback = RawNode::scalar("none");
        assert_eq!(root.get_or("Accounts.Missing.Bank", &fallback), &fallback);
        assert!(root.get("Accounts.Account.7").is_none());
    }

    #[test]
    fn test_mistyped_intermediate_is_absent() {
        let root = node(vec![("Score", RawNode::scalar("750"))]);
        assert!(root.get("Score.Value").is_none());

        let listed = sample();
        assert!(listed.get("Accounts.Account.Bank").is_none());
    }

    #[test]
    fn test_zero_index_on_lone_node() {
        let root = node(vec![(
            "Account",
            node(vec![("Bank", RawNode::scalar("Axis"))]),
        )]);
        assert_eq!(root.get("Account.0.Bank").and_then(RawNode::text), Some("Axis"));
        assert!(root.get("Account.1.Bank").is_none());
    }

    #[test]
    fn test_text_unwraps_lists_and_text_key() {
        let list = RawNode::List(vec![RawNode::scalar("first"), RawNode::scalar("second")]);
        assert_eq!(list.text(), Some("first"));

        let attributed = node(vec![
            ("currency", RawNode::scalar("INR")),
            (TEXT_KEY, RawNode::scalar("50000")),
        ]);
        assert_eq!(attributed.text(), Some("50000"));
    }

    #[test]
    fn test_list_text_skips_blank_entries() {
        let list = RawNode::List(vec![RawNode::scalar(""), RawNode::scalar("Real Name")]);
        assert_eq!(list.text(), Some("Real Name"));

        let all_blank = RawNode::List(vec![RawNode::scalar(" "), RawNode::scalar("")]);
        assert_eq!(all_blank.text(), Some(" "));
    }

    #[test]
    fn test_text_at_flags_nested_record() {
        let root = node(vec![(
            "Account_Type",
            node(vec![("Code", RawNode::scalar("10"))]),
        )]);
        let err = root.text_at("Account_Type", "accountType").unwrap_err();
        assert!(matches!(err, CreditReportError::ExtractionAnomaly { .. }));
    }

    #[test]
    fn test_text_at_blank_is_none() {
        let root = node(vec![("Name", RawNode::scalar("   "))]);
        assert_eq!(root.text_at("Name", "name").unwrap(), None);
        assert_eq!(root.text_at("Missing", "name").unwrap(), None);
    }

    #[test]
    fn test_as_list_wraps_single() {
        let single = node(vec![("Bank", RawNode::scalar("ICICI"))]);
        assert_eq!(single.as_list().len(), 1);
        assert_eq!(RawNode::List(vec![single.clone(), single]).as_list().len(), 2);
    }
}
