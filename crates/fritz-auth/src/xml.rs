//! Scalar field extraction from gateway XML responses.

use crate::error::{AuthError, AuthResult};

/// Extract the text content of the first element with the given tag
/// name, anywhere in the document.
///
/// The gateway's `SessionInfo` documents are flat, so tag-name lookup
/// is all the path resolution needed here. An element that exists but
/// is empty counts as missing.
pub fn first_text(body: &str, tag: &'static str) -> AuthResult<String> {
    let doc = roxmltree::Document::parse(body)?;
    doc.descendants()
        .find(|node| node.is_element() && node.has_tag_name(tag))
        .and_then(|node| node.text())
        .map(str::to_string)
        .ok_or(AuthError::MissingField(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_INFO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SessionInfo>
  <SID>0000000000000000</SID>
  <Challenge>2$60000$d4949767$6000$4f3415a3</Challenge>
  <BlockTime>0</BlockTime>
  <Rights></Rights>
</SessionInfo>"#;

    #[test]
    fn test_extracts_nested_field() {
        assert_eq!(
            first_text(SESSION_INFO, "Challenge").unwrap(),
            "2$60000$d4949767$6000$4f3415a3"
        );
        assert_eq!(first_text(SESSION_INFO, "BlockTime").unwrap(), "0");
    }

    #[test]
    fn test_missing_field() {
        assert!(matches!(
            first_text(SESSION_INFO, "Nonexistent"),
            Err(AuthError::MissingField("Nonexistent"))
        ));
    }

    #[test]
    fn test_empty_element_counts_as_missing() {
        assert!(matches!(
            first_text(SESSION_INFO, "Rights"),
            Err(AuthError::MissingField("Rights"))
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            first_text("not xml at all <", "SID"),
            Err(AuthError::Xml(_))
        ));
    }
}
