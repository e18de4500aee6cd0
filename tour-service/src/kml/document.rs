use crate::services::PipelineError;

const XML_DECLARATION: &str = "<?xml";
const KML_CLOSE: &str = "</kml>";

/// Locate the `<?xml ... </kml>` region inside arbitrary model output.
///
/// Models often wrap the document in markdown fences or prose; everything
/// outside the region is dropped.
pub fn locate_document(text: &str) -> Option<&str> {
    let start = text.find(XML_DECLARATION)?;
    let end = text[start..].find(KML_CLOSE)? + start + KML_CLOSE.len();
    Some(&text[start..end])
}

/// Return the complete top-level document that will be stored.
pub fn extract_document(text: &str) -> Result<&str, PipelineError> {
    locate_document(text).ok_or(PipelineError::MalformedOutput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences_and_prose() {
        let text = "Here is your file:\n```xml\n<?xml version=\"1.0\"?>\n<kml><Document/></kml>\n```\nEnjoy!";
        assert_eq!(
            extract_document(text).unwrap(),
            "<?xml version=\"1.0\"?>\n<kml><Document/></kml>"
        );
    }

    #[test]
    fn missing_declaration_is_malformed() {
        let err = extract_document("<kml><Document/></kml>").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedOutput));
    }

    #[test]
    fn missing_closing_tag_is_malformed() {
        let err = extract_document("<?xml version=\"1.0\"?><kml><Document/>").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedOutput));
    }

    #[test]
    fn closing_tag_before_declaration_is_ignored() {
        let text = "</kml> noise <?xml version=\"1.0\"?><kml></kml>";
        assert_eq!(
            extract_document(text).unwrap(),
            "<?xml version=\"1.0\"?><kml></kml>"
        );
    }
}
