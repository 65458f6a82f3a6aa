use crate::dom::ElementNode;

/// Resolve the page title shown in the native bar
///
/// Later sources override earlier ones: the document title, then the header's
/// `data-title`, then its `title` attribute, then the most specific heading
/// (`h1` beats `h6` regardless of document order).
///
/// Heading text is trimmed; attribute values are used as written.
pub fn extract_title(document_title: &str, header: Option<&ElementNode>) -> String {
    let mut title = document_title.to_string();

    let Some(header) = header else {
        return title;
    };

    if let Some(data_title) = header.non_empty_attribute("data-title") {
        title = data_title.to_string();
    }

    if let Some(attr_title) = header.non_empty_attribute("title") {
        title = attr_title.to_string();
    }

    for level in (1..=6).rev() {
        let tag = format!("h{}", level);
        if let Some((_, heading)) = header.find_first(|n| n.is_tag(&tag)) {
            title = heading.text().trim().to_string();
        }
    }

    title
}
