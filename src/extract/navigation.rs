use crate::dom::ElementNode;
use crate::extract::{Diagnostic, ExtractionContext};
use crate::model::NavigationMode;

/// Read the header's `data-nav` attribute
///
/// Unknown values are reported and treated as `none`.
pub fn extract_navigation_mode(header: Option<&ElementNode>, ctx: &mut ExtractionContext<'_>) -> NavigationMode {
    let Some(value) = header.and_then(|h| h.non_empty_attribute("data-nav")) else {
        return NavigationMode::None;
    };

    match value.parse() {
        Ok(mode) => mode,
        Err(_) => {
            ctx.report(Diagnostic::InvalidNavigation {
                value: value.to_ascii_lowercase(),
            });
            NavigationMode::None
        }
    }
}
