use crate::callbacks::CallbackKind;
use crate::dom::DomTree;
use crate::extract::{Diagnostic, ExtractionContext, Region};
use crate::model::MenuItem;

/// Collect `menuitem` entries from the header's popup menu, then the document-level one
pub fn extract_popup_menu(
    tree: &DomTree,
    header_menu: Option<&Region<'_>>,
    document_menu: Option<&Region<'_>>,
    ctx: &mut ExtractionContext<'_>,
) -> Vec<MenuItem> {
    let mut items = Vec::new();

    if header_menu.is_none() && document_menu.is_none() {
        return items;
    }

    for menu in [header_menu, document_menu].into_iter().flatten() {
        for entry in menu.find_all(|n| n.is_tag("menuitem")) {
            let Some(handle) = tree.handle_for(&entry.path) else {
                continue;
            };

            let label = match entry.node.get_attribute("label") {
                Some(label) => label.clone(),
                None => {
                    ctx.report(Diagnostic::MissingLabel {
                        element: handle.css_selector.clone(),
                    });
                    String::new()
                }
            };

            items.push(MenuItem {
                label,
                icon: entry.node.get_attribute("icon").cloned(),
                disabled: entry.node.has_attribute("disabled"),
                selected: false,
                callback_id: ctx.register(CallbackKind::MenuClick, handle),
            });
        }
    }

    items
}
