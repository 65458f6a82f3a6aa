use crate::callbacks::CallbackKind;
use crate::dom::{DomTree, ElementNode};
use crate::extract::{ExtractionContext, Region};
use crate::model::ActionItem;

/// Action buttons from the header's toolbar menu
///
/// Labels are the control's text content with surrounding whitespace trimmed.
pub fn extract_toolbar_actions(
    tree: &DomTree,
    toolbar: Option<&Region<'_>>,
    ctx: &mut ExtractionContext<'_>,
) -> Vec<ActionItem> {
    extract_toolbar(tree, toolbar, CallbackKind::ActionClick, ctx)
}

/// Tabs from the footer's toolbar menu
///
/// Labels are trimmed like [`extract_toolbar_actions`] labels.
pub fn extract_tab_items(
    tree: &DomTree,
    toolbar: Option<&Region<'_>>,
    ctx: &mut ExtractionContext<'_>,
) -> Vec<ActionItem> {
    extract_toolbar(tree, toolbar, CallbackKind::TabClick, ctx)
}

fn extract_toolbar(
    tree: &DomTree,
    toolbar: Option<&Region<'_>>,
    kind: CallbackKind,
    ctx: &mut ExtractionContext<'_>,
) -> Vec<ActionItem> {
    let Some(toolbar) = toolbar else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for control in toolbar.find_all(|n| n.is_tag("a") || n.is_tag("button")) {
        let Some(handle) = tree.handle_for(&control.path) else {
            continue;
        };

        items.push(ActionItem {
            label: control.node.text().trim().to_string(),
            icon: control.node.get_attribute("icon").cloned(),
            disabled: control.node.has_attribute("disabled"),
            selected: kind == CallbackKind::TabClick && is_current(control.node),
            callback_id: ctx.register(kind, handle),
        });
    }

    log::debug!("Extracted {} {} items", items.len(), kind.prefix());
    items
}

fn is_current(node: &ElementNode) -> bool {
    node.get_attribute("aria-selected").is_some_and(|v| v == "true")
        || node.get_attribute("aria-current").is_some_and(|v| v != "false")
}
