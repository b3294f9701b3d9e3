//! Visibility oracle.

use feedpilot_protocols::ElementSnapshot;

/// Whether an element is rendered and can be clicked.
///
/// Requires a positive box, no hiding style, not disabled, and a top-left
/// corner inside the viewport. The bottom and right edges are not checked:
/// an element extending below the fold still counts as visible.
pub fn is_visible(snapshot: &ElementSnapshot) -> bool {
    let rect = &snapshot.rect;
    rect.width > 0.0
        && rect.height > 0.0
        && snapshot.display != "none"
        && snapshot.visibility != "hidden"
        && snapshot.opacity != "0"
        && !snapshot.disabled
        && rect.top >= 0.0
        && rect.left >= 0.0
}
