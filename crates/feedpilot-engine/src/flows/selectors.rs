//! Locators for the target site's profile and invitation pages.

use crate::locator::{Locator, Predicate};

pub const OPEN_DROPDOWN: &str = ".artdeco-dropdown__content[aria-hidden=\"false\"]";
pub const VISIBLE_DROPDOWN: &str = ".artdeco-dropdown__content:not([aria-hidden=\"true\"])";
pub const FOLLOWING_BY_LABEL: &str = "button[aria-label*=\"Following\"]";
pub const MORE_IN_HEADER: &str =
    ".ph5 button[aria-label=\"More actions\"][id*=\"profile-overflow-action\"]";
pub const MORE_BY_ID: &str = "button[aria-label=\"More actions\"][id*=\"profile-overflow-action\"]";
pub const UNFOLLOW_DROPDOWN_ITEM: &str =
    "div[aria-label*=\"Unfollow\"][role=\"button\"].artdeco-dropdown__item";
pub const UNFOLLOW_ROLE_BUTTON: &str = "div[aria-label*=\"Unfollow\"][role=\"button\"]";
pub const DROPDOWN_ITEMS: &str =
    ".artdeco-dropdown__item, .artdeco-dropdown__content div[role=\"button\"]";
pub const DIALOG_PRIMARY: &str = "button[data-test-dialog-primary-btn=\"\"]";
pub const MODAL_PRIMARY: &str = ".artdeco-modal button[data-test-dialog-primary-btn]";
pub const MODAL_BUTTONS: &str = ".artdeco-modal button, [role=\"alertdialog\"] button";
pub const BUTTON: &str = "button";
pub const INVITATION_CARD: &str = "li[data-view-name=\"pending-invitation\"]";
pub const ACCEPT_BUTTON: &str = "button[aria-label*=\"Accept\"]";
pub const PROFILE_LINK: &str = "a[href*=\"/in/\"]";

const OVERFLOW_MARKER: &str = "profile-overflow-action";

/// Direct "Following" control; clicking it opens the confirmation modal.
pub fn following_trigger() -> Locator {
    Locator::new("Following button")
        .with(FOLLOWING_BY_LABEL, Predicate::text_equals("following"))
        .with(BUTTON, Predicate::text_equals("following"))
}

/// Profile overflow "More" control.
pub fn more_trigger() -> Locator {
    Locator::new("More button")
        .css(MORE_IN_HEADER)
        .css(MORE_BY_ID)
        .with(
            BUTTON,
            Predicate::AllOf(vec![
                Predicate::text_equals("more"),
                Predicate::AnyOf(vec![
                    Predicate::id_contains(OVERFLOW_MARKER),
                    Predicate::label_equals("More actions"),
                ]),
            ]),
        )
}

/// "Unfollow" entry of the overflow dropdown.
pub fn unfollow_option() -> Locator {
    Locator::new("Unfollow option")
        .css(UNFOLLOW_DROPDOWN_ITEM)
        .css(UNFOLLOW_ROLE_BUTTON)
        .with(
            DROPDOWN_ITEMS,
            Predicate::AnyOf(vec![
                Predicate::label_contains("unfollow"),
                Predicate::text_word("unfollow"),
            ]),
        )
}

/// A button whose text says the profile is currently followed.
pub fn following_indicator() -> Locator {
    Locator::new("Following indicator").with(
        BUTTON,
        Predicate::AnyOf(vec![
            Predicate::text_equals("following"),
            Predicate::text_equals("unfollow"),
        ]),
    )
}

/// Confirm button of the unfollow modal.
pub fn confirm_unfollow() -> Locator {
    let unfollow = || Predicate::text_contains("unfollow");
    Locator::new("Unfollow confirmation")
        .with(DIALOG_PRIMARY, unfollow())
        .with(MODAL_PRIMARY, unfollow())
        .with(MODAL_BUTTONS, unfollow())
}

/// Open overflow dropdown.
pub fn open_dropdown() -> Locator {
    Locator::new("Open dropdown").css(OPEN_DROPDOWN).css(VISIBLE_DROPDOWN)
}

pub fn accept_button() -> Locator {
    Locator::new("Accept button").css(ACCEPT_BUTTON)
}
