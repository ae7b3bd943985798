//! Keyboard handling for a focused outline.

use std::time::Duration;

use super::controller::{HeadingNavigator, ScrollHost};

/// Keys the outline responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Home,
    End,
    Enter,
    Space,
}

impl HeadingNavigator {
    /// Handle a key press while the outline has focus.
    ///
    /// Up/Down/Home/End move focus and mark the focused entry active without
    /// scrolling. Enter and Space navigate to the focused entry. Returns
    /// whether the key was handled.
    pub fn handle_key<H: ScrollHost + ?Sized>(
        &mut self,
        now: Duration,
        key: NavKey,
        host: &mut H,
    ) -> bool {
        if self.is_torn_down() || self.outline().is_empty() {
            return false;
        }

        let last = self.outline().len() - 1;
        let current = self.focused.or_else(|| {
            let active = self.active_id()?;
            self.outline().iter().position(|e| e.id == active)
        });

        let target = match key {
            NavKey::Up => current.map_or(0, |i| i.saturating_sub(1)),
            NavKey::Down => current.map_or(0, |i| (i + 1).min(last)),
            NavKey::Home => 0,
            NavKey::End => last,
            NavKey::Enter | NavKey::Space => {
                let Some(index) = current else {
                    return false;
                };
                let id = self.outline()[index].id.clone();
                self.navigate_to(now, &id, host);
                return true;
            }
        };

        self.focused = Some(target);
        let id = self.outline()[target].id.clone();
        self.set_active(&id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::controller::tests::{ms, ready_navigator, FakePage, PAGE_HTML};
    use crate::navigator::HtmlView;

    #[test]
    fn test_arrow_keys_move_focus_without_scrolling() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);

        assert!(nav.handle_key(ms(0), NavKey::Down, &mut page));
        assert_eq!(nav.active_id(), Some("intro"));
        assert!(nav.handle_key(ms(0), NavKey::Down, &mut page));
        assert_eq!(nav.active_id(), Some("usage"));
        assert!(nav.handle_key(ms(0), NavKey::Up, &mut page));
        assert_eq!(nav.active_id(), Some("intro"));
        assert!(nav.handle_key(ms(0), NavKey::Up, &mut page));
        assert_eq!(nav.active_id(), Some("intro"));

        assert!(page.smooth_requests.is_empty());
        assert!(page.direct_scrolls.is_empty());
        assert!(!nav.is_navigating());
    }

    #[test]
    fn test_home_and_end() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);

        nav.handle_key(ms(0), NavKey::End, &mut page);
        assert_eq!(nav.active_id(), Some("faq"));
        nav.handle_key(ms(0), NavKey::Down, &mut page);
        assert_eq!(nav.active_id(), Some("faq"));
        nav.handle_key(ms(0), NavKey::Home, &mut page);
        assert_eq!(nav.active_id(), Some("intro"));
    }

    #[test]
    fn test_enter_and_space_navigate() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);

        nav.handle_key(ms(0), NavKey::End, &mut page);
        assert!(nav.handle_key(ms(0), NavKey::Enter, &mut page));
        assert_eq!(page.smooth_requests, vec!["faq"]);
        assert!(nav.is_navigating());

        nav.handle_key(ms(100), NavKey::Home, &mut page);
        assert!(nav.handle_key(ms(100), NavKey::Space, &mut page));
        assert_eq!(page.smooth_requests, vec!["faq", "intro"]);
    }

    #[test]
    fn test_focus_starts_from_active_heading() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);

        page.offset = 900.0;
        nav.on_animation_frame(&page);
        assert_eq!(nav.active_id(), Some("usage"));

        nav.handle_key(ms(0), NavKey::Down, &mut page);
        assert_eq!(nav.active_id(), Some("faq"));
    }

    #[test]
    fn test_enter_without_focus_is_ignored() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);

        assert!(!nav.handle_key(ms(0), NavKey::Enter, &mut page));
        assert!(page.smooth_requests.is_empty());
    }

    #[test]
    fn test_keys_after_teardown() {
        let mut view = HtmlView::from_html(PAGE_HTML);
        let mut page = FakePage::new();
        let mut nav = ready_navigator(&mut view);
        nav.teardown();
        assert!(!nav.handle_key(ms(0), NavKey::Down, &mut page));
    }
}
