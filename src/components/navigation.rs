use crate::Result;
use crate::dom::{Dom, NodeId};

const USER_MENU_HTML: &str = concat!(
    "<button class=\"user-button\"><i class=\"fas fa-user\"></i><span></span></button>",
    "<div class=\"dropdown-content\">",
    "<a href=\"my_tickets.HTML\">My Tickets</a>",
    "<a href=\"#\" data-action=\"logout\">Logout</a>",
    "</div>",
);

/// The mobile menu button and the link list it opens.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Navigation {
    pub(crate) menu_button: NodeId,
    pub(crate) nav_links: NodeId,
}

impl Navigation {
    pub(crate) fn bind(dom: &Dom) -> Result<Option<Self>> {
        let menu_button = dom.query_selector(".menu-btn")?;
        let nav_links = dom.query_selector(".nav-links")?;
        match (menu_button, nav_links) {
            (Some(menu_button), Some(nav_links)) => Ok(Some(Self {
                menu_button,
                nav_links,
            })),
            _ => {
                log::debug!("Navigation elements not found");
                Ok(None)
            }
        }
    }

    pub(crate) fn is_open(&self, dom: &Dom) -> bool {
        dom.class_contains(self.nav_links, "active")
    }

    pub(crate) fn toggle(&self, dom: &mut Dom) -> Result<bool> {
        let expanded = dom.class_toggle(self.nav_links, "active")?;
        self.sync_button(dom, expanded)?;
        Ok(expanded)
    }

    pub(crate) fn close(&self, dom: &mut Dom) -> Result<()> {
        dom.class_remove(self.nav_links, "active")?;
        self.sync_button(dom, false)
    }

    pub(crate) fn is_outside(&self, dom: &Dom, target: NodeId) -> bool {
        !dom.contains(self.nav_links, target) && !dom.contains(self.menu_button, target)
    }

    fn sync_button(&self, dom: &mut Dom, expanded: bool) -> Result<()> {
        dom.set_attr(self.menu_button, "aria-expanded", &expanded.to_string())?;
        let label = if expanded { "Close menu" } else { "Open menu" };
        dom.set_attr(self.menu_button, "aria-label", label)
    }
}

/// Replaces the nav's login link with a user menu. Returns the logout link
/// of the new menu, or `None` when there was no login link to replace.
pub(crate) fn swap_login_link(dom: &mut Dom, username: &str) -> Result<Option<NodeId>> {
    let Some(login_link) = dom.query_selector(".nav-links a[href=\"login.html\"]")? else {
        return Ok(None);
    };

    let dropdown = dom.create_detached_element("div", &[("class", "user-dropdown")]);
    dom.set_inner_html(dropdown, USER_MENU_HTML)?;
    if let Some(name_slot) = dom.query_selector_from(dropdown, ".user-button span")? {
        dom.set_text_content(name_slot, username)?;
    }
    dom.replace_with(login_link, dropdown)?;
    dom.query_selector_from(dropdown, "a[data-action=\"logout\"]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    const NAV: &str = r##"
        <nav>
          <button class="menu-btn" aria-expanded="false"></button>
          <ul class="nav-links">
            <li><a href="#events">Events</a></li>
            <li><a href="login.html">Login</a></li>
          </ul>
        </nav>
        <main id="events"><p id="outside">x</p></main>"##;

    #[test]
    fn toggle_keeps_aria_state_in_step() -> Result<()> {
        let mut dom = parse_html(NAV)?;
        let nav = Navigation::bind(&dom)?.expect("nav");

        assert!(nav.toggle(&mut dom)?);
        assert_eq!(dom.attr(nav.menu_button, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(dom.attr(nav.menu_button, "aria-label").as_deref(), Some("Close menu"));

        nav.close(&mut dom)?;
        assert!(!nav.is_open(&dom));
        assert_eq!(dom.attr(nav.menu_button, "aria-label").as_deref(), Some("Open menu"));
        Ok(())
    }

    #[test]
    fn outside_means_neither_menu_nor_button() -> Result<()> {
        let dom = parse_html(NAV)?;
        let nav = Navigation::bind(&dom)?.expect("nav");
        let link = dom.query_selector(".nav-links a")?.expect("link");
        assert!(!nav.is_outside(&dom, link));
        assert!(!nav.is_outside(&dom, nav.menu_button));
        assert!(nav.is_outside(&dom, dom.by_id("outside").expect("p")));
        Ok(())
    }

    #[test]
    fn bind_skips_pages_without_menu() -> Result<()> {
        let dom = parse_html("<ul class='nav-links'></ul>")?;
        assert!(Navigation::bind(&dom)?.is_none());
        Ok(())
    }

    #[test]
    fn login_link_becomes_escaped_user_menu() -> Result<()> {
        let mut dom = parse_html(NAV)?;
        let logout = swap_login_link(&mut dom, "<b>mona</b>")?.expect("logout link");

        assert!(dom.query_selector("a[href=\"login.html\"]")?.is_none());
        let button = dom.query_selector(".nav-links .user-dropdown .user-button")?.expect("button");
        assert_eq!(dom.text_content(button), "<b>mona</b>");
        assert!(dom.query_selector(".user-button b")?.is_none());
        assert_eq!(dom.text_content(logout), "Logout");
        Ok(())
    }

    #[test]
    fn swap_is_a_no_op_without_login_link() -> Result<()> {
        let mut dom = parse_html("<ul class='nav-links'><li><a href='#x'>x</a></li></ul>")?;
        assert!(swap_login_link(&mut dom, "mona")?.is_none());
        assert!(dom.query_selector(".user-dropdown")?.is_none());
        Ok(())
    }
}
