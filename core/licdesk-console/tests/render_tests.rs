use licdesk_console::{project, UserLink, UserViews, USERS_HEADING};
use licdesk_types::User;
use pretty_assertions::assert_eq;

#[test]
fn empty_cache_renders_empty_lists() {
    let views = project(&[]);
    assert!(views.is_empty());
    assert_eq!(views.to_text(), format!("{USERS_HEADING}\n"));
}

#[test]
fn link_points_at_user_page() {
    let views = project(&[User::new(3, "bob")]);
    assert_eq!(
        views.links,
        vec![UserLink {
            href: "/user/3".into(),
            label: "bob".into(),
        }]
    );
}

#[test]
fn order_follows_service_not_name() {
    let users = [User::new(7, "zed"), User::new(1, "alice"), User::new(4, "mia")];
    let views = project(&users);
    assert_eq!(views.display, vec!["zed", "alice", "mia"]);
    let hrefs: Vec<_> = views.links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(hrefs, vec!["/user/7", "/user/1", "/user/4"]);
}

#[test]
fn text_rendering() {
    let views = project(&[User::new(1, "alice"), User::new(3, "bob")]);
    let expected = "\
Registered users:
  alice
  bob

  alice -> /user/1
  bob -> /user/3
";
    assert_eq!(views.to_text(), expected);
}

#[test]
fn rerender_replaces_everything() {
    let first = project(&[User::new(1, "alice"), User::new(2, "carol")]);
    let second = project(&[User::new(3, "bob")]);
    assert_ne!(first, second);
    assert_eq!(
        second,
        UserViews {
            display: vec!["bob".into()],
            links: vec![UserLink {
                href: "/user/3".into(),
                label: "bob".into(),
            }],
        }
    );
}
