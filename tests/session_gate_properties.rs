//! Property tests for the session gate helpers

use kenq_api::{middleware::auth::login_url, session::safe_callback};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_callback_never_leaves_the_site(target in ".*") {
        let callback = safe_callback(Some(&target));
        prop_assert!(callback.starts_with('/'));
        prop_assert!(!callback.starts_with("//"));
        prop_assert!(!callback.contains('\\'));
    }

    #[test]
    fn prop_local_paths_are_kept(segment in "[a-z0-9]{1,12}") {
        let target = format!("/projects/{segment}");
        prop_assert_eq!(safe_callback(Some(&target)), target.as_str());
    }

    #[test]
    fn prop_login_url_round_trips(segment in "[a-z0-9/?=&]{0,20}") {
        let target = format!("/{segment}");
        let url = login_url(&target);
        let encoded = url.strip_prefix("/login?callbackUrl=").unwrap();
        prop_assert_eq!(urlencoding::decode(encoded).unwrap().into_owned(), target);
    }
}
