//! # Ownership Flow
//!
//! Mutations naming a target outside the session's namespace are refused
//! before storage is touched, however the target is spelled.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use crate::fixtures::{TestBridge, ALICE_KEY, BOB_KEY};
    use web_api_bridge::error::codes;
    use web_api_bridge::methods;
    use web_api_bridge::Action;

    fn writer() -> TestBridge {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);
        bridge
    }

    #[tokio::test]
    async fn test_foreign_key_forbidden_for_edit_and_remove() {
        let bridge = writer();
        let target = format!("dat://{}/.data/statuses/1.json", BOB_KEY);

        let err = bridge
            .call(methods::STATUSES_EDIT, vec![json!(target), json!("pwned")])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::FORBIDDEN_CROSS_ORIGIN);
        assert_eq!(err.name, "ForbiddenCrossOriginError");

        let err = bridge
            .call(methods::STATUSES_REMOVE, vec![json!(target)])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::FORBIDDEN_CROSS_ORIGIN);
        assert_eq!(bridge.content.call_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_alias_forbidden() {
        let bridge = writer();
        let err = bridge
            .call(
                methods::STATUSES_REMOVE,
                vec![json!("dat://bob.example/.data/statuses/1.json")],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::FORBIDDEN_CROSS_ORIGIN);
    }

    #[tokio::test]
    async fn test_own_alias_accepted() {
        let bridge = writer();
        let added = bridge
            .call(methods::STATUSES_ADD, vec![json!("mine")])
            .await
            .unwrap();
        let path = TestBridge::alice_path(added["url"].as_str().unwrap());

        let edited = bridge
            .call(
                methods::STATUSES_EDIT,
                vec![json!(format!("dat://alice.example{}", path)), json!("edited")],
            )
            .await
            .unwrap();
        assert_eq!(edited["body"], "edited");
    }

    #[tokio::test]
    async fn test_alias_repointed_elsewhere_is_forbidden() {
        let bridge = writer();
        let added = bridge
            .call(methods::STATUSES_ADD, vec![json!("mine")])
            .await
            .unwrap();
        let path = TestBridge::alice_path(added["url"].as_str().unwrap());

        bridge.names.set_alias("alice.example", BOB_KEY);
        let err = bridge
            .call(
                methods::STATUSES_REMOVE,
                vec![json!(format!("dat://alice.example{}", path))],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::FORBIDDEN_CROSS_ORIGIN);
    }

    #[tokio::test]
    async fn test_hostless_url_is_invalid_reference() {
        let bridge = writer();
        let err = bridge
            .call(methods::STATUSES_REMOVE, vec![json!("mailto:alice@alice.example")])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::INVALID_REFERENCE);
        assert_eq!(bridge.content.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bare_path_scoped_to_own_archive() {
        let bridge = writer();
        let added = bridge
            .call(methods::STATUSES_ADD, vec![json!("mine")])
            .await
            .unwrap();
        let path = TestBridge::alice_path(added["url"].as_str().unwrap());

        bridge
            .call(methods::STATUSES_REMOVE, vec![json!(path)])
            .await
            .unwrap();
        let listed = bridge.call(methods::STATUSES_LIST, vec![]).await.unwrap();
        assert_eq!(listed, json!([]));
        assert!(path.starts_with('/'));
        assert!(!path.contains(ALICE_KEY));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_any_foreign_key_any_path_forbidden(
            key in "[c-f0-9]{64}",
            path in "(/[a-z0-9._-]{1,10}){1,4}",
        ) {
            let bridge = writer();
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let target = format!("dat://{}{}", key, path);

            let err = rt
                .block_on(bridge.call(methods::STATUSES_EDIT, vec![json!(target), json!("x")]))
                .unwrap_err();
            prop_assert_eq!(err.code, codes::FORBIDDEN_CROSS_ORIGIN);
            prop_assert_eq!(bridge.content.call_count(), 0);
        }
    }
}
