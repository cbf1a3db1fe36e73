//! # Statuses Flow
//!
//! Gate, session and storage ordering for the `statuses.*` family.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::fixtures::{TestBridge, ALICE_KEY};
    use web_api_bridge::error::codes;
    use web_api_bridge::methods;
    use web_api_bridge::{Action, BridgeConfig};

    // =============================================================================
    // AUTHORIZATION
    // =============================================================================

    #[tokio::test]
    async fn test_ungranted_app_never_reaches_storage() {
        let bridge = TestBridge::new();
        bridge.login_alice();

        for (method, params) in [
            (methods::STATUSES_LIST, vec![]),
            (methods::STATUSES_GET, vec![json!("dat://x/y.json")]),
            (methods::STATUSES_ADD, vec![json!("hello")]),
            (methods::STATUSES_EDIT, vec![json!("/y.json"), json!("new")]),
            (methods::STATUSES_REMOVE, vec![json!("/y.json")]),
        ] {
            let err = bridge.call(method, params).await.unwrap_err();
            assert_eq!(err.code, codes::PERMISSION_DENIED, "{}", method);
            assert_eq!(err.name, "PermissionsError");
        }
        assert_eq!(bridge.content.call_count(), 0);
    }

    #[tokio::test]
    async fn test_read_grant_allows_list_but_not_add() {
        let bridge = TestBridge::new();
        bridge.login_alice().grant_statuses(&[Action::Read]);

        let listed = bridge.call(methods::STATUSES_LIST, vec![]).await.unwrap();
        assert_eq!(listed, json!([]));

        let err = bridge
            .call(methods::STATUSES_ADD, vec![json!("hello")])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::PERMISSION_DENIED);
    }

    #[tokio::test]
    async fn test_revoked_grant_takes_effect_on_next_call() {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);
        bridge
            .call(methods::STATUSES_ADD, vec![json!("one")])
            .await
            .unwrap();

        bridge
            .permissions
            .revoke(crate::fixtures::APP_ORIGIN, web_api_bridge::STATUSES_CAPABILITY);
        let err = bridge.call(methods::STATUSES_LIST, vec![]).await.unwrap_err();
        assert_eq!(err.code, codes::PERMISSION_DENIED);
    }

    // =============================================================================
    // ADD / GET / LIST
    // =============================================================================

    #[tokio::test]
    async fn test_bare_string_equals_body_object() {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);

        let from_string = bridge
            .call(methods::STATUSES_ADD, vec![json!("hello")])
            .await
            .unwrap();
        let from_object = bridge
            .call(methods::STATUSES_ADD, vec![json!({"body": "hello"})])
            .await
            .unwrap();

        for record in [&from_string, &from_object] {
            assert_eq!(record["body"], "hello");
            assert_eq!(record["visibility"], "public");
            assert_eq!(record["updatedAt"], Value::Null);
            assert_eq!(record["author"]["url"], format!("dat://{}", ALICE_KEY));
        }
    }

    #[tokio::test]
    async fn test_configured_default_visibility() {
        let mut config = BridgeConfig::default();
        config.statuses.default_visibility = "private".to_string();
        let bridge = TestBridge::with_config(config);
        bridge.login_alice().grant_statuses(&[Action::Write]);

        let record = bridge
            .call(methods::STATUSES_ADD, vec![json!({"body": "hi", "visibility": ""})])
            .await
            .unwrap();
        assert_eq!(record["visibility"], "private");
    }

    #[tokio::test]
    async fn test_public_shape_has_exactly_the_public_fields() {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);

        let added = bridge
            .call(methods::STATUSES_ADD, vec![json!("hello")])
            .await
            .unwrap();
        let fetched = bridge
            .call(methods::STATUSES_GET, vec![added["url"].clone()])
            .await
            .unwrap();
        assert_eq!(added, fetched);

        let mut keys: Vec<&str> = fetched
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["author", "body", "createdAt", "updatedAt", "url", "visibility"]
        );

        let mut author_keys: Vec<&str> = fetched["author"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        author_keys.sort_unstable();
        assert_eq!(author_keys, ["description", "title", "type", "url"]);

        let created = fetched["createdAt"].as_str().unwrap();
        assert!(created.ends_with('Z'));
        assert_eq!(created.len(), "2019-01-01T00:00:00.000Z".len());
    }

    #[tokio::test]
    async fn test_list_filters_paging_and_reverse() {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);

        for (body, visibility) in [("a", "public"), ("b", "private"), ("c", "public")] {
            bridge
                .call(
                    methods::STATUSES_ADD,
                    vec![json!({"body": body, "visibility": visibility})],
                )
                .await
                .unwrap();
        }

        let public = bridge
            .call(
                methods::STATUSES_LIST,
                vec![json!({"filters": {"visibility": "public"}})],
            )
            .await
            .unwrap();
        assert_eq!(public.as_array().unwrap().len(), 2);

        let newest = bridge
            .call(
                methods::STATUSES_LIST,
                vec![json!({"reverse": true, "limit": 1})],
            )
            .await
            .unwrap();
        assert_eq!(newest[0]["body"], "c");

        let by_author = bridge
            .call(
                methods::STATUSES_LIST,
                vec![json!({"filters": {"authors": format!("dat://{}", ALICE_KEY)}})],
            )
            .await
            .unwrap();
        assert_eq!(by_author.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_non_object_is_empty_query() {
        let bridge = TestBridge::new();
        bridge.grant_statuses(&[Action::Read]);
        let listed = bridge
            .call(methods::STATUSES_LIST, vec![json!("whatever")])
            .await
            .unwrap();
        assert_eq!(listed, json!([]));
    }

    // =============================================================================
    // VALIDATION ORDERING
    // =============================================================================

    #[tokio::test]
    async fn test_invalid_params_rejected_before_any_collaborator() {
        let bridge = TestBridge::new();

        let cases = [
            (methods::STATUSES_ADD, vec![json!("")]),
            (methods::STATUSES_ADD, vec![json!({"body": "x", "visibility": 3})]),
            (methods::STATUSES_LIST, vec![json!({"limit": "ten"})]),
            (methods::STATUSES_LIST, vec![json!({"offset": -1})]),
            (methods::STATUSES_LIST, vec![json!({"sortBy": null})]),
            (methods::STATUSES_GET, vec![]),
            (methods::STATUSES_EDIT, vec![json!("/x.json"), json!(5)]),
            (methods::STATUSES_REMOVE, vec![json!(12)]),
        ];
        for (method, params) in cases {
            let err = bridge.call(method, params.clone()).await.unwrap_err();
            assert_eq!(err.code, codes::INVALID_PARAMS, "{} {:?}", method, params);
            assert_eq!(err.name, "ValidationError");
        }
        assert_eq!(bridge.permissions.query_count(), 0);
        assert_eq!(bridge.content.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_without_session() {
        let bridge = TestBridge::new();
        bridge.grant_statuses(&[Action::Write]);

        let err = bridge
            .call(methods::STATUSES_ADD, vec![json!("hello")])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::NO_ACTIVE_SESSION);
        assert_eq!(err.name, "NoActiveSessionError");
        assert_eq!(bridge.content.call_count(), 0);
    }

    // =============================================================================
    // EDIT / REMOVE
    // =============================================================================

    #[tokio::test]
    async fn test_edit_then_remove_own_status() {
        let bridge = TestBridge::new();
        bridge
            .login_alice()
            .grant_statuses(&[Action::Read, Action::Write]);

        let added = bridge
            .call(methods::STATUSES_ADD, vec![json!("draft")])
            .await
            .unwrap();
        let url = added["url"].as_str().unwrap().to_string();

        let edited = bridge
            .call(
                methods::STATUSES_EDIT,
                vec![json!(url), json!({"visibility": "private"})],
            )
            .await
            .unwrap();
        assert_eq!(edited["body"], "draft");
        assert_eq!(edited["visibility"], "private");
        assert_eq!(edited["url"], json!(url));
        assert!(edited["updatedAt"].is_string());

        let removed = bridge
            .call(methods::STATUSES_REMOVE, vec![json!(url)])
            .await
            .unwrap();
        assert_eq!(removed, Value::Null);

        let gone = bridge
            .call(methods::STATUSES_GET, vec![json!(url)])
            .await
            .unwrap();
        assert_eq!(gone, Value::Null);
    }

    #[tokio::test]
    async fn test_edit_missing_status_passes_store_error_through() {
        let bridge = TestBridge::new();
        bridge.login_alice().grant_statuses(&[Action::Write]);

        let err = bridge
            .call(
                methods::STATUSES_EDIT,
                vec![json!("/.data/statuses/missing.json"), json!("x")],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::COLLABORATOR_ERROR);
        assert_eq!(err.name, "NotFoundError");
    }
}
