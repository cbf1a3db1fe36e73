//! # Dialog Flow
//!
//! The user's choice in the modal is the authorization. A cancel, a closed
//! window, or an answer without the expected field all end as `UserDenied`.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::fixtures::{TestBridge, ALICE_KEY};
    use web_api_bridge::error::codes;
    use web_api_bridge::{methods, ModalError};

    #[tokio::test]
    async fn test_cancel_is_user_denied_and_leaves_no_trace() {
        let bridge = TestBridge::new();
        bridge.login_alice();

        for method in [methods::SELECT_FILE_DIALOG, methods::SAVE_FILE_DIALOG] {
            let err = bridge.call(method, vec![]).await.unwrap_err();
            assert_eq!(err.code, codes::USER_DENIED);
            assert_eq!(err.name, "UserDeniedError");
        }
        let err = bridge
            .call(methods::SELECT_RESOURCE_DIALOG, vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::USER_DENIED);

        assert_eq!(bridge.permissions.query_count(), 0);
        assert_eq!(bridge.content.call_count(), 0);
        assert_eq!(bridge.modals.shown().len(), 3);
    }

    #[tokio::test]
    async fn test_select_file_defaults_to_own_archive() {
        let bridge = TestBridge::new();
        bridge.login_alice();
        bridge
            .modals
            .push_answer(Ok(Some(json!({"paths": ["/a.png", "/b.png"]}))));

        let paths = bridge
            .call(
                methods::SELECT_FILE_DIALOG,
                vec![json!({"title": "Pick", "allowMultiple": true, "filters": null})],
            )
            .await
            .unwrap();
        assert_eq!(paths, json!(["/a.png", "/b.png"]));

        let shown = bridge.modals.shown();
        assert_eq!(shown[0].0, "select-file");
        assert_eq!(shown[0].1["archive"], format!("dat://{}", ALICE_KEY));
        assert_eq!(shown[0].1["title"], "Pick");
        assert!(shown[0].1.get("filters").is_none());
    }

    #[tokio::test]
    async fn test_save_file_sets_save_mode() {
        let bridge = TestBridge::new();
        bridge.login_alice();
        bridge.modals.push_answer(Ok(Some(json!({"path": "/notes.txt"}))));

        let path = bridge
            .call(
                methods::SAVE_FILE_DIALOG,
                vec![json!({"defaultFilename": "notes.txt", "extension": ".txt"})],
            )
            .await
            .unwrap();
        assert_eq!(path, json!("/notes.txt"));

        let shown = bridge.modals.shown();
        assert_eq!(shown[0].1["saveMode"], true);
        assert_eq!(shown[0].1["defaultFilename"], "notes.txt");
    }

    #[tokio::test]
    async fn test_file_dialogs_need_a_session() {
        let bridge = TestBridge::new();
        let err = bridge
            .call(methods::SELECT_FILE_DIALOG, vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::NO_ACTIVE_SESSION);
        assert!(bridge.modals.shown().is_empty());
    }

    #[tokio::test]
    async fn test_answer_missing_field_is_denied() {
        let bridge = TestBridge::new();
        bridge.modals.push_answer(Ok(Some(json!({"path": "/wrong-field"}))));

        let err = bridge
            .call(methods::SELECT_RESOURCE_DIALOG, vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::USER_DENIED);
    }

    #[tokio::test]
    async fn test_closed_window_is_denied_but_named_failures_pass() {
        let bridge = TestBridge::new();
        bridge
            .modals
            .push_answer(Err(ModalError::Dismissed("window closed".into())));
        bridge.modals.push_answer(Err(ModalError::Specific {
            name: "ArchiveNotWritableError".into(),
            message: "Cannot write to this archive".into(),
        }));

        let first = bridge
            .call(methods::SELECT_RESOURCE_DIALOG, vec![])
            .await
            .unwrap_err();
        assert_eq!(first.code, codes::USER_DENIED);

        let second = bridge
            .call(methods::SELECT_RESOURCE_DIALOG, vec![])
            .await
            .unwrap_err();
        assert_eq!(second.name, "ArchiveNotWritableError");
        assert_eq!(second.message, "Cannot write to this archive");
    }

    #[tokio::test]
    async fn test_bad_options_never_open_a_modal() {
        let bridge = TestBridge::new();
        bridge.login_alice();

        for params in [
            vec![json!("not an object")],
            vec![json!({"title": 5})],
            vec![json!({"filters": "x"})],
            vec![json!({"select": ["/ok", 3]})],
        ] {
            let err = bridge
                .call(methods::SELECT_FILE_DIALOG, params)
                .await
                .unwrap_err();
            assert_eq!(err.code, codes::INVALID_PARAMS);
        }
        assert!(bridge.modals.shown().is_empty());
    }
}
