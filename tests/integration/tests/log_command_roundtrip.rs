use std::sync::Arc;
use std::time::Duration;

use futures_util::SinkExt;
use gistlog_gateway::{
    CallbackPoster, HistoryJobError, InteractionDispatcher, InteractionError, InteractionPayload,
};
use gistlog_github::{GistApiClient, HistoryPeriod};
use gistlog_session::{SessionKey, SessionState, SessionStore};
use gistlog_slack_runtime::{
    render_period_picker, run_chat_listener, ChatListenerConfig, RETRIEVING_TITLE,
};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

const VERIFICATION_TOKEN: &str = "verify-token";

/// Serves `frames` to the first RTM client and closes the socket.
async fn spawn_rtm_socket(frames: Vec<Value>) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind rtm socket");
    let addr = listener.local_addr().expect("rtm socket addr");
    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept rtm client");
        let mut socket = accept_async(tcp).await.expect("rtm handshake");
        for frame in frames {
            socket
                .send(WsMessage::Text(frame.to_string().into()))
                .await
                .expect("send rtm frame");
        }
        let _ = socket.close(None).await;
    });
    (format!("ws://{addr}/"), handle)
}

fn interaction(action: Value, message_ts: &str, response_url: &str) -> InteractionPayload {
    serde_json::from_value(json!({
        "type": "interactive_message",
        "token": VERIFICATION_TOKEN,
        "actions": [action],
        "user": {"id": "U1", "name": "alice"},
        "channel": {"id": "C1"},
        "message_ts": message_ts,
        "response_url": response_url,
        "original_message": render_period_picker(),
    }))
    .expect("interaction payload")
}

#[tokio::test]
async fn integration_log_command_select_start_delivers_sorted_gist_report() {
    let (socket_url, socket_task) = spawn_rtm_socket(vec![
        json!({"type": "hello"}),
        json!({
            "type": "message",
            "channel": "C1",
            "user": "U1",
            "text": "<@UBOT> log octocat",
            "ts": "1700000000.000100"
        }),
        json!({"type": "goodbye"}),
    ])
    .await;

    let slack = MockServer::start();
    let rtm_connect = slack.mock(|when, then| {
        when.method(POST).path("/rtm.connect");
        then.status(200)
            .json_body(json!({"ok": true, "url": socket_url}));
    });
    let post_picker = slack.mock(|when, then| {
        when.method(POST)
            .path("/chat.postMessage")
            .body_includes("Which period of Gist activities");
        then.status(200).json_body(json!({
            "ok": true,
            "channel": "C1",
            "ts": "1700000000.000200"
        }));
    });

    let sessions = SessionStore::new();
    run_chat_listener(
        ChatListenerConfig {
            api_base: slack.base_url(),
            bot_token: "xoxb-test".to_string(),
            bot_user_id: "UBOT".to_string(),
            channel_id: "C1".to_string(),
            request_timeout_ms: 3_000,
        },
        sessions.clone(),
    )
    .await
    .expect("listener run");
    socket_task.await.expect("rtm socket task");
    rtm_connect.assert_calls(1);
    post_picker.assert_calls(1);

    let prompt_key = SessionKey::new("C1", "1700000000.000200");
    let session = sessions.get(&prompt_key).expect("session opened");
    assert_eq!(session.target_account, "octocat");
    assert_eq!(session.state, SessionState::AwaitingPeriod);

    let github = MockServer::start();
    let gists = github.mock(|when, then| {
        when.method(GET)
            .path("/users/octocat/gists")
            .header("authorization", "Bearer ghp-test")
            .query_param("per_page", "100")
            .query_param("page", "1")
            .query_param_exists("since");
        then.status(200).json_body(json!([
            {
                "updated_at": "2024-03-01T10:00:00Z",
                "description": "older",
                "git_push_url": "https://gist.github.com/older.git"
            },
            {
                "updated_at": "2024-03-09T10:00:00Z",
                "description": "newer",
                "git_push_url": "https://gist.github.com/newer.git"
            }
        ]));
    });
    let hooks = MockServer::start();
    let delivery = hooks.mock(|when, then| {
        when.method(POST)
            .path("/hooks/1")
            .json_body_includes(format!(r#"{{"token":"{VERIFICATION_TOKEN}"}}"#));
        then.status(200).body("ok");
    });

    let gist_client =
        GistApiClient::new(&github.base_url(), Some("ghp-test"), 3_000).expect("gist client");
    let dispatcher = InteractionDispatcher::new(
        VERIFICATION_TOKEN,
        sessions.clone(),
        Arc::new(gist_client),
        CallbackPoster::new(VERIFICATION_TOKEN).expect("callback poster"),
    );
    let response_url = hooks.url("/hooks/1");

    let selected = dispatcher
        .dispatch(interaction(
            json!({"name": "select", "selected_options": [{"value": "monthly"}]}),
            "1700000000.000200",
            &response_url,
        ))
        .expect("select");
    assert_eq!(
        selected.prompt.attachments[0].text,
        ":ledger: List Monthly activities?"
    );

    let started = dispatcher
        .dispatch(interaction(
            json!({"name": "start", "value": "monthly"}),
            "1700000000.000200",
            &response_url,
        ))
        .expect("start");
    assert_eq!(
        started.prompt.attachments[0].fields[0].title,
        RETRIEVING_TITLE
    );
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        started.job.expect("history job").wait(),
    )
    .await
    .expect("job finished")
    .expect("job report");

    assert_eq!(report.period, HistoryPeriod::Monthly);
    let newer = report.report.find("newer").expect("newer line");
    let older = report.report.find("older").expect("older line");
    assert!(newer < older);
    gists.assert_calls(1);
    delivery.assert_calls(1);
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn integration_cancel_and_replay_of_finished_prompt() {
    let sessions = SessionStore::new();
    sessions.open(gistlog_session::SessionIntent::new(
        SessionKey::new("C1", "5.5"),
        "octocat",
        "U1",
    ));
    let github = MockServer::start();
    let gists = github.mock(|when, then| {
        when.method(GET).path("/users/octocat/gists");
        then.status(200).json_body(json!([]));
    });
    let dispatcher = InteractionDispatcher::new(
        VERIFICATION_TOKEN,
        sessions.clone(),
        Arc::new(GistApiClient::new(&github.base_url(), None, 3_000).expect("gist client")),
        CallbackPoster::new(VERIFICATION_TOKEN).expect("callback poster"),
    );

    let cancelled = dispatcher
        .dispatch(interaction(
            json!({"name": "cancel", "value": ""}),
            "5.5",
            "http://127.0.0.1:9/unused",
        ))
        .expect("cancel");
    assert!(cancelled.job.is_none());
    assert_eq!(
        cancelled.prompt.attachments[0].fields[0].title,
        ":x: @alice canceled the request"
    );

    let replay = dispatcher
        .dispatch(interaction(
            json!({"name": "start", "value": "weekly"}),
            "5.5",
            "http://127.0.0.1:9/unused",
        ))
        .expect_err("prompt already finished");
    assert_eq!(
        replay,
        InteractionError::SessionNotFound(SessionKey::new("C1", "5.5"))
    );
    gists.assert_calls(0);
}

#[tokio::test]
async fn integration_github_failure_is_reported_by_job_without_delivery() {
    let sessions = SessionStore::new();
    sessions.open(gistlog_session::SessionIntent::new(
        SessionKey::new("C1", "6.6"),
        "octocat",
        "U1",
    ));
    let github = MockServer::start();
    let gists = github.mock(|when, then| {
        when.method(GET).path("/users/octocat/gists");
        then.status(502).body("bad gateway");
    });
    let hooks = MockServer::start();
    let delivery = hooks.mock(|when, then| {
        when.method(POST).path("/hooks/1");
        then.status(200);
    });
    let dispatcher = InteractionDispatcher::new(
        VERIFICATION_TOKEN,
        sessions,
        Arc::new(GistApiClient::new(&github.base_url(), None, 3_000).expect("gist client")),
        CallbackPoster::new(VERIFICATION_TOKEN).expect("callback poster"),
    );
    let response_url = hooks.url("/hooks/1");

    dispatcher
        .dispatch(interaction(
            json!({"name": "select", "selected_options": [{"value": "weekly"}]}),
            "6.6",
            &response_url,
        ))
        .expect("select");
    let started = dispatcher
        .dispatch(interaction(
            json!({"name": "start", "value": "weekly"}),
            "6.6",
            &response_url,
        ))
        .expect("start");
    let error = started
        .job
        .expect("history job")
        .wait()
        .await
        .expect_err("github failure");

    assert!(matches!(error, HistoryJobError::Fetch(_)));
    gists.assert_calls(1);
    delivery.assert_calls(0);
}
