//! Integration tests against a local mock of the chat-completion endpoint.

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use teman_wisata::chat::{ChatApp, ChatConfig, ChatState, FAILURE_NOTICE, Renderer};
    use teman_wisata::{
        ChatSession, CredentialStore, KnownModel, KnownRegion, Message, Model, OpenRouter, Role,
        SessionStore,
    };

    #[derive(Default)]
    struct RecordingRenderer {
        messages: Vec<Message>,
        errors: Vec<String>,
        pending: usize,
    }

    impl Renderer for RecordingRenderer {
        fn print_message(&mut self, message: &Message) {
            self.messages.push(message.clone());
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, _: &str) {}

        fn start_pending(&mut self, _: &str) {
            self.pending += 1;
        }

        fn finish_pending(&mut self) {}
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "model": "meta-llama/llama-3.3-70b-instruct:free",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
    }

    async fn mock_reply(server: &MockServer, text: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(reply(text))
            .mount(server)
            .await;
    }

    async fn request_bodies(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    fn client(server: &MockServer) -> OpenRouter {
        OpenRouter::with_options(Some("sk-test".to_string()), Some(&server.uri()), None).unwrap()
    }

    fn open_app(dir: &tempfile::TempDir, base_url: &str, key: &str) -> ChatApp {
        let config = ChatConfig::new()
            .with_base_url(base_url)
            .with_history_file(dir.path().join("chat_history.json"))
            .with_key_file(dir.path().join("api_key.txt"));
        CredentialStore::new(&config.key_file).save(key).unwrap();
        ChatApp::open(&config).unwrap()
    }

    fn alternating(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::assistant(format!("jawaban {i}"))
                } else {
                    Message::user(format!("pertanyaan {i}"))
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn complete_sends_fixed_parameters() {
        let server = MockServer::start().await;
        mock_reply(&server, "Rendang berasal dari Minangkabau.").await;

        let text = client(&server)
            .complete(
                &[Message::assistant("Halo!")],
                "Apa itu rendang?",
                None,
                &Model::Known(KnownModel::Llama33_70bInstructFree),
            )
            .await
            .unwrap();
        assert_eq!(text, "Rendang berasal dari Minangkabau.");

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["model"], "meta-llama/llama-3.3-70b-instruct:free");
        assert_eq!(body["max_tokens"], 1500);
        assert!((body["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert!((body["presence_penalty"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((body["frequency_penalty"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("Teman Wisata"));
        assert_eq!(messages[1], json!({"role": "assistant", "content": "Halo!"}));
        assert_eq!(
            messages[2],
            json!({"role": "user", "content": "Apa itu rendang?"})
        );
    }

    #[tokio::test]
    async fn complete_forwards_last_six_messages() {
        let server = MockServer::start().await;
        mock_reply(&server, "ok").await;

        let history = alternating(9);
        client(&server)
            .complete(&history, "baru", None, &Model::default())
            .await
            .unwrap();

        let body = &request_bodies(&server).await[0];
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 8);
        for (sent, expected) in messages[1..7].iter().zip(&history[3..]) {
            assert_eq!(sent["content"], expected.content.as_str());
        }
        assert_eq!(messages[7]["content"], "baru");
    }

    #[tokio::test]
    async fn complete_tags_region_on_outbound_text() {
        let server = MockServer::start().await;
        mock_reply(&server, "ok").await;

        client(&server)
            .complete(
                &[],
                "Makanan khas?",
                Some(&KnownRegion::Sumatra.into()),
                &Model::default(),
            )
            .await
            .unwrap();

        let body = &request_bodies(&server).await[0];
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1]["content"],
            "[Fokus daerah: Sumatra] Makanan khas?"
        );
    }

    #[tokio::test]
    async fn rejected_request_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"No auth\"}"))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(&[], "Halo", None, &Model::default())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.to_string(), "Error 401: {\"error\":\"No auth\"}");
    }

    #[tokio::test]
    async fn reply_without_choices_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(&[], "Halo", None, &Model::default())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.status_code(), Some(200));
    }

    #[tokio::test]
    async fn non_json_reply_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(&[], "Halo", None, &Model::default())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[tokio::test]
    async fn refused_connection_is_connectivity_error() {
        let client =
            OpenRouter::with_options(Some("sk-test".to_string()), Some("http://127.0.0.1:9/"), None)
                .unwrap();
        let err = client
            .complete(&[], "Halo", None, &Model::default())
            .await
            .unwrap_err();
        assert!(err.is_connectivity());
        assert!(!err.is_upstream());
    }

    #[tokio::test]
    async fn converse_appends_reply_and_persists() {
        let server = MockServer::start().await;
        mock_reply(&server, "Ngaben adalah upacara kremasi.").await;
        let dir = tempfile::tempdir().unwrap();

        let mut app = open_app(&dir, &server.uri(), "sk-test");
        app.set_region(Some(KnownRegion::Bali.into()));
        let mut renderer = RecordingRenderer::default();
        app.converse("Apa itu Ngaben?", &mut renderer).await.unwrap();

        assert_eq!(app.state(), ChatState::Idle);
        let chat = app.current().unwrap();
        assert_eq!(chat.title, "Apa itu Ngaben?");
        assert_eq!(chat.message_count(), 3);
        assert_eq!(chat.messages[1], Message::user("Apa itu Ngaben?"));
        assert_eq!(
            chat.messages[2],
            Message::assistant("Ngaben adalah upacara kremasi.")
        );
        assert_eq!(renderer.pending, 1);
        assert_eq!(renderer.messages.len(), 2);
        assert!(renderer.errors.is_empty());

        // The region tag goes upstream but never into the transcript.
        let body = &request_bodies(&server).await[0];
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(
            messages[2],
            json!({"role": "user", "content": "Apa itu Ngaben?"})
        );
        assert_eq!(
            messages[3]["content"],
            "[Fokus daerah: Bali] Apa itu Ngaben?"
        );

        let stored = SessionStore::new(dir.path().join("chat_history.json")).load();
        assert_eq!(stored.conversations.len(), 1);
        let stored_chat: &ChatSession = &stored.conversations[0];
        assert_eq!(stored_chat.messages, chat.messages);
        assert!(
            stored_chat
                .messages
                .iter()
                .all(|m| !m.content.contains("[Fokus daerah"))
        );
    }

    #[tokio::test]
    async fn failed_reply_leaves_message_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let mut app = open_app(&dir, &server.uri(), "sk-test");
        let mut renderer = RecordingRenderer::default();
        let err = app
            .converse("Bagaimana sejarah Batik?", &mut renderer)
            .await
            .unwrap_err();
        assert!(err.is_upstream());

        assert_eq!(app.state(), ChatState::PendingResponse);
        let chat = app.current().unwrap();
        assert_eq!(chat.message_count(), 2);
        assert_eq!(chat.last_message().unwrap().role, Role::User);
        assert_eq!(
            renderer.errors,
            vec!["Error 401: unauthorized".to_string(), FAILURE_NOTICE.to_string()]
        );

        let stored = SessionStore::new(dir.path().join("chat_history.json")).load();
        assert_eq!(stored.conversations[0].messages, chat.messages);
    }

    #[tokio::test]
    async fn retry_after_failure_resends_pending_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mock_reply(&server, "Batik adalah warisan budaya.").await;
        let dir = tempfile::tempdir().unwrap();

        let mut app = open_app(&dir, &server.uri(), "sk-test");
        let mut renderer = RecordingRenderer::default();
        assert!(app.converse("Batik?", &mut renderer).await.is_err());
        let text = app.retry().await.unwrap();
        assert_eq!(text, "Batik adalah warisan budaya.");
        assert_eq!(app.state(), ChatState::Idle);

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        let messages = bodies[1]["messages"].as_array().unwrap();
        let user_turns: Vec<&Value> = messages
            .iter()
            .filter(|m| m["role"] == "user")
            .map(|m| &m["content"])
            .collect();
        assert_eq!(user_turns, vec!["Batik?", "Batik?"]);
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn window_includes_pending_message_before_final_turn() {
        let server = MockServer::start().await;
        mock_reply(&server, "ok").await;
        let dir = tempfile::tempdir().unwrap();

        let mut app = open_app(&dir, &server.uri(), "sk-test");
        let mut renderer = RecordingRenderer::default();
        for text in ["u1", "u2", "u3", "u4"] {
            app.converse(text, &mut renderer).await.unwrap();
        }

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 4);
        let sent: Vec<&str> = bodies[3]["messages"].as_array().unwrap()[1..]
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(sent, vec!["ok", "u2", "ok", "u3", "ok", "u4", "u4"]);
    }

    #[tokio::test]
    async fn unsaved_reply_is_shown_and_chat_stays_pending() {
        let server = MockServer::start().await;
        mock_reply(&server, "Rendang dimasak berjam-jam.").await;
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let history = data.join("chat_history.json");
        let config = ChatConfig::new()
            .with_base_url(server.uri())
            .with_history_file(&history)
            .with_key_file(dir.path().join("api_key.txt"));
        CredentialStore::new(&config.key_file).save("sk-test").unwrap();

        let mut app = ChatApp::open(&config).unwrap();
        app.submit("Apa makna filosofi Rendang?").unwrap();
        let on_disk = SessionStore::new(&history).load();

        std::fs::remove_dir_all(&data).unwrap();
        std::fs::write(&data, "not a directory").unwrap();

        let mut renderer = RecordingRenderer::default();
        let err = app.respond_rendered(&mut renderer).await.unwrap_err();
        assert!(err.is_storage());
        assert!(ChatApp::renders_failure(&err));
        assert_eq!(
            renderer.messages,
            vec![Message::assistant("Rendang dimasak berjam-jam.")]
        );
        assert_eq!(renderer.errors, vec![err.to_string()]);

        assert_eq!(app.state(), ChatState::PendingResponse);
        assert_eq!(app.sessions().document(), &on_disk);
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let server = MockServer::start().await;
        mock_reply(&server, "never").await;

        let mut client = client(&server);
        client.set_api_key("");
        assert!(!client.has_api_key());
        let err = client
            .complete(&[], "Halo", None, &Model::default())
            .await
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(request_bodies(&server).await.is_empty());
    }

    #[tokio::test]
    async fn sessions_survive_reopen() {
        let server = MockServer::start().await;
        mock_reply(&server, "Toraja ada di Sulawesi Selatan.").await;
        let dir = tempfile::tempdir().unwrap();

        let first_id = {
            let mut app = open_app(&dir, &server.uri(), "sk-test");
            let mut renderer = RecordingRenderer::default();
            app.converse("Rumah Adat Toraja", &mut renderer).await.unwrap();
            let id = app.current().unwrap().id.clone();
            app.new_chat().unwrap();
            id
        };

        let app = open_app(&dir, &server.uri(), "sk-test");
        assert_eq!(app.sessions().sessions().len(), 2);
        let current = app.current().unwrap();
        assert_ne!(current.id, first_id);
        assert_eq!(current.message_count(), 1);
        assert!(app.suggestions().is_some());
        let old = &app.sessions().sessions()[1];
        assert_eq!(old.id, first_id);
        assert_eq!(old.title, "Rumah Adat Toraja");
        assert_eq!(old.message_count(), 3);
    }
}
