use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use gift_ideas_service::{
    build_app,
    client::{
        ApiReply, ClientError, ClientValidationError, FormController, FormState, GiftApi,
        HttpGiftApi, Notifier, SubmitOutcome,
    },
    completion::{
        Completion, CompletionError, CompletionRequest, CompletionService, OpenAiCompletionService,
    },
    config::AppConfig,
    AppState, Gender, GiftRequest, GiftResponse,
};
use tokio::sync::Notify;

#[derive(Clone, Default)]
struct RecordingNotifier(Arc<Mutex<Vec<String>>>);

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

struct FakeApi {
    calls: Arc<AtomicUsize>,
    reply: Result<ApiReply, ClientError>,
    /// When set, the call signals `entered` and waits for `release`.
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeApi {
    fn replying(reply: Result<ApiReply, ClientError>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                reply,
                gate: None,
            },
            calls,
        )
    }
}

#[async_trait]
impl GiftApi for FakeApi {
    async fn generate(&self, _request: &GiftRequest) -> Result<ApiReply, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.reply.clone()
    }
}

fn filled_form() -> FormState {
    FormState {
        gender: Gender::Man,
        age: Some(30),
        price_min: Some(20),
        price_max: Some(50),
        hobbies: "chess, hiking".to_string(),
    }
}

fn ok_reply(result: &str) -> Result<ApiReply, ClientError> {
    Ok(ApiReply {
        status: 200,
        body: Some(GiftResponse::success(result)),
    })
}

#[tokio::test]
async fn invalid_form_never_reaches_the_network() {
    let (api, calls) = FakeApi::replying(ok_reply("unused"));
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(api, notifier.clone());

    let form = FormState {
        hobbies: "   ".to_string(),
        ..filled_form()
    };
    let outcome = controller.submit(&form).await;

    assert_eq!(outcome, SubmitOutcome::Invalid(ClientValidationError::MissingFields));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!controller.is_loading());
    assert_eq!(controller.result(), None);
    assert_eq!(notifier.messages(), vec!["Please fill in all fields".to_string()]);
}

#[tokio::test]
async fn successful_submit_stores_result_verbatim() {
    let text = "## Chess clock\nA tournament-grade clock.";
    let (api, calls) = FakeApi::replying(ok_reply(text));
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(api, notifier.clone());

    let outcome = controller.submit(&filled_form()).await;

    assert_eq!(outcome, SubmitOutcome::Completed(text.to_string()));
    assert_eq!(controller.result().as_deref(), Some(text));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!controller.is_loading());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn server_error_is_surfaced_and_loading_cleared() {
    let (api, _) = FakeApi::replying(Ok(ApiReply {
        status: 500,
        body: Some(GiftResponse::failure(
            "OpenAI API key not configured, please follow instructions in README.md",
        )),
    }));
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(api, notifier.clone());

    let outcome = controller.submit(&filled_form()).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Server(_))));
    assert!(!controller.is_loading());
    assert_eq!(controller.result(), None);
    assert_eq!(
        notifier.messages(),
        vec!["OpenAI API key not configured, please follow instructions in README.md".to_string()]
    );
}

#[tokio::test]
async fn transport_failure_is_surfaced_and_loading_cleared() {
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(HttpGiftApi::new("http://127.0.0.1:1"), notifier.clone());

    let outcome = controller.submit(&filled_form()).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Transport(_))));
    assert!(!controller.is_loading());
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn overlapping_submission_is_dropped_while_in_flight() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let api = FakeApi {
        calls: calls.clone(),
        reply: ok_reply("gift ideas"),
        gate: Some((entered.clone(), release.clone())),
    };
    let controller = Arc::new(FormController::new(api, RecordingNotifier::default()));

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit(&filled_form()).await })
    };

    entered.notified().await;
    assert!(controller.is_loading());
    assert_eq!(controller.submit(&filled_form()).await, SubmitOutcome::Ignored);

    release.notify_one();
    let outcome = first.await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Completed("gift ideas".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!controller.is_loading());
    assert_eq!(controller.result().as_deref(), Some("gift ideas"));
}

struct CannedCompletion;

#[async_trait]
impl CompletionService for CannedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        Ok(Completion::from_texts([format!("ideas for: {}", request.user)]))
    }
}

async fn spawn_gift_server(completion: Option<Arc<dyn CompletionService>>) -> String {
    let config = AppConfig {
        openai_api_key: completion.as_ref().map(|_| "sk-test".to_string()),
        ..AppConfig::default()
    };
    let app = build_app(AppState::new(config, completion));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn round_trip_against_real_server() {
    let completion = Arc::new(CannedCompletion) as Arc<dyn CompletionService>;
    let server = spawn_gift_server(Some(completion)).await;
    let controller = FormController::new(HttpGiftApi::new(server), RecordingNotifier::default());

    let outcome = controller.submit(&filled_form()).await;

    let expected = "ideas for: Suggest 3 Christmas gift ideas between $20 and $50 for a 30 year old man that is into chess, hiking. Format the response with clear headings and descriptions.";
    assert_eq!(outcome, SubmitOutcome::Completed(expected.to_string()));
    assert_eq!(controller.result().as_deref(), Some(expected));
}

#[tokio::test]
async fn round_trip_surfaces_configuration_error() {
    let server = spawn_gift_server(None).await;
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(HttpGiftApi::new(server), notifier.clone());

    let outcome = controller.submit(&filled_form()).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Server(_))));
    assert_eq!(
        notifier.messages(),
        vec!["OpenAI API key not configured, please follow instructions in README.md".to_string()]
    );
}

async fn empty_service_unavailable() -> (http::StatusCode, &'static str) {
    (http::StatusCode::SERVICE_UNAVAILABLE, "")
}

#[tokio::test]
async fn round_trip_empty_upstream_error_falls_back_to_status_message() {
    let upstream = axum::Router::new()
        .route("/v1/chat/completions", axum::routing::post(empty_service_unavailable));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let upstream_addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let service = OpenAiCompletionService::new("sk-test")
        .with_base_url(format!("http://{}/v1", upstream_addr));
    let server = spawn_gift_server(Some(Arc::new(service) as Arc<dyn CompletionService>)).await;
    let notifier = RecordingNotifier::default();
    let controller = FormController::new(HttpGiftApi::new(server), notifier.clone());

    let outcome = controller.submit(&filled_form()).await;

    assert_eq!(outcome, SubmitOutcome::Failed(ClientError::Status(503)));
    assert_eq!(notifier.messages(), vec!["Request failed with status 503".to_string()]);
    assert!(!controller.is_loading());
}
