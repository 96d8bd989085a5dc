use newsletter_mailjet::adapters::mailjet_client::MailjetClient;
use newsletter_mailjet::adapters::mailjet_subscriber::MailjetSubscriber;
use newsletter_mailjet::configuration::{get_configuration, MailjetSettings};
use newsletter_mailjet::domain::messenger::Messenger;
use newsletter_mailjet::domain::newsletter_subscription::NewsletterSubscription;
use newsletter_mailjet::domain::subscriber_email::SubscriberEmail;
use newsletter_mailjet::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter, std::io::sink);
        init_subscriber(subscriber);
    }
});

#[derive(Debug, Clone, PartialEq)]
pub enum UserMessage {
    Status(String),
    Error(String),
}

/// Records the user-facing messages a subscription attempt produces.
#[derive(Default)]
pub struct RecordingMessenger {
    messages: Mutex<Vec<UserMessage>>,
}

impl RecordingMessenger {
    pub fn messages(&self) -> Vec<UserMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl Messenger for RecordingMessenger {
    fn add_status(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(UserMessage::Status(message.to_string()));
    }

    fn add_error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(UserMessage::Error(message.to_string()));
    }
}

/// Collects the log records a test emits so they can be asserted on.
#[derive(Clone, Default)]
pub struct LogSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogSink {
    pub fn contents(&self) -> String {
        String::from_utf8(self.buffer.lock().unwrap().clone())
            .expect("Log records were not valid UTF-8")
    }

    /// The number of error-level records captured; bunyan encodes the
    /// error level as 50.
    pub fn error_records(&self) -> usize {
        self.contents().matches("\"level\":50").count()
    }
}

impl std::io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub struct TestApp {
    pub mailjet_server: MockServer,
    pub subscriber: MailjetSubscriber,
    pub messenger: Arc<RecordingMessenger>,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    // Launch a mock server to stand in for the Mailjet API
    let mailjet_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use the mock server as the Mailjet API
        c.mailjet.base_url = mailjet_server.uri();
        c
    };

    let client =
        MailjetClient::new(configuration.mailjet).expect("Failed to build the Mailjet client.");
    let messenger = Arc::new(RecordingMessenger::default());
    let subscriber = MailjetSubscriber::new(client, messenger.clone());

    TestApp {
        mailjet_server,
        subscriber,
        messenger,
    }
}

pub fn mailjet_settings(base_url: String) -> MailjetSettings {
    MailjetSettings {
        api_key: Secret::new("test-key".to_string()),
        api_secret: Secret::new("test-secret".to_string()),
        base_url,
        timeout_milliseconds: 200,
    }
}

pub fn subscription(email: &str, data: serde_json::Value) -> NewsletterSubscription {
    let data = data
        .as_object()
        .expect("Subscription data must be a JSON object")
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    NewsletterSubscription::new(
        SubscriberEmail::parse(email.to_string()).expect("Failed to parse the test email."),
        data,
    )
}
