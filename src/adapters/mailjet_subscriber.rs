use crate::adapters::mailjet_client::MailjetClient;
use crate::domain::messenger::Messenger;
use crate::domain::newsletter_subscriber::NewsletterSubscriber;
use crate::domain::newsletter_subscription::NewsletterSubscription;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const SUBSCRIPTION_CONFIRMED_MESSAGE: &str = "Thank you for subscribing to our newsletter.";
pub const SUBSCRIPTION_FAILED_MESSAGE: &str =
    "There was a problem with your subscription. Please contact our team to remedy the problem.";

/// Subscribes contacts to a Mailjet list on behalf of the hosting
/// newsletter workflow.
pub struct MailjetSubscriber {
    client: MailjetClient,
    messenger: Arc<dyn Messenger>,
}

impl MailjetSubscriber {
    pub fn new(client: MailjetClient, messenger: Arc<dyn Messenger>) -> Self {
        Self { client, messenger }
    }
}

#[async_trait]
impl NewsletterSubscriber for MailjetSubscriber {
    #[tracing::instrument(
        name = "subscribe_contact",
        skip(self, subscription),
        fields(subscriber_email = %subscription.email())
    )]
    async fn subscribe_contact(&self, subscription: NewsletterSubscription) {
        let mut data = subscription.data().clone();
        let list_id = data.remove("list_id").and_then(list_identifier);

        let Some(list_id) = list_id else {
            tracing::error!(
                email = %subscription.email(),
                "No list found in the subscription data"
            );
            self.messenger.add_error(SUBSCRIPTION_FAILED_MESSAGE);
            return;
        };

        // The keys left over after extracting the list id are the contact
        // properties collected by the subscription form.
        let contact = self
            .client
            .subscribe_contact(subscription.email().inner(), &list_id, true, &data)
            .await;

        if contact.is_none() {
            self.messenger.add_error(SUBSCRIPTION_FAILED_MESSAGE);
            return;
        }

        self.messenger.add_status(SUBSCRIPTION_CONFIRMED_MESSAGE);
    }
}

// List ids arrive as strings or numbers depending on how the form stores
// them. Zero is not a valid list id and counts as missing.
fn list_identifier(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() && s != "0" => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
