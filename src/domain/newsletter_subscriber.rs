use crate::domain::newsletter_subscription::NewsletterSubscription;
use async_trait::async_trait;

/// The capability the hosting subscription workflow consumes. Outcomes are
/// reported through the [`Messenger`](crate::domain::Messenger) rather than
/// a return value.
#[async_trait]
pub trait NewsletterSubscriber {
    async fn subscribe_contact(&self, subscription: NewsletterSubscription);
}
