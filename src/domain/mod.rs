pub mod messenger;
pub mod newsletter_subscriber;
pub mod newsletter_subscription;
pub mod subscriber_email;

pub use crate::domain::messenger::Messenger;
pub use crate::domain::newsletter_subscriber::NewsletterSubscriber;
pub use crate::domain::newsletter_subscription::NewsletterSubscription;
pub use crate::domain::subscriber_email::SubscriberEmail;
