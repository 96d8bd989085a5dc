use crate::domain::subscriber_email::SubscriberEmail;
use serde_json::Value;
use std::collections::HashMap;

/// The inbound unit of work: an email address plus the key/value data the
/// subscription form collected, including the target list id under `list_id`.
#[derive(Debug, Clone)]
pub struct NewsletterSubscription {
    email: SubscriberEmail,
    data: HashMap<String, Value>,
}

impl NewsletterSubscription {
    pub fn new(email: SubscriberEmail, data: HashMap<String, Value>) -> Self {
        Self { email, data }
    }

    pub fn email(&self) -> &SubscriberEmail {
        &self.email
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }
}
