pub mod mailjet_client;
pub mod mailjet_subscriber;

pub use crate::adapters::mailjet_client::{ConfigurationError, Contact, MailjetClient};
pub use crate::adapters::mailjet_subscriber::MailjetSubscriber;
