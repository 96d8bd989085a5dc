use crate::configuration::MailjetSettings;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Mailjet is not configured: api_key and api_secret are required")]
    MissingCredentials,
    #[error("Failed to build the Mailjet HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// A contact record as returned by the Mailjet v3 REST API.
///
/// The API is inconsistent about whether `ID` is a number or a string
/// depending on the endpoint, so both are accepted. Any field other than
/// the id and email is kept as a contact property.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(rename = "ID", deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(flatten)]
    pub properties: HashMap<String, Value>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "{} is not a valid contact id",
            other
        ))),
    }
}

#[derive(Deserialize)]
struct ContactsResponse {
    #[serde(rename = "Data", default)]
    data: Vec<Contact>,
}

#[derive(Deserialize, Default)]
struct ErrorResponse {
    #[serde(rename = "ErrorMessage", default)]
    error_message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ManageContactRequest<'a> {
    action: &'a str,
    email: &'a str,
    properties: &'a HashMap<String, Value>,
}

#[derive(Serialize)]
struct ListRecipientRequest<'a> {
    #[serde(rename = "IsUnsubscribed")]
    is_unsubscribed: &'a str,
    #[serde(rename = "ContactID")]
    contact_id: &'a str,
    #[serde(rename = "ListID")]
    list_id: &'a str,
}

/// Interacts with the Mailjet API.
///
/// Every operation follows the same shape: build a request body, call the
/// endpoint, log an info or error event and return the contact data or an
/// empty sentinel. Remote failures are never raised to the caller.
#[derive(Debug, Clone)]
pub struct MailjetClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    api_secret: Secret<String>,
}

impl MailjetClient {
    pub fn new(settings: MailjetSettings) -> Result<Self, ConfigurationError> {
        if settings.api_key.expose_secret().trim().is_empty()
            || settings.api_secret.expose_secret().trim().is_empty()
        {
            return Err(ConfigurationError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(settings.timeout_duration())
            .build()?;

        Ok(Self {
            http_client,
            base_url: settings.base_url,
            api_key: settings.api_key,
            api_secret: settings.api_secret,
        })
    }

    /// Subscribes a contact by email to the given list. `force` re-adds the
    /// contact even when it is already present or was unsubscribed.
    ///
    /// Returns the contact record on success and `None` on any failure.
    #[tracing::instrument(name = "subscribe_contact_to_list", skip(self, properties))]
    pub async fn subscribe_contact(
        &self,
        email: &str,
        list_id: &str,
        force: bool,
        properties: &HashMap<String, Value>,
    ) -> Option<Contact> {
        let action = if force { "addforce" } else { "addnoforce" };
        let url = format!(
            "{}/v3/REST/contactslist/{}/managecontact",
            self.base_url, list_id
        );
        let body = ManageContactRequest {
            action,
            email,
            properties,
        };

        let response = match self.post(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(email, list_id, error = %e, "Failed to reach the Mailjet API");
                return None;
            }
        };

        if response.status().is_success() {
            tracing::info!(email, list_id, "Added contact to list");
            return first_contact(response).await;
        }

        let error_message = error_message_from(response).await;
        tracing::error!(email, list_id, error = %error_message, "Failed to add contact to list");
        None
    }

    /// Finds a contact by email.
    ///
    /// Returns `None` when no contact matches or the lookup fails.
    #[tracing::instrument(name = "get_contact_by_email", skip(self))]
    pub async fn get_contact(&self, email: &str) -> Option<Contact> {
        let url = format!("{}/v3/REST/contact/{}", self.base_url, email);

        let response = match self
            .http_client
            .get(&url)
            .basic_auth(
                self.api_key.expose_secret(),
                Some(self.api_secret.expose_secret()),
            )
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(email, error = %e, "Failed to reach the Mailjet API");
                return None;
            }
        };

        if response.status().is_success() {
            return first_contact(response).await;
        }

        None
    }

    /// Creates a contact with the given email and properties.
    ///
    /// An unauthorised response is logged as such instead of echoing the
    /// remote error body; either way the caller sees `None`.
    #[tracing::instrument(name = "create_contact", skip(self, properties))]
    pub async fn create_contact(
        &self,
        email: &str,
        properties: &HashMap<String, Value>,
    ) -> Option<Contact> {
        let url = format!("{}/v3/REST/contact", self.base_url);

        let mut body = serde_json::Map::new();
        for (key, value) in properties {
            body.insert(key.clone(), value.clone());
        }
        body.insert("Email".to_string(), Value::String(email.to_string()));

        let response = match self.post(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(email, error = %e, "Failed to reach the Mailjet API");
                return None;
            }
        };

        if response.status().is_success() {
            let contact = first_contact(response).await?;
            tracing::info!(email, contact_id = %contact.id, "Created contact");
            return Some(contact);
        }

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::error!(email, error = "Unauthorised", "Failed to create contact");
            return None;
        }

        let error_message = error_message_from(response).await;
        tracing::error!(email, error = %error_message, "Failed to create contact");
        None
    }

    /// Adds an existing contact to a list, clearing any unsubscribed flag.
    ///
    /// Returns whether the call succeeded.
    #[tracing::instrument(name = "add_contact_to_list", skip(self))]
    pub async fn add_contact_to_list(&self, contact_id: &str, list_id: &str) -> bool {
        let url = format!("{}/v3/REST/listrecipient", self.base_url);
        let body = ListRecipientRequest {
            is_unsubscribed: "false",
            contact_id,
            list_id,
        };

        let response = match self.post(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(contact_id, list_id, error = %e, "Failed to reach the Mailjet API");
                return false;
            }
        };

        if response.status().is_success() {
            tracing::info!(contact_id, list_id, "Added contact to list");
            return true;
        }

        let error_message = error_message_from(response).await;
        tracing::error!(contact_id, list_id, error = %error_message, "Failed to add contact to list");
        false
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http_client
            .post(url)
            .basic_auth(
                self.api_key.expose_secret(),
                Some(self.api_secret.expose_secret()),
            )
            .json(body)
            .send()
            .await
    }
}

async fn first_contact(response: reqwest::Response) -> Option<Contact> {
    match response.json::<ContactsResponse>().await {
        Ok(body) => body.data.into_iter().next(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to decode the Mailjet response body");
            None
        }
    }
}

async fn error_message_from(response: reqwest::Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error_message)
        .unwrap_or_default()
}
