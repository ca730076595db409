use crate::{
    dispatch::{MailTransport, TransportError},
    domain::RecipientEmail,
};
use async_trait::async_trait;
use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

/// HTTP mail gateway client. The request timeout doubles as the per-send
/// timeout of the dispatch loop.
#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: RecipientEmail,
    authorization_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: RecipientEmail,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        text_content: &str,
    ) -> Result<(), Error> {
        let url = format!("{}/email", &self.base_url);
        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            text_body: text_content,
        };

        self.http_client
            .post(&url)
            .header(
                "X-Gateway-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl MailTransport for EmailClient {
    async fn send(
        &self,
        to: &RecipientEmail,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        self.send_email(to, subject, body)
            .await
            .map_err(|e| anyhow::Error::from(e).into())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}
