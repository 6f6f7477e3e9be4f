//! Order confirmation email delivery.
//!
//! Uses SMTP via lettre with Askama text and HTML templates when configured;
//! otherwise confirmations are only logged.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;

use crate::config::EmailConfig;
use crate::domain::errors::MailError;
use crate::domain::order::OrderView;
use crate::domain::ports::Mailer;

/// Plain text confirmation.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct ConfirmationEmailText<'a> {
    order: &'a OrderView,
}

/// HTML confirmation.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct ConfirmationEmailHtml<'a> {
    order: &'a OrderView,
}

/// Subject and both bodies of an order confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ConfirmationEmail {
    pub fn render(order: &OrderView) -> Result<Self, MailError> {
        let text = ConfirmationEmailText { order }.render().map_err(template_error)?;
        let html = ConfirmationEmailHtml { order }.render().map_err(template_error)?;
        Ok(Self {
            subject: format!("Your order {} has been received", order.id),
            text,
            html,
        })
    }
}

fn template_error(e: askama::Error) -> MailError {
    MailError(format!("template error: {e}"))
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_order_confirmation(&self, order: &OrderView) -> Result<(), MailError> {
        let to = &order.delivery.email;
        let rendered = ConfirmationEmail::render(order)?;
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError(format!("invalid sender address: {}", self.from_address)))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError(format!("invalid recipient address: {to}")))?)
            .subject(rendered.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(rendered.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(rendered.html),
                    ),
            )
            .map_err(|e| MailError(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError(e.to_string()))?;

        log::info!("Confirmation email for order {} sent to {}", order.id, to);
        Ok(())
    }
}

/// Stand-in used when SMTP is not configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_order_confirmation(&self, order: &OrderView) -> Result<(), MailError> {
        let rendered = ConfirmationEmail::render(order)?;
        log::info!(
            "SMTP not configured; confirmation for order {} to {} not sent:\n{}",
            order.id,
            order.delivery.email,
            rendered.text
        );
        Ok(())
    }
}
