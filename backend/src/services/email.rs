use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::{config::Config, models::greeting::GreetingSubmission, views::escape};

/// Mails each accepted greeting to the couple.
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailService {
    /// Returns None if SMTP or the couple's address is not fully configured.
    pub fn new(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let username = config.smtp_username.clone()?;
        let password = config.smtp_password.clone()?;
        let from_addr = config.smtp_from.as_deref()?;
        let to_addr = config.couple_email.as_deref()?;

        let port = config.smtp_port.unwrap_or(587);
        let creds = Credentials::new(username, password);

        let transport = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .ok()?
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()?
                .credentials(creds)
                .build()
        };

        let from: Mailbox = from_addr.parse().ok()?;
        let to: Mailbox = to_addr.parse().ok()?;

        Some(Self { transport, from, to })
    }

    fn new_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }

    pub async fn send_greeting_notice(&self, greeting: &GreetingSubmission) -> anyhow::Result<()> {
        let (subject, text, html) = greeting_notice(greeting);

        let email = Message::builder()
            .message_id(Some(self.new_message_id()))
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }
}

/// Subject, plain-text and HTML bodies of the notice.
fn greeting_notice(greeting: &GreetingSubmission) -> (String, String, String) {
    let response = if greeting.present {
        "will attend"
    } else {
        "cannot attend"
    };

    let subject = format!("New greeting: {} {}", greeting.name, response);

    let text = format!(
        "{name} {response}.\n\
        Contact: {phone}\n\n\
        {message}\n",
        name = greeting.name,
        phone = greeting.phone,
        message = greeting.message,
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head><meta charset="utf-8"><title>New greeting</title></head>
<body style="margin:0;padding:32px;background-color:#f5ede4;font-family:Georgia,serif">
  <div style="max-width:520px;margin:0 auto;background:#ffffff;border-radius:12px;padding:32px">
    <h1 style="margin:0 0 8px 0;font-size:22px;color:#8A5529">{name}</h1>
    <p style="margin:0 0 16px 0;font-size:14px;color:#64748b">{response} · {phone}</p>
    <p style="margin:0;font-size:15px;line-height:1.6;color:#334155">{message}</p>
  </div>
</body>
</html>"#,
        name = escape(&greeting.name),
        phone = escape(&greeting.phone),
        message = escape(&greeting.message),
    );

    (subject, text, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_mentions_attendance_and_escapes_html() {
        let greeting = GreetingSubmission {
            name: "Alice".into(),
            phone: "08123".into(),
            message: "<b>Congrats!</b>".into(),
            present: false,
        };
        let (subject, text, html) = greeting_notice(&greeting);

        assert_eq!(subject, "New greeting: Alice cannot attend");
        assert!(text.contains("Contact: 08123"));
        assert!(html.contains("&lt;b&gt;Congrats!&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_service_requires_couple_address() {
        let config = Config {
            smtp_host: Some("smtp.example.com".into()),
            smtp_username: Some("user".into()),
            smtp_password: Some("secret".into()),
            smtp_from: Some("Wedding RSVP <noreply@example.com>".into()),
            ..Config::default()
        };
        assert!(EmailService::new(&config).is_none());
    }
}
