use anyhow::anyhow;
use fses_config::EmailConfig;
use fses_core::AppError;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn reset_link(&self, code: &str) -> String {
        format!(
            "{}/reset-password?code={}",
            self.config.frontend_url.trim_end_matches('/'),
            code
        )
    }

    /// Mails `code` and a link that pre-fills it on the frontend's reset page.
    #[instrument(skip(self, code))]
    pub async fn send_reset_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), AppError> {
        let link = self.reset_link(code);

        let text_body = format!(
            "Hello {},\n\n\
             Your password reset code is: {}\n\n\
             Click here to reset your password: {}\n\n\
             If you didn't request this, you can ignore this email.\n\n\
             FSES",
            username, code, link
        );
        let html_body = reset_code_template(username, code, &link);

        self.send_email(to_email, "FSES Password Reset", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            debug!(to = %to_email, subject = %subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| AppError::internal(anyhow!("Failed to create SMTP relay: {}", e)))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

fn reset_code_template(username: &str, code: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>FSES Password Reset</title></head>
<body style="font-family: Arial, sans-serif; color: #333333;">
    <h2>Password Reset</h2>
    <p>Hello <strong>{}</strong>,</p>
    <p>Your reset code is:</p>
    <p style="font-family: monospace; font-size: 16px; background: #f4f4f4; padding: 10px;">{}</p>
    <p><a href="{}">Reset your password</a></p>
    <p style="font-size: 12px; color: #999999;">If you didn't request this, you can ignore this email.</p>
</body>
</html>"#,
        username, code, link
    )
}
