//! SMTP delivery of operator notifications.
//!
//! The only mail this service carries is the super-admin login code, sent as
//! plain text to the fixed operator address.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors from building or sending a message.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// An address that lettre refused to parse.
    #[error("Invalid email address: {0}")]
    BadAddress(String),
}

/// Async SMTP mailer over STARTTLS.
#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Build the mailer from SMTP settings.
    ///
    /// # Errors
    ///
    /// Returns `SmtpError` when the relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.expose_secret().to_owned(),
            ))
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Mail a super-admin login code to the operator address.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` when the message cannot be built or delivered.
    pub async fn send_verification_code(
        &self,
        to: &str,
        account_name: &str,
        code: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "A super-admin login was requested for account \"{account_name}\".\n\
             \n\
             Verification code: {code}\n\
             \n\
             The code expires in 10 minutes. If you did not request this login,\n\
             disable the account and rotate its password."
        );

        let message = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(to)?)
            .subject("Back-office super-admin verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        tracing::info!(to = %to, "verification code mailed to operator");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<lettre::message::Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::BadAddress(address.to_owned()))
}

/// A fresh 6-digit verification code.
#[must_use]
pub fn generate_verification_code() -> String {
    use rand::Rng;
    rand::rng().random_range(100_000u32..1_000_000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
            // no leading zero: codes sit in 100000..=999999
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..20).map(|_| generate_verification_code()).collect();
        assert!(codes.len() > 1);
    }
}
