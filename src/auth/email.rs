use crate::util::env::parse_var;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Environment Error")]
    Env(#[from] dotenvy::Error),
    #[error("Mail Error: {0}")]
    Mail(#[from] lettre::error::Error),
    #[error("Address Parse Error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("SMTP Error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub fn send_email_raw(to: String, subject: String, body: String) -> Result<(), MailError> {
    let from: Mailbox = dotenvy::var("EMAIL_FROM")?.parse()?;

    let email = Message::builder()
        .from(from)
        .to(to.parse()?)
        .subject(subject)
        .body(body)?;

    let username = dotenvy::var("SMTP_USERNAME")?;
    let password = dotenvy::var("SMTP_PASSWORD")?;
    let host = dotenvy::var("SMTP_HOST")?;
    let creds = Credentials::new(username, password);

    let mailer = SmtpTransport::starttls_relay(&host)?
        .port(parse_var("SMTP_PORT").unwrap_or(587))
        .credentials(creds)
        .build();

    mailer.send(&email)?;

    Ok(())
}

pub fn send_confirmation_email(to: String, code: &str) -> Result<(), MailError> {
    send_email_raw(
        to,
        "Confirm your registration".to_string(),
        format!(
            "Hi,\n\nthank you for registering with Helpy.\n\
             Your confirmation code is: {code}\n\
             Enter it on the confirmation page to complete your registration.\n\n\
             If you did not request this registration, ignore this email.\n\n\
             Thanks,\nthe Helpy team"
        ),
    )
}

pub fn send_password_reset_email(to: String, code: &str) -> Result<(), MailError> {
    send_email_raw(
        to,
        "Password reset".to_string(),
        format!(
            "Hi,\n\nyou requested a password reset.\n\
             Your reset code is: {code}\n\n\
             Enter this code on the reset page to choose a new password.\n\n\
             If you did not request this reset, ignore this email.\n\n\
             Thanks,\nthe Helpy team"
        ),
    )
}
