//! # foundry-notify
//!
//! Match-notification rendering and delivery for the Foundry service.
//!
//! Rendering is pure ([`templates`]); delivery goes through the HTTP
//! mail-relay boundary ([`mailer`]) and is best-effort by contract.

pub mod mailer;
pub mod mock;
pub mod templates;

pub use mailer::{MailRelayClient, DEFAULT_MAIL_RELAY_URL};
pub use mock::{RecordedNotification, RecordingMailer};
pub use templates::{
    found_party_notification, lost_party_notification, score_percent, MailMessage,
};
