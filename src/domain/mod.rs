mod attempt_status;
mod mailing;
mod mailing_status;
mod message;
mod message_subject;
mod recipient;
mod recipient_email;

pub use attempt_status::AttemptStatus;
pub use mailing::Mailing;
pub use mailing_status::MailingStatus;
pub use message::MessageContent;
pub use message_subject::MessageSubject;
pub use recipient::Recipient;
pub use recipient_email::RecipientEmail;
