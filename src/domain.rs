mod client_ip;
mod submitted_email;

pub use client_ip::ClientIp;
pub use submitted_email::SubmittedEmail;
