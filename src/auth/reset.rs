use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use time::Duration;

/// How long a reset token stays valid after issuance.
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

const TOKEN_BYTES: usize = 32;

/// Generate a URL-safe reset token with 32 bytes of OS entropy.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

pub fn reset_link(base_url: &str, token: &str) -> String {
    format!("{base_url}?token={token}")
}

pub fn reset_email_text(link: &str) -> String {
    format!(
        "We received a request to reset your password.\n\n\
         Open the link below to choose a new one. The link expires in 1 hour.\n\n\
         {link}\n\n\
         If you did not request this, you can ignore this email."
    )
}

pub fn reset_email_html(link: &str) -> String {
    format!(
        "<p>We received a request to reset your password.</p>\
         <p><a href=\"{link}\">Reset your password</a></p>\
         <p>The link expires in 1 hour. If you did not request this, you can \
         ignore this email.</p>"
    )
}
