use validator::ValidateEmail;

/// Email address of a user registering with the site. Must be instantiated
/// with `UserEmail::parse`.
#[derive(Debug, Clone)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        ValidateEmail::validate_email(&email)
            .then_some(Self(email.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str { &self.0 }
}
