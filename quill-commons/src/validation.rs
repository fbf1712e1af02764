use validator::ValidationError;

pub fn validate_text_present(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("text must not be blank".into()))
    } else {
        Ok(())
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.is_ascii() || username.contains(char::is_whitespace) {
        Err(ValidationError::new("charset")
            .with_message("username contains whitespace or non-ascii characters".into()))
    } else {
        Ok(())
    }
}
