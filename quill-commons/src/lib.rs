pub mod validation;

pub mod data_structures {
    use uuid::Uuid;
    use validator::Validate;

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct PostFormData {
        #[validate(custom(function = "crate::validation::validate_text_present"))]
        pub text: String,
        pub group: Option<Uuid>,
        pub image: Option<String>,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct CommentFormData {
        #[validate(custom(function = "crate::validation::validate_text_present"))]
        pub text: String,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct SignupFormData {
        #[validate(
            length(min = 1),
            custom(function = "crate::validation::validate_username")
        )]
        pub username: String,
        #[validate(email(message = "enter a valid email address"))]
        pub email: String,
        #[validate(length(min = 1, message = "password must not be empty"))]
        pub password1: String,
        #[validate(length(min = 1, message = "password must not be empty"))]
        pub password2: String,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug)]
    pub struct LoginFormData {
        pub username: String,
        pub password: String,
    }
}
