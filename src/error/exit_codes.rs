use crate::error::FetchError;

pub fn get_exit_code(error: &FetchError) -> i32 {
    match error {
        FetchError::MissingCredential(_)
        | FetchError::ConfigError(_)
        | FetchError::InvalidConfig(_)
        | FetchError::ValidationError(_) => 2,

        FetchError::NoInstallerFound { .. } | FetchError::MissingField(_) => 4,

        FetchError::Authentication(_) => 5,

        FetchError::PermissionDenied(_) => 13,

        FetchError::NetworkError(_) | FetchError::Http(_) | FetchError::Api { .. } => 20,

        _ => 1,
    }
}
