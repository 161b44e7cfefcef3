use derivative::Derivative;
use getset::Getters;

/// Opaque username/password pair handed to the authenticator.
#[derive(Derivative, Clone, PartialEq, Eq, Getters)]
#[derivative(Debug)]
#[getset(get = "pub")]
pub struct Credentials {
    username: String,
    #[derivative(Debug = "ignore")]
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_password() {
        let credentials = Credentials::new("admin", "s3cr3t");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("admin"));
        assert!(!printed.contains("s3cr3t"));
    }
}
