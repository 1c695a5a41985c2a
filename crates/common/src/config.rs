use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_env() -> Self {
        match env_or("ENVIRONMENT", "development").to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Read a string variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a variable. Unset or unparsable values yield `default`.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        unsafe { env::set_var("ENVIRONMENT", "PROD") };
        assert_eq!(Environment::from_env(), Environment::Production);

        unsafe { env::set_var("ENVIRONMENT", "staging") };
        assert_eq!(Environment::from_env(), Environment::Development);

        unsafe { env::remove_var("ENVIRONMENT") };
        assert_eq!(Environment::from_env(), Environment::Development);
    }

    #[test]
    #[serial]
    fn test_env_parse_falls_back_on_garbage() {
        unsafe { env::set_var("COMMON_TEST_NUMBER", " 42 ") };
        assert_eq!(env_parse("COMMON_TEST_NUMBER", 7u32), 42);

        unsafe { env::set_var("COMMON_TEST_NUMBER", "forty-two") };
        assert_eq!(env_parse("COMMON_TEST_NUMBER", 7u32), 7);

        unsafe { env::remove_var("COMMON_TEST_NUMBER") };
        assert_eq!(env_parse("COMMON_TEST_NUMBER", 7u32), 7);
    }

    #[test]
    #[serial]
    fn test_env_flag() {
        unsafe { env::set_var("COMMON_TEST_FLAG", "off") };
        assert!(!env_flag("COMMON_TEST_FLAG", true));

        unsafe { env::set_var("COMMON_TEST_FLAG", "Yes") };
        assert!(env_flag("COMMON_TEST_FLAG", false));

        unsafe { env::set_var("COMMON_TEST_FLAG", "maybe") };
        assert!(env_flag("COMMON_TEST_FLAG", true));

        unsafe { env::remove_var("COMMON_TEST_FLAG") };
        assert!(!env_flag("COMMON_TEST_FLAG", false));
    }
}
