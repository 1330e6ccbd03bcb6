use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb_table: String,
    pub environment: String,
    pub aws_region: String,
    pub jwt_secret: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Config {
            dynamodb_table: env::var("DYNAMODB_TABLE")
                .unwrap_or_else(|_| "task-manager-dev".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "defaultsecret".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_always_yields_a_usable_config() {
        let config = Config::from_env().unwrap();
        assert!(!config.dynamodb_table.is_empty());
        assert!(!config.jwt_secret.is_empty());
        assert!(config.port > 0);
    }
}
