use std::env;

use crate::domain::{DEFAULT_LOAN_PERIOD_DAYS, LoanPolicy};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    pub loan_period_days: u32,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with_profile(None)
    }

    /// Like `from_env`, with a profile given on the command line taking
    /// precedence over `PROFILE`.
    pub fn from_env_with_profile(profile: Option<String>) -> Self {
        let profile = profile
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://campus_library.db?mode=rwc".to_string()
            } else {
                format!("sqlite://campus_library_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            profile,
            loan_period_days: parse_loan_period(env::var("LOAN_PERIOD_DAYS").ok().as_deref()),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }

    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy {
            loan_period_days: self.loan_period_days,
        }
    }
}

fn parse_loan_period(raw: Option<&str>) -> u32 {
    match raw.map(|v| v.trim().parse::<u32>()) {
        Some(Ok(days)) if days >= 1 => days,
        Some(_) => {
            tracing::warn!(
                "Ignoring invalid LOAN_PERIOD_DAYS, using {} days",
                DEFAULT_LOAN_PERIOD_DAYS
            );
            DEFAULT_LOAN_PERIOD_DAYS
        }
        None => DEFAULT_LOAN_PERIOD_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_period_falls_back_on_bad_input() {
        assert_eq!(parse_loan_period(None), 15);
        assert_eq!(parse_loan_period(Some("21")), 21);
        assert_eq!(parse_loan_period(Some(" 7 ")), 7);
        assert_eq!(parse_loan_period(Some("0")), 15);
        assert_eq!(parse_loan_period(Some("two weeks")), 15);
    }

    #[test]
    fn profile_names_the_database_file() {
        let config = Config::from_env_with_profile(Some("lab".to_string()));
        assert_eq!(config.profile, "lab");
        if env::var("DATABASE_URL").is_err() {
            assert_eq!(config.database_url, "sqlite://campus_library_lab.db?mode=rwc");
        }
    }
}
