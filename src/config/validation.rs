use crate::config::types::{
    Config, CorpusConfig, CorpusMode, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filter)?;
    validate_corpus_config(&config.corpus)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl scope: seeds and target domain
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
    }

    validate_target_domain(&config.target_domain)
}

/// Validates filter thresholds
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.max_url_length == 0 {
        return Err(ConfigError::Validation(
            "max_url_length must be >= 1".to_string(),
        ));
    }

    if config.recent_traps_capacity == 0 {
        return Err(ConfigError::Validation(
            "recent_traps_capacity must be >= 1".to_string(),
        ));
    }

    if config.calendar_params.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "calendar_params cannot contain empty names".to_string(),
        ));
    }

    Ok(())
}

/// Validates the corpus source
fn validate_corpus_config(config: &CorpusConfig) -> Result<(), ConfigError> {
    if config.mode == CorpusMode::Cache
        && config.cache_dir.as_deref().map_or(true, |d| d.is_empty())
    {
        return Err(ConfigError::Validation(
            "cache mode requires cache_dir".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.frontier_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "frontier_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target domain suffix
///
/// A single leading dot is allowed (".ics.uci.edu" restricts to subdomains).
fn validate_target_domain(domain: &str) -> Result<(), ConfigError> {
    let bare = domain.strip_prefix('.').unwrap_or(domain);

    if bare.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Target domain cannot be empty".to_string(),
        ));
    }

    if !bare
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if bare.starts_with('.') || bare.ends_with('.') || bare.starts_with('-') || bare.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if bare.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !bare.contains('.') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must contain at least one dot (e.g., 'uci.edu')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
