//! Argument value parsers used by clap.

use std::net::IpAddr;
use std::path::PathBuf;

/// Port must parse as `u16` and be non-zero
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// The path must name an existing, readable file
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// The path must name an existing file, or be `-` for stdin
pub fn validate_input_file_path(path_str: &str) -> Result<PathBuf, String> {
    if path_str == "-" {
        return Ok(PathBuf::from(path_str));
    }

    let path = PathBuf::from(path_str);
    if !path.is_file() {
        return Err(format!("Input file does not exist: '{}'", path_str));
    }
    Ok(path)
}

/// Accepts IP addresses, `localhost` and DNS hostnames
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.parse::<IpAddr>().is_ok() || host == "localhost" {
        return Ok(host.to_string());
    }

    // Looks like a dotted quad but did not parse as one
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    let valid_hostname = host
        .split('.')
        .all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if !valid_hostname {
        return Err(format!("Invalid host address: '{}'", host_str));
    }

    Ok(host.to_string())
}
