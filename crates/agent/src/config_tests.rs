use super::*;
use serial_test::serial;

fn clear_env() {
    for suffix in [
        "AGENT_TOKEN",
        "FULCRUM_API_URL",
        "VM_OPERATION_INTERVAL",
        "JOB_POLL_INTERVAL",
        "METRIC_REPORT_INTERVAL",
        "OPERATION_DELAY_MIN",
        "OPERATION_DELAY_MAX",
        "ERROR_RATE",
    ] {
        std::env::remove_var(format!("TESTAGENT_{suffix}"));
    }
}

#[test]
#[serial]
fn defaults_apply_with_no_file_and_no_env() {
    clear_env();
    std::env::set_var("TESTAGENT_AGENT_TOKEN", "tok");

    let config = AgentConfig::load(None).unwrap();
    assert_eq!(config.vm_operation_interval, DEFAULT_VM_OPERATION_INTERVAL);
    assert_eq!(config.error_rate, DEFAULT_ERROR_RATE);
    clear_env();
}

#[test]
#[serial]
fn env_vars_override_defaults() {
    clear_env();
    std::env::set_var("TESTAGENT_AGENT_TOKEN", "tok");
    std::env::set_var("TESTAGENT_JOB_POLL_INTERVAL", "2s");
    std::env::set_var("TESTAGENT_ERROR_RATE", "0.25");

    let config = AgentConfig::load(None).unwrap();
    assert_eq!(config.job_poll_interval, Duration::from_secs(2));
    assert_eq!(config.error_rate, 0.25);
    clear_env();
}

#[test]
#[serial]
fn missing_token_is_invalid_input() {
    clear_env();
    let err = AgentConfig::load(None).unwrap_err();
    assert!(matches!(err, AgentError::InvalidConfig { ref field, .. } if field == "AGENT_TOKEN"));
}

#[test]
#[serial]
fn out_of_range_error_rate_is_rejected() {
    clear_env();
    std::env::set_var("TESTAGENT_AGENT_TOKEN", "tok");
    std::env::set_var("TESTAGENT_ERROR_RATE", "1.5");

    let err = AgentConfig::load(None).unwrap_err();
    assert!(matches!(err, AgentError::InvalidConfig { ref field, .. } if field == "ERROR_RATE"));
    clear_env();
}

#[test]
#[serial]
fn malformed_duration_names_the_offending_field() {
    clear_env();
    std::env::set_var("TESTAGENT_AGENT_TOKEN", "tok");
    std::env::set_var("TESTAGENT_OPERATION_DELAY_MIN", "not-a-duration");

    let err = AgentConfig::load(None).unwrap_err();
    assert!(matches!(err, AgentError::InvalidConfig { ref field, .. } if field == "OPERATION_DELAY_MIN"));
    clear_env();
}

#[test]
#[serial]
fn delay_min_greater_than_max_is_rejected() {
    clear_env();
    std::env::set_var("TESTAGENT_AGENT_TOKEN", "tok");
    std::env::set_var("TESTAGENT_OPERATION_DELAY_MIN", "5s");
    std::env::set_var("TESTAGENT_OPERATION_DELAY_MAX", "1s");

    let err = AgentConfig::load(None).unwrap_err();
    assert!(matches!(err, AgentError::InvalidConfig { ref field, .. } if field == "OPERATION_DELAY_MIN"));
    clear_env();
}
