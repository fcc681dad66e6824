use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
    time::Duration,
};

use moodify::{
    api::session::session_cookie,
    config::{
        self, Config, DEFAULT_API_URL, DEFAULT_FRONTEND_URL, DEFAULT_SERVER_ADDRESS,
        MAX_SESSION_LIFETIME_DAYS, SessionBackend,
    },
    error::ConfigError,
};

/// Every variable `Config::from_env` looks at.
const VARS: &[&str] = &[
    "SPOTIFY_API_AUTH_CLIENT_ID",
    "SPOTIFY_API_AUTH_CLIENT_SECRET",
    "SPOTIFY_API_REDIRECT_URI",
    "SERVER_ADDRESS",
    "SPOTIFY_API_AUTH_SCOPE",
    "SPOTIFY_API_AUTH_URL",
    "SPOTIFY_API_TOKEN_URL",
    "SPOTIFY_API_URL",
    "SPOTIFY_REQUEST_TIMEOUT",
    "FRONTEND_URL",
    "CORS_ORIGINS",
    "SESSION_STORE",
    "SESSION_STORE_PATH",
    "SESSION_COOKIE_SECURE",
    "SESSION_LIFETIME_DAYS",
    "SEARCH_CONCURRENCY",
];

const CLIENT: &[(&str, &str)] = &[
    ("SPOTIFY_API_AUTH_CLIENT_ID", "id"),
    ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
    ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:5000/callback"),
];

// The environment is process-wide, so tests touching it run one at a time
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Restores one variable to its previous value when dropped.
struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

/// Holds the environment exactly as `vars` describes until dropped.
struct TestEnv {
    _guards: Vec<EnvGuard>,
    _lock: MutexGuard<'static, ()>,
}

fn env(vars: &[(&str, &str)]) -> TestEnv {
    let lock = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let guards = VARS
        .iter()
        .map(|&key| {
            let old = std::env::var_os(key);
            match vars.iter().find(|(k, _)| *k == key) {
                Some((_, value)) => unsafe { std::env::set_var(key, value) },
                None => unsafe { std::env::remove_var(key) },
            }
            EnvGuard { key, old }
        })
        .collect();

    TestEnv {
        _guards: guards,
        _lock: lock,
    }
}

fn with_client(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    CLIENT.iter().chain(extra).copied().collect()
}

fn invalid_name(result: Result<Config, ConfigError>) -> &'static str {
    match result {
        Err(ConfigError::Invalid { name, .. }) => name,
        other => panic!("expected an invalid value, got {:?}", other),
    }
}

#[test]
fn test_defaults() {
    let _env = env(CLIENT);

    let config = Config::from_env().unwrap();

    assert_eq!(config.client_id, "id");
    assert_eq!(config.client_secret, "secret");
    assert_eq!(config.redirect_uri, "http://127.0.0.1:5000/callback");
    assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.frontend_url, DEFAULT_FRONTEND_URL);
    assert_eq!(config.session_backend, SessionBackend::Memory);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.session_lifetime_days, 31);
    assert_eq!(config.search_concurrency, 4);
    assert!(!config.cookie_secure);
    assert_eq!(config.cors_origins.len(), 2);
}

#[test]
fn test_each_client_variable_is_required() {
    for (missing, _) in CLIENT {
        let vars: Vec<_> = CLIENT.iter().filter(|(k, _)| k != missing).copied().collect();
        let _env = env(&vars);

        match Config::from_env() {
            Err(ConfigError::Missing(name)) => assert_eq!(name, *missing),
            other => panic!("expected {} to be missing, got {:?}", missing, other),
        }
    }
}

#[test]
fn test_blank_client_variable_counts_as_missing() {
    let _env = env(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "  "),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:5000/callback"),
    ]);

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))
    ));
}

#[test]
fn test_overrides() {
    let _env = env(&with_client(&[
        ("SERVER_ADDRESS", "0.0.0.0:8080"),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
        ("SPOTIFY_REQUEST_TIMEOUT", "3"),
        ("FRONTEND_URL", "https://moodify.example"),
        ("CORS_ORIGINS", "https://a.example, ,https://b.example"),
        ("SESSION_COOKIE_SECURE", "true"),
        ("SESSION_LIFETIME_DAYS", "7"),
        ("SEARCH_CONCURRENCY", "0"),
    ]));

    let config = Config::from_env().unwrap();

    assert_eq!(config.server_address, "0.0.0.0:8080");
    // Trailing slash is dropped so paths can be appended
    assert_eq!(config.api_url, "http://localhost:9000/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.frontend_url, "https://moodify.example");
    assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    assert!(config.cookie_secure);
    assert_eq!(config.session_lifetime_days, 7);
    // At least one search always runs
    assert_eq!(config.search_concurrency, 1);
}

#[test]
fn test_file_session_store() {
    let _env = env(&with_client(&[
        ("SESSION_STORE", "file"),
        ("SESSION_STORE_PATH", "/tmp/moodify/sessions.json"),
    ]));

    let config = Config::from_env().unwrap();

    assert_eq!(
        config.session_backend,
        SessionBackend::File(PathBuf::from("/tmp/moodify/sessions.json"))
    );
}

#[test]
fn test_file_session_store_default_path() {
    let _env = env(&with_client(&[("SESSION_STORE", "file")]));

    match Config::from_env().unwrap().session_backend {
        SessionBackend::File(path) => assert!(path.ends_with("moodify/sessions.json")),
        other => panic!("expected file backend, got {:?}", other),
    }
}

#[test]
fn test_invalid_values() {
    let cases: &[(&'static str, &'static str)] = &[
        ("SESSION_STORE", "redis"),
        ("SPOTIFY_REQUEST_TIMEOUT", "ten"),
        ("SESSION_COOKIE_SECURE", "yes please"),
        ("SEARCH_CONCURRENCY", "-2"),
        ("SESSION_LIFETIME_DAYS", "a month"),
    ];

    for &(name, value) in cases {
        let _env = env(&with_client(&[(name, value)]));
        assert_eq!(invalid_name(Config::from_env()), name);
    }
}

#[test]
fn test_session_lifetime_bounds() {
    for value in ["0", "-1", "401", "9223372036854775807"] {
        let _env = env(&with_client(&[("SESSION_LIFETIME_DAYS", value)]));
        assert_eq!(invalid_name(Config::from_env()), "SESSION_LIFETIME_DAYS");
    }

    for (value, days) in [("1", 1), ("400", MAX_SESSION_LIFETIME_DAYS)] {
        let _env = env(&with_client(&[("SESSION_LIFETIME_DAYS", value)]));
        assert_eq!(Config::from_env().unwrap().session_lifetime_days, days);
    }
}

#[test]
fn test_session_cookie_lifetime_is_clamped() {
    let mut config = Config::new("id", "secret", "http://127.0.0.1:5000/callback");

    config.session_lifetime_days = 31;
    assert!(session_cookie(&config, "abc").contains("Max-Age=2678400"));

    // Out-of-range values set in code do not panic
    config.session_lifetime_days = i64::MAX;
    assert!(session_cookie(&config, "abc").contains("Max-Age=34560000"));

    config.session_lifetime_days = 0;
    assert!(session_cookie(&config, "abc").contains("Max-Age=86400"));
}

#[test]
fn test_load_env_runs_without_a_runtime() {
    // Variables already set are kept, so the client settings survive
    let _env = env(CLIENT);

    assert!(config::load_env().is_ok());
    assert_eq!(Config::from_env().unwrap().client_id, "id");
}
