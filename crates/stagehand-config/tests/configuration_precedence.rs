//! Behavioural tests for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use stagehand_config::{
    CommitPolicy, Config, SocketEndpoint, default_log_filter, default_log_format,
    default_socket_endpoint, default_store_root,
};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const SOCKET_ENV_VAR: &str = "STAGEHAND_DAEMON_SOCKET";

struct Harness {
    temp_dir: TempDir,
    file_lines: RefCell<Vec<String>>,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Result<Config, String>>>,
    _env_guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env_guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        Self {
            temp_dir,
            file_lines: RefCell::new(Vec::new()),
            cli_args: RefCell::new(vec![OsString::from("stagehandd")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            _env_guard: env_guard,
        }
    }

    fn push_file_line(&self, line: String) {
        self.file_lines.borrow_mut().push(line);
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Restored in `Drop`; the mutex keeps scenarios from racing.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) -> Config {
        if self.loaded.borrow().is_none() {
            let mut args = self.cli_args.borrow().clone();
            let lines = self.file_lines.borrow();
            if !lines.is_empty() {
                let path = self.temp_dir.path().join("stagehand.toml");
                if let Err(error) = fs::write(&path, lines.join("\n")) {
                    panic!("failed to write configuration: {error}");
                }
                args.insert(1, OsString::from("--config-path"));
                args.insert(2, path.into_os_string());
            }
            let result = Config::load_from_iter(args).map_err(|error| error.to_string());
            *self.loaded.borrow_mut() = Some(result);
        }

        match self.loaded.borrow().as_ref() {
            Some(Ok(config)) => config.clone(),
            Some(Err(error)) => panic!("configuration failed to load: {error}"),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(previous) => unsafe { std::env::set_var(&key, previous) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

fn parse_endpoint(socket: &str) -> SocketEndpoint {
    match socket.trim_matches('"').parse::<SocketEndpoint>() {
        Ok(endpoint) => endpoint,
        Err(error) => panic!("invalid socket '{socket}': {error}"),
    }
}

fn toml_endpoint(endpoint: &SocketEndpoint) -> String {
    match endpoint {
        SocketEndpoint::Unix { path } => {
            format!("daemon_socket = {{ transport = \"unix\", path = \"{path}\" }}")
        }
        SocketEndpoint::Tcp { host, port } => format!(
            "daemon_socket = {{ transport = \"tcp\", host = \"{host}\", port = {port} }}"
        ),
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the daemon socket to {socket}")]
fn given_configuration_file(harness: &Harness, socket: String) {
    let endpoint = parse_endpoint(&socket);
    harness.push_file_line(toml_endpoint(&endpoint));
}

#[given("a configuration file writing the daemon socket URL {socket}")]
fn given_configuration_file_url(harness: &Harness, socket: String) {
    harness.push_file_line(format!("daemon_socket = \"{}\"", socket.trim_matches('"')));
}

#[given("a configuration file setting the commit policy to {policy}")]
fn given_commit_policy_file(harness: &Harness, policy: String) {
    harness.push_file_line(format!("commit_policy = \"{}\"", policy.trim_matches('"')));
}

#[given("the environment overrides the daemon socket to {socket}")]
fn given_environment_override(harness: &Harness, socket: String) {
    harness.set_env(SOCKET_ENV_VAR, socket.trim_matches('"'));
}

#[when("the CLI sets the daemon socket to {socket}")]
fn when_cli_override(harness: &Harness, socket: String) {
    harness.push_cli_arg("--daemon-socket");
    harness.push_cli_arg(socket.trim_matches('"'));
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    let _ = harness.load();
}

#[then("loading the configuration resolves the daemon socket to {socket}")]
fn then_resolved_socket(harness: &Harness, socket: String) {
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &parse_endpoint(&socket));
}

#[then("loading the configuration resolves the commit policy to {policy}")]
fn then_resolved_policy(harness: &Harness, policy: String) {
    let config = harness.load();
    let expected = CommitPolicy::from_str(policy.trim_matches('"')).expect("valid policy");
    assert_eq!(config.commit_policy(), expected);
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.load();
    assert_eq!(config.daemon_socket(), &default_socket_endpoint());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config.store_root(), &default_store_root());
    assert_eq!(config.fallback_capability(), None);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Built-in defaults apply without overrides"
)]
fn defaults_apply(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Configuration file overrides defaults"
)]
fn file_overrides_defaults(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Environment overrides the configuration file"
)]
fn environment_overrides_file(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Command line overrides the environment"
)]
fn cli_overrides_environment(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Configuration file selects the commit policy"
)]
fn file_selects_commit_policy(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Configuration file accepts the socket URL form"
)]
fn file_accepts_socket_url(#[from(harness)] harness: Harness) {
    drop(harness);
}
