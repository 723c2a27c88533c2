//! Wiring shared by every action: config, token storage, API client and the
//! session, plus the guard and permission checks done before a command runs.

use crate::{
    app_lib::{config::ConfigOverrides, ApiClient, AppConfig, AppError, Notifier},
    cli::{
        globals::GlobalArgs,
        output::{ConsoleNotifier, Output},
    },
    features::auth::{
        authz::{Gate, Requirement},
        guards::GuardOutcome,
        state::SessionStore,
        storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage},
    },
    routes::Route,
};
use anyhow::{anyhow, bail, Result};
use std::sync::Arc;
use tracing::debug;

pub struct Console {
    session: SessionStore,
    output: Output,
}

impl Console {
    /// Builds the console from command-line options.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let config = AppConfig::load(globals.config.clone());
        let storage: Arc<dyn TokenStorage> = match config.session_file.as_deref() {
            Some(path) => {
                debug!(path = %path.display(), "using session file");
                Arc::new(FileTokenStorage::open(path))
            }
            None => Arc::new(MemoryTokenStorage::new()),
        };
        let output = Output::new(globals.json);
        Self::with_parts(
            config,
            storage,
            Arc::new(ConsoleNotifier::new(globals.json)),
            output,
        )
    }

    /// Builds the console around explicit parts.
    ///
    /// # Errors
    /// Returns an error if the API client cannot be built.
    pub fn with_parts(
        config: AppConfig,
        storage: Arc<dyn TokenStorage>,
        notifier: Arc<dyn Notifier>,
        output: Output,
    ) -> Result<Self> {
        let api = ApiClient::new(config, storage, notifier)?;
        Ok(Self {
            session: SessionStore::new(api),
            output,
        })
    }

    /// Console with in-memory storage, for tests and one-off runs.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn ephemeral(api_url: &str, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let config = AppConfig::load(ConfigOverrides {
            api_base_url: Some(api_url.to_string()),
            ephemeral: true,
            ..ConfigOverrides::default()
        });
        Self::with_parts(
            config,
            Arc::new(MemoryTokenStorage::new()),
            notifier,
            Output::default(),
        )
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    #[must_use]
    pub fn output(&self) -> Output {
        self.output
    }

    /// Checks the route guard, restoring the stored session first when the
    /// route needs one. Public routes use the session state as it is.
    ///
    /// # Errors
    /// Returns an error when the user must sign in or lacks access.
    pub async fn open(&mut self, route: Route) -> Result<()> {
        let guard = route.guard();
        if guard.require_auth && !self.session.state().is_initialized {
            self.session.restore().await;
        }

        match self.session.check(&guard, route.path()) {
            GuardOutcome::Allow => Ok(()),
            GuardOutcome::RedirectLogin { from } => Err(anyhow!(
                "Not signed in (needed for {from}). Run `rbac-console login` first."
            )),
            GuardOutcome::Forbidden => Err(anyhow!(
                "You do not have access to {} ({})",
                route.path(),
                Route::Forbidden.path()
            )),
            GuardOutcome::Pending(message) => Err(anyhow!("{message}")),
        }
    }

    /// Refuses an action the signed-in user is not granted.
    ///
    /// # Errors
    /// Returns an error naming the missing grant.
    pub fn require(&self, requirement: &Requirement, action: &str) -> Result<()> {
        match requirement.evaluate(&self.session.grants()) {
            Gate::Visible => Ok(()),
            Gate::Disabled | Gate::Hidden => {
                let needed: Vec<&str> = requirement
                    .permission
                    .iter()
                    .chain(requirement.permissions.iter())
                    .chain(requirement.role.iter())
                    .chain(requirement.roles.iter())
                    .map(String::as_str)
                    .collect();
                bail!("Not allowed to {action}: requires {}", needed.join(", "))
            }
        }
    }

    /// Converts a library result, expiring the session on a rejected token.
    ///
    /// # Errors
    /// Returns the library error.
    pub fn track<T>(&mut self, result: Result<T, AppError>) -> Result<T> {
        self.session.track(result).map_err(|err| {
            if err.is_session_expired() {
                anyhow!(err).context("Run `rbac-console login` to sign in again")
            } else {
                anyhow!(err)
            }
        })
    }
}
