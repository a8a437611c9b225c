// Library entry point for the binary and tests
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod health;

pub use config::Settings;
pub use db::Database;

use error::ConfigFault;
use health::HealthReporter;

pub struct AppState<P = Database> {
    pub settings: Settings,
    /// `None` when no database is configured
    pub db: Option<P>,
    pub health: HealthReporter,
}

impl AppState {
    /// Must be called from within a tokio runtime; the pool spawns its maintenance tasks.
    pub fn new(settings: Settings) -> Result<Self, ConfigFault> {
        let db = if settings.database_configured() {
            Some(Database::connect_lazy(&settings)?)
        } else {
            tracing::warn!("DATABASE_URL is empty, running without a database");
            None
        };

        Ok(Self::with_provider(settings, db))
    }
}

impl<P> AppState<P> {
    pub fn with_provider(settings: Settings, db: Option<P>) -> Self {
        Self {
            health: HealthReporter::new(&settings),
            settings,
            db,
        }
    }
}
