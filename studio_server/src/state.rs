//! Shared state for route handlers.

use std::sync::Arc;

use crate::auth::{AuthProvider, SessionResolver};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::payment_gateway::PaymentGateway;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: Arc<dyn SessionResolver>,
    pub gateway: Arc<dyn PaymentGateway>,
}
