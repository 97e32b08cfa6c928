use std::collections::BTreeMap;

use log::error;

/// Alert raised when a VAA names a guardian set this node does not know.
pub const UNKNOWN_GUARDIAN_SET_ALERT: &str = "guardian_set_not_found";

/// Hands operational alerts to whatever pages a human.
///
/// Called from verification, so implementations must return quickly, e.g. by queueing.
pub trait Alerter: Send + Sync {
    fn send_alert(&self, key: &str, context: &BTreeMap<String, String>) -> anyhow::Result<()>;
}

/// Writes alerts to the log. For deployments without an alert pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn send_alert(&self, key: &str, context: &BTreeMap<String, String>) -> anyhow::Result<()> {
        error!("alert {key}: {context:?}");
        Ok(())
    }
}
