//! Script execution façade
//!
//! Wraps caller scripts in the envelope, ships them through the
//! [`Mailbox`], and decodes the result.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::envelope::{decode_script_result, wrap_script, wrap_script_with_params};
use crate::error::{BridgeError, Result};
use crate::mailbox::{CancelToken, Command, Mailbox};

/// Runs scripts in the host and returns decoded JSON.
///
/// Each call is independent: `Idle → Submitting → Waiting → outcome`.
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    mailbox: Mailbox,
}

impl ScriptExecutor {
    pub fn new(mailbox: Mailbox) -> Self {
        Self { mailbox }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Run a script body. The body may `return` any JSON-serializable value.
    pub fn execute(&self, body: &str) -> Result<Value> {
        self.execute_with_cancel(body, &CancelToken::new())
    }

    #[instrument(name = "script_execute", skip_all)]
    pub fn execute_with_cancel(&self, body: &str, cancel: &CancelToken) -> Result<Value> {
        self.run(wrap_script(body), cancel)
    }

    /// Run a script body that reads its inputs from `params`
    pub fn execute_with_params(&self, body: &str, params: &Map<String, Value>) -> Result<Value> {
        self.execute_with_params_and_cancel(body, params, &CancelToken::new())
    }

    #[instrument(name = "script_execute_with_params", skip_all, fields(param_count = params.len()))]
    pub fn execute_with_params_and_cancel(
        &self,
        body: &str,
        params: &Map<String, Value>,
        cancel: &CancelToken,
    ) -> Result<Value> {
        self.run(wrap_script_with_params(body, params)?, cancel)
    }

    /// Run a script body and deserialize its result into `T`
    pub fn execute_as<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        from_result(self.execute(body)?)
    }

    /// Run a parameterized script body and deserialize its result into `T`
    pub fn execute_with_params_as<T: DeserializeOwned>(
        &self,
        body: &str,
        params: &Map<String, Value>,
    ) -> Result<T> {
        from_result(self.execute_with_params(body, params)?)
    }

    fn run(&self, wrapped: String, cancel: &CancelToken) -> Result<Value> {
        let raw = self
            .mailbox
            .submit_with_cancel(Command::execute(wrapped), cancel)?;
        let decoded = decode_script_result(raw);
        if let Err(e) = &decoded {
            debug!(phase = e.phase(), error = %e, "Script reported failure");
        }
        decoded
    }
}

fn from_result<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| BridgeError::decode("unexpected script result shape", e))
}
