//! Script execution façade
//!
//! - `envelope` - guard wrapping and the single result decoder
//! - `executor` - `ScriptExecutor` on top of the mailbox

mod envelope;
mod executor;

pub use envelope::{
    decode_script_result, wrap_script, wrap_script_with_params, ERROR_SENTINEL, RAW_RESULT_KEY,
};
pub use executor::ScriptExecutor;
