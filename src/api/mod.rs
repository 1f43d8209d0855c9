//! Public API: envelopes and the validation orchestrator

mod envelope;
mod validator;

pub use envelope::{
    ConstantInput, MeasuredValueInput, RESPONSE_SOURCE, ValidationRequest, ValidationResponse,
};
pub use validator::Validator;
