mod engine;
mod error;
mod tvm;
mod types;

pub use engine::compute_plan;
pub use error::TvmError;
pub use tvm::{PaymentTiming, future_value, payment_amount, present_value};
pub use types::{PlanInputs, PlanResult, Readiness};
