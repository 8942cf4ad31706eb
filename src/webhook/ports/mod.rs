//! Port contracts for handing normalized events to the pipeline.

mod dispatch;

pub use dispatch::{DispatchError, DispatchReceipt, DispatchResult, WebhookDispatch};
