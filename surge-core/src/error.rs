//! Error taxonomy for the speed controller
//!
//! None of these escape the event handlers. They are logged and absorbed; the
//! rate-guarded restore path heals every inconsistency they describe.

use thiserror::Error;

use crate::key::GestureKey;
use crate::watchdog::RecoveryTrigger;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeedError {
    #[error("No playable media available")]
    MediaUnavailable,
    #[error("{key:?} believed down but {trigger} says otherwise")]
    InconsistentKeyState {
        key: GestureKey,
        trigger: RecoveryTrigger,
    },
    #[error("Restore requested for {key:?} but no session is live")]
    StaleSession { key: Option<GestureKey> },
}
