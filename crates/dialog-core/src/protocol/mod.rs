//! Method handlers
//!
//! One trait per SIP method, each implemented for
//! [`CallManager`](crate::manager::CallManager):
//!
//! | Method  | Response             | Effect                                   |
//! |---------|----------------------|------------------------------------------|
//! | INVITE  | 100 Trying, 200 OK   | creates the call, starts the ACK watchdog |
//! | ACK     | none                 | confirms the call, schedules teardown     |
//! | BYE     | 200 OK               | terminates and removes the call           |
//! | OPTIONS | 200 OK               | none; out of dialog                       |

pub mod ack_handler;
pub mod bye_handler;
pub mod invite_handler;
pub mod options_handler;

pub use ack_handler::AckHandler;
pub use bye_handler::ByeHandler;
pub use invite_handler::InviteHandler;
pub use options_handler::OptionsHandler;

use siprec_sip_core::Message;

use crate::errors::{DialogError, DialogResult};

fn call_id_of(request: &Message) -> DialogResult<&str> {
    request.call_id().ok_or_else(|| DialogError::missing_header("Call-ID"))
}
