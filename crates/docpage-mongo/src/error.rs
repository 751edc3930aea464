//! Mapping of driver errors onto docpage error kinds.

use docpage::Error;
use mongodb::error::{Error as DriverError, ErrorKind as DriverErrorKind};

/// Server error code reported when `maxTimeMS` elapses.
const MAX_TIME_EXPIRED: i32 = 50;

/// Converts a driver error into a docpage error, keeping it as the source.
pub(crate) fn from_driver(error: DriverError) -> Error {
    let mapped = match error.kind.as_ref() {
        DriverErrorKind::Io(..)
        | DriverErrorKind::ServerSelection { .. }
        | DriverErrorKind::ConnectionPoolCleared { .. }
        | DriverErrorKind::DnsResolve { .. } => Error::connectivity(),
        DriverErrorKind::Authentication { .. } => {
            Error::connectivity().with_message("authentication failed")
        }
        DriverErrorKind::Command(command, ..) if command.code == MAX_TIME_EXPIRED => {
            Error::timeout().with_message("server time limit exceeded")
        }
        DriverErrorKind::Command(command, ..) => Error::invalid_query()
            .with_message(format!("{} ({})", command.message, command.code_name)),
        DriverErrorKind::InvalidArgument { message, .. } => {
            Error::invalid_query().with_message(message.clone())
        }
        DriverErrorKind::BsonDeserialization(..) => {
            Error::decode().with_message("server returned an unreadable document")
        }
        DriverErrorKind::BsonSerialization(..) => {
            Error::invalid_query().with_message("query could not be encoded")
        }
        _ => Error::internal(),
    };

    mapped.with_source(error)
}
