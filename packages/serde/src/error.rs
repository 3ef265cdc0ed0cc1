//! Errors for conversions between serde types and metaprop values.

use metaprop_reflect::{InvokeError, ReflectError, TypeDescriptor, ValueKind};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("encode error: {message}")]
    Encode { message: String },

    #[error("decode error: {message}")]
    Decode { message: String },

    #[error("cannot hydrate {found} as {expected} at '{path}'")]
    Mismatch {
        path: String,
        expected: TypeDescriptor,
        found: ValueKind,
    },

    #[error("cannot hydrate '{path}': {source}")]
    Property {
        path: String,
        #[source]
        source: ReflectError,
    },

    #[error("setter for '{path}' failed: {source}")]
    Invoke {
        path: String,
        #[source]
        source: InvokeError,
    },

    #[error(transparent)]
    Reflect(#[from] ReflectError),
}

impl Error {
    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}
