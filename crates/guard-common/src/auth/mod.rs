//! Request authentication utilities

mod signature;

pub use signature::{
    sign, verify, verify_at, SignatureError, SignatureVerifier, SignedEnvelope,
    REPLAY_WINDOW_SECS, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
