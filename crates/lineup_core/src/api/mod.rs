//! JSON boundary for host applications.

pub mod session_json;

pub use session_json::{
    apply_event_json, create_session_json, session_status_json, ApiError, ApiResponse,
    CreateSessionRequest, EventResponse, PlayerInput, SessionCreated, SessionStatus, API_VERSION,
};
