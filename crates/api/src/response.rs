//! The two response envelopes handlers answer with.
//!
//! Data-bearing endpoints wrap their payload as `{ "data": ... }` through
//! [`DataResponse`]. Flow endpoints -- auth and the onboarding steps --
//! answer with [`FlowResponse`], a success flag plus where the client goes
//! next.

use serde::Serialize;

/// `{ "data": T }`, the envelope every list and detail endpoint uses.
///
/// Typed instead of ad-hoc `serde_json::json!` so a handler cannot
/// misspell the envelope key.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "success": true, "redirectTo": "/..." }` envelope for flow endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl FlowResponse {
    /// A successful flow step pointing the client at its next page.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            success: true,
            redirect_to: Some(to.into()),
        }
    }

    /// A successful flow step with no navigation.
    pub fn ok() -> Self {
        Self {
            success: true,
            redirect_to: None,
        }
    }
}
