use uuid::Uuid;

/// Request-scoped handle passed through every port call.
///
/// Carries the request id that tags log output. It does not cancel anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    request_id: Uuid,
}

impl Context {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }

    pub fn with_request_id(request_id: Uuid) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
