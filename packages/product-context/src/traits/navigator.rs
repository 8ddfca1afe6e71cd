use serde::{Deserialize, Serialize};

/// A redirect request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub page: String,
    pub params: Vec<(String, String)>,
    pub query: String,
}

impl NavigationRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Performs side-effecting redirects.
pub trait Navigator: Send + Sync {
    fn navigate(&self, request: NavigationRequest);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn navigate(&self, request: NavigationRequest) {
        (**self).navigate(request)
    }
}
