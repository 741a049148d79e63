use crate::FetchError;

/// Lifecycle of a remote fetch, shared by the catalog and detail controllers.
///
/// `Failed` carries no payload: a failed load is shown as an error or
/// "not found" view, never as an empty success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(FetchError::NotFound(_)) => "not found",
            LoadState::Failed(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_idle() {
        let state: LoadState<u32> = LoadState::default();
        assert_eq!(state, LoadState::Idle);
        assert!(!state.is_loading());
        assert!(state.ready().is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(LoadState::Ready(1).label(), "ready");
        assert_eq!(
            LoadState::<u32>::Failed(FetchError::NotFound("x".into())).label(),
            "not found"
        );
        assert_eq!(
            LoadState::<u32>::Failed(FetchError::Response { status: 503 }).label(),
            "error"
        );
    }
}
