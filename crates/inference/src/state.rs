use std::fmt;

/// Lifecycle of one classification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Normalizing,
    Inferring,
    Done,
    Failed,
}

impl RequestState {
    pub fn can_transition_to(self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Idle, Normalizing)
                | (Idle, Inferring)
                | (Normalizing, Inferring)
                | (Normalizing, Failed)
                | (Inferring, Done)
                | (Inferring, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Done | RequestState::Failed)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Idle => "idle",
            RequestState::Normalizing => "normalizing",
            RequestState::Inferring => "inferring",
            RequestState::Done => "done",
            RequestState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks a single request through [`RequestState`]. No retries: once
/// terminal, the request stays there.
#[derive(Debug)]
pub struct ClassificationRequest {
    id: u64,
    state: RequestState,
}

impl ClassificationRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Move to `next`. Illegal transitions are logged and ignored.
    pub fn advance(&mut self, next: RequestState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                request = self.id,
                from = %self.state,
                to = %next,
                "Ignoring illegal request transition"
            );
            return false;
        }

        tracing::trace!(request = self.id, from = %self.state, to = %next, "Request transition");
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestState::*;

    #[test]
    fn test_success_path() {
        let mut request = ClassificationRequest::new(1);
        assert!(request.advance(Normalizing));
        assert!(request.advance(Inferring));
        assert!(request.advance(Done));
        assert!(request.state().is_terminal());
    }

    #[test]
    fn test_failure_paths() {
        let mut request = ClassificationRequest::new(1);
        assert!(request.advance(Normalizing));
        assert!(request.advance(Failed));

        let mut request = ClassificationRequest::new(2);
        assert!(request.advance(Inferring));
        assert!(request.advance(Failed));
        assert_eq!(request.state(), Failed);
    }

    #[test]
    fn test_illegal_transitions_are_ignored() {
        let mut request = ClassificationRequest::new(1);
        assert!(!request.advance(Done), "cannot finish without inferring");
        assert!(!request.advance(Failed), "idle requests cannot fail directly");
        assert_eq!(request.state(), Idle);

        request.advance(Normalizing);
        request.advance(Inferring);
        request.advance(Done);
        assert!(!request.advance(Normalizing), "no retries after completion");
        assert_eq!(request.state(), Done);
    }
}
