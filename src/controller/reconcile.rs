//! The reconciliation function itself, kept pure so every lifecycle
//! trigger funnels through one testable computation.

use crate::constants::THREAD_PAGE_SIZE;

/// Transient per-view state owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Uncommitted search text being edited. `None` defers to the
    /// committed query for display.
    pub pending_query: Option<String>,
    /// How many threads the view has asked to have loaded. Grows by one
    /// page increment per pagination request, resets on a fresh search.
    pub requested_page_size: u32,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            pending_query: None,
            requested_page_size: THREAD_PAGE_SIZE,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for one thread page load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub query: String,
    pub page_size: u32,
}

/// Compute the load the view needs right now. The committed query and the
/// requested page size fully determine it; pending edit text is display
/// only and never reaches the request. Callers dispatch the result every
/// time, the store drops repeats.
pub fn reconcile(committed_query: &str, state: &ViewState) -> LoadRequest {
    LoadRequest {
        query: committed_query.to_string(),
        page_size: state.requested_page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_is_deterministic_for_unchanged_inputs() {
        let state = ViewState {
            pending_query: Some("draft text".to_string()),
            requested_page_size: 40,
        };
        let first = reconcile("invoice", &state);
        let second = reconcile("invoice", &state);
        assert_eq!(first, second);
        assert_eq!(first.query, "invoice");
        assert_eq!(first.page_size, 40);
    }

    #[test]
    fn test_pending_text_never_reaches_the_request() {
        let state = ViewState {
            pending_query: Some("half-typed".to_string()),
            requested_page_size: 20,
        };
        assert_eq!(reconcile("", &state).query, "");
    }
}
