//! Main event loop: store events in, input in, gated frames out.

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::constants::{LOAD_MORE_THRESHOLD, POLL_FAST_MS, POLL_IDLE_MS};
use crate::controller::{LoadRequest, SelectionEffects, build_view_props, selection_effects};
use crate::input::{Action, InputResult, handle_input};
use crate::model::{AuthState, Message};
use crate::route::Route;
use crate::store::{StoreCommand, StoreEvent, selectors};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Store events first so input handlers see fresh state.
            self.drain_store_events();

            self.snapshot.status.clear_error_if_expired();

            // Adaptive timeout: poll faster while a load is in flight so
            // its completion shows up promptly.
            let poll_timeout = if self.snapshot.status.loading {
                POLL_FAST_MS
            } else {
                POLL_IDLE_MS
            };
            if event::poll(Duration::from_millis(poll_timeout))? {
                match handle_input(event::read()?, self.searching, &self.bindings, &self.binder) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => self.handle_action(action),
                    InputResult::Char(c) => {
                        let request = self.controller.push_char(c, &self.snapshot.committed_query);
                        self.dispatch_load(request);
                    }
                    InputResult::Backspace => {
                        let request = self.controller.pop_char(&self.snapshot.committed_query);
                        self.dispatch_load(request);
                    }
                    InputResult::Submit => self.handle_submit(),
                    InputResult::CancelSearch => {
                        self.searching = false;
                        self.controller.cancel_edit();
                    }
                    InputResult::Continue => {}
                }
            }

            self.maybe_request_more();

            let props = build_view_props(
                &self.snapshot,
                &self.controller,
                &self.config,
                self.searching,
                self.active_label,
            );
            if self.gate.should_render(&props) {
                render_thread.render(props);
            }
        }

        Ok(())
    }

    fn drain_store_events(&mut self) {
        while let Ok(event) = self.store.event_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub(crate) fn apply_event(&mut self, event: StoreEvent) {
        match &event {
            // Navigation keys are live exactly while the list is usable.
            StoreEvent::AuthStateChanged(AuthState::Authorized) => self.binder.bind(),
            StoreEvent::AuthStateChanged(_) => self.binder.unbind(),
            StoreEvent::ThreadsLoaded { .. } | StoreEvent::LoadFailed(_) => {
                self.pending_grow = false;
            }
            _ => {}
        }

        self.snapshot.apply(event);

        // A query committed outside the controller (a label cycle, or a
        // future external source) resets the view state and reloads.
        if let Some(request) = self.controller.observe_committed(&self.snapshot.committed_query) {
            self.dispatch_load(request);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::NextMessage => self.move_selection(true),
            Action::PrevMessage => self.move_selection(false),
            Action::Deselect => self.apply_selection(None),
            Action::Search => self.searching = true,
            Action::Refresh => {
                let cmd = StoreCommand::Refresh {
                    query: self.snapshot.committed_query.clone(),
                    page_size: self.controller.page_size(),
                };
                self.dispatch(cmd);
            }
            Action::NextLabel => self.cycle_label(),
            // Quit is resolved by the input handler before it gets here.
            Action::Quit => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let effects = {
            let message = if forward {
                selectors::next_message(&self.snapshot)
            } else {
                selectors::previous_message(&self.snapshot)
            };
            selection_effects(message)
        };
        self.apply_effects(effects);
    }

    fn apply_selection(&mut self, message: Option<&Message>) {
        let effects = selection_effects(message);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: SelectionEffects) {
        if let Some(thread_id) = effects.mark_as_read {
            // Optimistic flip; the store confirms it, and a failed call
            // is corrected by the next reload.
            self.snapshot
                .apply(StoreEvent::ThreadMarkedRead(thread_id.clone()));
            self.dispatch(StoreCommand::MarkAsRead(thread_id));
        }

        let fetch = match &effects.navigate_to {
            Route::Message { message_id, .. }
                if !self.snapshot.bodies.contains_key(message_id) =>
            {
                Some(message_id.clone())
            }
            _ => None,
        };
        tracing::debug!("Navigating to {}", effects.navigate_to.to_path());
        self.snapshot
            .apply(StoreEvent::RouteChanged(effects.navigate_to));
        if let Some(message_id) = fetch {
            self.dispatch(StoreCommand::FetchBody(message_id));
        }
    }

    fn handle_submit(&mut self) {
        self.active_label = None;
        let query = self
            .controller
            .display_query(&self.snapshot.committed_query)
            .to_string();
        self.submit_query(query);
    }

    /// Commit a query and issue the load for its first page.
    fn submit_query(&mut self, query: String) {
        self.searching = false;
        self.snapshot
            .apply(StoreEvent::QueryCommitted(query.clone()));
        let request = self.controller.on_submit(&query);
        self.dispatch_load(request);
    }

    /// Tab cycles inbox, each label in turn, then back to the inbox.
    fn cycle_label(&mut self) {
        if self.snapshot.labels.is_empty() {
            return;
        }
        let next = match self.active_label {
            None => Some(0),
            Some(idx) if idx + 1 < self.snapshot.labels.len() => Some(idx + 1),
            Some(_) => None,
        };
        self.active_label = next;

        let query = match next {
            Some(idx) => label_query(&self.snapshot.labels[idx].name),
            None => String::new(),
        };
        self.submit_query(query);
    }

    /// Grow the page once the selection is close to the end of the loaded
    /// rows. `pending_grow` keeps one growth step per completed page.
    fn maybe_request_more(&mut self) {
        if self.pending_grow || !self.snapshot.has_more || self.snapshot.status.loading {
            return;
        }
        if !self.binder.is_bound() {
            return;
        }
        let Some(selected) = selectors::selected_message(&self.snapshot) else {
            return;
        };
        let rows = selectors::row_messages(&self.snapshot);
        let Some(idx) = rows.iter().position(|m| m.thread_id == selected.thread_id) else {
            return;
        };

        if rows.len().saturating_sub(idx + 1) <= LOAD_MORE_THRESHOLD {
            self.pending_grow = true;
            let request = self.controller.request_more(&self.snapshot.committed_query);
            self.dispatch_load(request);
        }
    }

    pub(crate) fn dispatch_load(&mut self, request: LoadRequest) {
        self.dispatch(StoreCommand::LoadThreads {
            query: request.query,
            page_size: request.page_size,
        });
    }

    pub(crate) fn dispatch(&mut self, cmd: StoreCommand) {
        if let Err(e) = self.store.cmd_tx.try_send(cmd) {
            tracing::error!("Store command dropped: {}", e);
        }
    }
}

fn label_query(name: &str) -> String {
    let name = name.to_lowercase();
    if name.contains(char::is_whitespace) {
        format!("in:\"{}\"", name)
    } else {
        format!("in:{}", name)
    }
}
