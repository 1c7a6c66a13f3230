//! Application core: wires the store, controller, and renderer together.

mod event_loop;
pub mod render_thread;

use anyhow::Result;

use render_thread::RenderThread;

use crate::api::GmailClient;
use crate::config::Config;
use crate::controller::{Controller, RenderGate};
use crate::credentials::CredentialStore;
use crate::input::{KeyBindings, NavBinder};
use crate::store::{StoreCommand, StoreHandle, StoreSnapshot, spawn_store_actor};

pub struct App {
    pub(crate) config: Config,
    pub(crate) store: StoreHandle,
    pub(crate) snapshot: StoreSnapshot,
    pub(crate) controller: Controller,
    pub(crate) gate: RenderGate,
    pub(crate) bindings: KeyBindings,
    pub(crate) binder: NavBinder,
    /// Whether the search input has focus.
    pub(crate) searching: bool,
    /// Index into the loaded labels while cycling with Tab.
    pub(crate) active_label: Option<usize>,
    /// A page growth was dispatched and its result has not arrived yet.
    pub(crate) pending_grow: bool,
}

impl App {
    pub fn new(config: Config, credentials: CredentialStore) -> Result<Self> {
        // A missing token still starts the app: the first probe fails and
        // the sign-in overlay tells the user what to do.
        let token = match credentials.get_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("No token available: {}", e);
                String::new()
            }
        };
        let gateway = GmailClient::new(&config.api.base_url, &token)?;
        let store = spawn_store_actor(gateway);

        let bindings = KeyBindings::new();
        let binder = NavBinder::new(&config.ui);

        let mut app = Self {
            config,
            store,
            snapshot: StoreSnapshot::new(),
            controller: Controller::new(),
            gate: RenderGate::new(),
            bindings,
            binder,
            searching: false,
            active_label: None,
            pending_grow: false,
        };

        // First reconciliation plus the label list, issued before the
        // loop starts.
        let request = app.controller.on_mount(&app.snapshot.committed_query);
        app.dispatch_load(request);
        app.dispatch(StoreCommand::LoadLabels);

        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        // The render thread owns terminal setup and teardown.
        let render_thread = RenderThread::spawn()?;

        let result = self.event_loop(&render_thread).await;

        self.dispatch(StoreCommand::Shutdown);
        render_thread.shutdown();

        result
    }
}
