//! Async runtime around the dispatch function.
//!
//! [`Console`] owns the state and applies events one at a time. Remote calls
//! run as tokio tasks; each sends its completion back through an mpsc queue,
//! so completions are applied in the order they finish and never race with
//! one another.

use crate::dispatch::dispatch;
use crate::event::{Command, Event, Notice};
use crate::render::{project, UserViews};
use crate::state::ConsoleState;
use licdesk_gateway::{GatewayError, RemoteGateway};
use licdesk_license::LicenseError;
use licdesk_types::{Overlay, View};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Where the console's output goes: a terminal, a GUI, or a test recorder.
pub trait Frontend: Send {
    /// Shows a message to the operator.
    fn notify(&mut self, notice: &Notice);

    /// Replaces both user lists.
    fn render_users(&mut self, views: &UserViews);

    /// Called whenever the active view or overlay changes.
    fn show(&mut self, view: View, overlay: Overlay);
}

/// The console controller: state, gateway, and frontend wired together.
pub struct Console<G: RemoteGateway + ?Sized + 'static, F: Frontend> {
    state: ConsoleState,
    gateway: Arc<G>,
    frontend: F,
    download_dir: PathBuf,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    tasks: JoinSet<()>,
}

impl<G: RemoteGateway + ?Sized + 'static, F: Frontend> Console<G, F> {
    pub fn new(state: ConsoleState, gateway: Arc<G>, frontend: F, download_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            gateway,
            frontend,
            download_dir,
            tx,
            rx,
            tasks: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Number of remote calls or saves still running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Applies an operator event immediately.
    ///
    /// Any remote work it starts completes later; call [`Console::settle`]
    /// to wait for it.
    pub fn submit(&mut self, event: Event) {
        self.handle(event);
    }

    /// Waits for every in-flight task and applies its completion, including
    /// follow-up work those completions start (e.g. register then re-list).
    pub async fn settle(&mut self) {
        loop {
            while let Ok(event) = self.rx.try_recv() {
                self.handle(event);
            }
            if self.tasks.is_empty() {
                break;
            }
            if let Some(Err(e)) = self.tasks.join_next().await {
                warn!("Console task failed: {e}");
            }
        }
    }

    fn handle(&mut self, event: Event) {
        let before = (self.state.view(), self.state.overlay());
        let commands = dispatch(&mut self.state, event);
        let after = (self.state.view(), self.state.overlay());
        if before != after {
            debug!("Now showing {} (overlay: {})", after.0, after.1);
            self.frontend.show(after.0, after.1);
        }
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Authenticate(credentials) => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn(
                    async move { Event::LoginCompleted(gateway.authenticate(&credentials).await) },
                    |e| Event::LoginCompleted(Err(e)),
                );
            }
            Command::RegisterUser(request) => {
                let gateway = Arc::clone(&self.gateway);
                let username = request.username.clone();
                self.spawn(
                    async move {
                        let result = gateway.register_user(&request).await;
                        Event::RegistrationCompleted {
                            username: request.username,
                            result,
                        }
                    },
                    move |e| Event::RegistrationCompleted {
                        username,
                        result: Err(e),
                    },
                );
            }
            Command::ListUsers => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn(
                    async move { Event::UsersLoaded(gateway.list_users().await) },
                    |e| Event::UsersLoaded(Err(e)),
                );
            }
            Command::GenerateLicense { seed } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn(
                    async move { Event::LicenseGenerated(gateway.generate_license(&seed).await) },
                    |e| Event::LicenseGenerated(Err(e)),
                );
            }
            Command::DownloadLicense { username } => {
                let gateway = Arc::clone(&self.gateway);
                let name = username.clone();
                self.spawn(
                    async move {
                        let result = gateway.download_license(&username).await;
                        Event::LicenseDownloaded { username, result }
                    },
                    move |e| Event::LicenseDownloaded {
                        username: name,
                        result: Err(e),
                    },
                );
            }
            Command::ActivateLicense(request) => {
                let gateway = Arc::clone(&self.gateway);
                let username = request.username.clone();
                self.spawn(
                    async move {
                        let result = gateway.activate_license(&request).await;
                        Event::LicenseActivated {
                            username: request.username,
                            result,
                        }
                    },
                    move |e| Event::LicenseActivated {
                        username,
                        result: Err(e),
                    },
                );
            }
            Command::SaveLicense(file) => {
                let dir = self.download_dir.clone();
                self.spawn(
                    async move {
                        let result = tokio::task::spawn_blocking(move || file.save_in(&dir))
                            .await
                            .unwrap_or_else(|e| Err(LicenseError::Storage(e.to_string())));
                        Event::LicenseSaved(result)
                    },
                    |e| Event::LicenseSaved(Err(LicenseError::Storage(e.to_string()))),
                );
            }
            Command::RenderUsers => {
                let views = project(self.state.users());
                debug!("Rendering {} users", views.display.len());
                self.frontend.render_users(&views);
            }
            Command::Notify(notice) => {
                if notice.kind.is_error() {
                    warn!("{:?}: {}", notice.kind, notice.message);
                } else {
                    info!("{}", notice.message);
                }
                self.frontend.notify(&notice);
            }
            Command::Diagnostic(message) => warn!("{message}"),
        }
    }

    /// Runs `work` as a task and queues the event it produces. If the task
    /// dies instead, `on_failure` builds the completion so the state never
    /// waits on an answer that will not come.
    fn spawn<Fut, OnFailure>(&mut self, work: Fut, on_failure: OnFailure)
    where
        Fut: std::future::Future<Output = Event> + Send + 'static,
        OnFailure: FnOnce(GatewayError) -> Event + Send + 'static,
    {
        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            let event = match tokio::spawn(work).await {
                Ok(event) => event,
                Err(e) => {
                    warn!("Console task failed: {e}");
                    on_failure(GatewayError::Network(format!("request task failed: {e}")))
                }
            };
            // The receiver lives as long as the console; a send can only fail
            // after it has been dropped.
            let _ = tx.send(event);
        });
    }
}
