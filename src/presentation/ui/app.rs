//! Main application orchestrator.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::application::dto::{CredentialSource, SignInRequest, SignInResponse};
use crate::application::services::{TodoListController, TodoListState};
use crate::application::use_cases::{RestoreSessionUseCase, SignInUseCase};
use crate::domain::entities::{Credentials, TodoId, User};
use crate::domain::errors::{AuthError, TodoError};
use crate::domain::ports::{AuthPort, SessionStoragePort, TodoStorePort};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::router::{ChannelNavigator, Route};
use crate::presentation::ui::{SignInAction, SignInScreen, TodoAction, TodoScreen};
use crate::presentation::widgets::StatusBar;

/// Results of background work, delivered to the event loop.
#[derive(Debug)]
enum Action {
    SessionRestored(Result<Option<User>, AuthError>),
    SignInFinished(Result<SignInResponse, AuthError>),
    SignedOut(Result<(), AuthError>),
    ItemAdded(Result<TodoId, TodoError>),
    ItemDeleted(Result<(), TodoError>),
}

enum CurrentScreen {
    SignIn(SignInScreen),
    Todos(TodoScreen),
}

pub struct App {
    auth: Arc<dyn AuthPort>,
    controller: Arc<TodoListController>,
    sign_in_use_case: SignInUseCase,
    restore_session_use_case: RestoreSessionUseCase,
    route_rx: mpsc::UnboundedReceiver<Route>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    screen: CurrentScreen,
    /// Command-line credentials, used if no stored session comes back.
    pending_credentials: Option<Credentials>,
    remember: bool,
    exiting: bool,
}

impl App {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthPort>,
        store: Arc<dyn TodoStorePort>,
        session_storage: Arc<dyn SessionStoragePort>,
        remember: bool,
    ) -> Self {
        let (navigator, route_rx) = ChannelNavigator::channel();
        let controller = Arc::new(TodoListController::new(store, Arc::new(navigator)));
        let sign_in_use_case = SignInUseCase::new(auth.clone(), session_storage.clone());
        let restore_session_use_case = RestoreSessionUseCase::new(auth.clone(), session_storage);
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            auth,
            controller,
            sign_in_use_case,
            restore_session_use_case,
            route_rx,
            action_tx,
            action_rx,
            screen: CurrentScreen::SignIn(SignInScreen::new(remember)),
            pending_credentials: None,
            remember,
            exiting: false,
        }
    }

    /// Runs until the user quits.
    ///
    /// The list controller stays mounted for the whole run, so it sees every
    /// sign-in and sign-out.
    ///
    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        credentials: Option<Credentials>,
    ) -> color_eyre::Result<()> {
        let mount = self.controller.mount(self.auth.as_ref());

        self.pending_credentials = credentials;
        self.spawn_restore();

        let result = self.run_event_loop(terminal).await;

        mount.unmount().await;
        info!("Application exiting normally");
        result
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut state_rx: watch::Receiver<TodoListState> = self.controller.watch();

        terminal.draw(|frame| self.render(frame))?;

        while !self.exiting {
            tokio::select! {
                biased;

                Some(route) = self.route_rx.recv() => {
                    self.show(route);
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                Ok(()) = state_rx.changed() => {
                    let state = state_rx.borrow_and_update().clone();
                    self.apply_state(&state);
                }

                Some(event) = terminal_events.next() => match event {
                    Ok(Event::Key(key)) if EventHandler::is_press(&key) => {
                        if self.handle_key(key) == EventResult::Exit {
                            self.exiting = true;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                },
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            CurrentScreen::SignIn(screen) => frame.render_widget(&*screen, frame.area()),
            CurrentScreen::Todos(screen) => frame.render_widget(screen, frame.area()),
        }
    }

    fn show(&mut self, route: Route) {
        let on_todos = matches!(self.screen, CurrentScreen::Todos(_));
        match (route, on_todos) {
            (Route::Landing, false) | (Route::Todos, true) => {}
            (Route::Landing, true) => {
                debug!("Showing sign-in screen");
                self.screen = CurrentScreen::SignIn(SignInScreen::new(self.remember));
            }
            (Route::Todos, false) => {
                debug!("Showing todo list");
                let mut screen = TodoScreen::new();
                let state = self.controller.state();
                screen.sync(&state);
                if let Some(user) = &state.user {
                    screen.set_status(StatusBar::info(format!(
                        "Signed in as {}",
                        user.display_name()
                    )));
                }
                self.screen = CurrentScreen::Todos(screen);
            }
        }
    }

    fn apply_state(&mut self, state: &TodoListState) {
        if state.user.is_some() && matches!(self.screen, CurrentScreen::SignIn(_)) {
            // A sign-in from any source lands on the list.
            self.show(Route::Todos);
        }
        if let CurrentScreen::Todos(screen) = &mut self.screen {
            screen.sync(state);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if EventHandler::is_quit_event(&key) {
            return EventResult::Exit;
        }

        match &mut self.screen {
            CurrentScreen::SignIn(screen) => {
                if screen.handle_key(key) == SignInAction::Submit {
                    let credentials = screen.credentials();
                    let remember = screen.should_remember();
                    self.remember = remember;
                    self.start_sign_in(credentials, CredentialSource::UserInput, remember);
                }
            }
            CurrentScreen::Todos(screen) => match screen.handle_key(key) {
                TodoAction::None => {}
                TodoAction::DraftChanged(text) => self.controller.set_draft(text),
                TodoAction::Submit => self.spawn_submit(),
                TodoAction::Delete(id) => self.spawn_delete(id),
                TodoAction::SignOut => self.spawn_sign_out(),
            },
        }

        EventResult::Continue
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SessionRestored(Ok(Some(user))) => {
                info!(user = %user.display_name(), "Session restored");
                self.pending_credentials = None;
                self.show(Route::Todos);
            }
            Action::SessionRestored(Ok(None)) => match self.pending_credentials.take() {
                Some(credentials) => {
                    self.start_sign_in(credentials, CredentialSource::CommandLine, self.remember);
                }
                None => {
                    if let CurrentScreen::SignIn(screen) = &mut self.screen {
                        screen.reset();
                    }
                }
            },
            Action::SessionRestored(Err(e)) => {
                warn!(error = %e, "Could not restore session");
                self.pending_credentials = None;
                if let CurrentScreen::SignIn(screen) = &mut self.screen {
                    screen.set_error(sign_in_message(&e));
                }
            }
            Action::SignInFinished(Ok(response)) => {
                info!(
                    user = %response.user.display_name(),
                    source = %response.source,
                    persisted = response.session_persisted,
                    "Sign-in successful"
                );
                self.show(Route::Todos);
            }
            Action::SignInFinished(Err(e)) => {
                error!(error = %e, "Sign-in failed");
                if let CurrentScreen::SignIn(screen) = &mut self.screen {
                    screen.set_error(sign_in_message(&e));
                }
            }
            Action::SignedOut(result) => {
                if let Err(e) = result {
                    self.set_status(StatusBar::error(format!("Sign-out failed: {e}")));
                }
            }
            // Failures are logged by the controller; the view keeps its state.
            Action::ItemAdded(result) => {
                debug!(ok = result.is_ok(), "Add finished");
            }
            Action::ItemDeleted(result) => {
                debug!(ok = result.is_ok(), "Delete finished");
            }
        }
    }

    fn set_status(&mut self, status: StatusBar) {
        if let CurrentScreen::Todos(screen) = &mut self.screen {
            screen.set_status(status);
        }
    }

    /// Looks for a stored session without blocking the first draw.
    fn spawn_restore(&mut self) {
        if let CurrentScreen::SignIn(screen) = &mut self.screen {
            screen.set_signing_in();
        }

        let use_case = self.restore_session_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.execute().await;
            let _ = tx.send(Action::SessionRestored(result));
        });
    }

    fn start_sign_in(&mut self, credentials: Credentials, source: CredentialSource, remember: bool) {
        if let CurrentScreen::SignIn(screen) = &mut self.screen {
            if screen.email().is_empty() {
                screen.set_email(credentials.email());
            }
            screen.set_signing_in();
        }

        let mut request = SignInRequest::new(credentials, source);
        if !remember {
            request = request.without_persistence();
        }

        let use_case = self.sign_in_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.execute(request).await;
            let _ = tx.send(Action::SignInFinished(result));
        });
    }

    fn spawn_submit(&self) {
        let controller = Arc::clone(&self.controller);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = controller.submit().await;
            let _ = tx.send(Action::ItemAdded(result));
        });
    }

    fn spawn_delete(&self, id: TodoId) {
        let controller = Arc::clone(&self.controller);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = controller.delete_item(&id).await;
            let _ = tx.send(Action::ItemDeleted(result));
        });
    }

    fn spawn_sign_out(&mut self) {
        self.set_status(StatusBar::info("Signing out..."));
        let use_case = self.sign_in_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.sign_out().await;
            let _ = tx.send(Action::SignedOut(result));
        });
    }
}

fn sign_in_message(error: &AuthError) -> String {
    match error {
        AuthError::InvalidCredentials { reason } => format!("Invalid credentials: {reason}"),
        AuthError::NetworkError { message } => format!("Network error: {message}"),
        AuthError::RateLimited => "Too many attempts. Try again later.".to_string(),
        other => other.to_string(),
    }
}
