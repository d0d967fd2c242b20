use std::sync::Arc;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use explorer_core::AgentsBackend;
use explorer_core::ExplorerErr;
use explorer_core::SessionStore;
use explorer_protocol::artifact::Artifact;
use explorer_protocol::request::CapabilityRequest;
use explorer_protocol::turn::Capability;
use explorer_protocol::turn::Turn;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::export;
use crate::pages::PageState;
use crate::pages::Phase;
use crate::ui;

/// The original generates two image variations per submit; each pass is one
/// adapter call and one turn.
const IMAGE_PASSES: usize = 2;

/// Internal app events delivered from the single in-flight background task.
#[derive(Debug)]
pub enum AppEvent {
    /// One adapter call finished (a submit may contain several for images).
    InvokeFinished {
        capability: Capability,
        result: Result<Artifact, ExplorerErr>,
    },
    /// The whole submit finished; the page leaves `AwaitingResponse`.
    SubmitFinished { capability: Capability },
}

pub type AppEventTx = UnboundedSender<AppEvent>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivePage {
    Home,
    Capability(usize),
}

pub struct App {
    pub session: SessionStore,
    pub pages: Vec<PageState>,
    pub active: ActivePage,
    pub status: String,
    pub throbber: ThrobberState,
    /// Whether keystrokes go to the custom prompt editor.
    pub editing: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            session: SessionStore::new(),
            pages: Capability::ALL.into_iter().map(PageState::new).collect(),
            active: ActivePage::Home,
            status: "Press 1-5 to pick a capability, q to quit".to_string(),
            throbber: ThrobberState::default(),
            editing: false,
        }
    }

    pub fn with_initial_page(initial: Option<Capability>) -> Self {
        let mut app = Self::new();
        if let Some(capability) = initial {
            app.activate(capability);
        }
        app
    }

    pub fn activate(&mut self, capability: Capability) {
        if let Some(idx) = Capability::ALL.iter().position(|c| *c == capability) {
            self.active = ActivePage::Capability(idx);
        }
        self.editing = false;
    }

    pub fn active_page(&self) -> Option<&PageState> {
        match self.active {
            ActivePage::Home => None,
            ActivePage::Capability(idx) => self.pages.get(idx),
        }
    }

    pub fn active_page_mut(&mut self) -> Option<&mut PageState> {
        match self.active {
            ActivePage::Home => None,
            ActivePage::Capability(idx) => self.pages.get_mut(idx),
        }
    }

    fn page_mut(&mut self, capability: Capability) -> Option<&mut PageState> {
        self.pages
            .iter_mut()
            .find(|page| page.capability == capability)
    }

    /// Whether any page has a submit in flight. Only one interaction runs
    /// at a time across the whole app.
    pub fn any_busy(&self) -> bool {
        self.pages.iter().any(PageState::is_busy)
    }

    /// Validate the active page's prompt and, when accepted, record the user
    /// turn and flip the page to `AwaitingResponse`. Returns the request the
    /// caller must dispatch. Concurrent submits are rejected, not queued.
    pub fn begin_submit(&mut self) -> Option<CapabilityRequest> {
        if self.any_busy() {
            self.status = "A request is already in flight; wait for it to finish".to_string();
            return None;
        }
        let Some(page) = self.active_page_mut() else {
            return None;
        };
        let request = page.build_request();
        if let Err(reason) = request.validate() {
            let capability = page.capability;
            self.status = format!("{capability}: {reason}");
            return None;
        }
        let capability = page.capability;
        page.phase = Phase::AwaitingResponse;
        page.pending_error = None;
        page.scroll = u16::MAX;
        self.session
            .append(Turn::user(capability, request.prompt()));
        self.status = format!("{capability}: waiting for the agent…");
        Some(request)
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::InvokeFinished { capability, result } => match result {
                Ok(artifact) => {
                    self.session.append(Turn::agent(capability, artifact));
                    if let Some(page) = self.page_mut(capability) {
                        page.scroll = u16::MAX;
                    }
                }
                Err(err) => {
                    debug!("invoke failed: {err}");
                    if let Some(page) = self.page_mut(capability) {
                        page.pending_error = Some(err.to_string());
                    }
                }
            },
            AppEvent::SubmitFinished { capability } => {
                let mut status = None;
                if let Some(page) = self.page_mut(capability) {
                    page.phase = match page.pending_error.take() {
                        Some(message) => {
                            status = Some(format!("{capability}: {message}"));
                            Phase::Error(message)
                        }
                        None => {
                            status = Some(format!("{capability}: done"));
                            Phase::DisplayingResult
                        }
                    };
                }
                if let Some(status) = status {
                    self.status = status;
                }
            }
        }
    }

    /// Copy the most recent agent response of the active page.
    fn copy_latest_response(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        let capability = page.capability;
        let Some(turn) = self
            .session
            .history_for(capability)
            .into_iter()
            .rev()
            .find(|turn| turn.artifact().is_some())
            .cloned()
        else {
            self.status = "Nothing to copy yet".to_string();
            return;
        };
        self.status = match export::copy_turn_text(&turn) {
            Ok(()) => "Response copied to clipboard".to_string(),
            Err(err) => format!("Copy failed: {err}"),
        };
    }

    /// Export the most recent agent response of the active page to a file in
    /// the working directory.
    fn export_latest_response(&mut self) {
        let Some(page) = self.active_page() else {
            return;
        };
        let capability = page.capability;
        let Some(turn) = self
            .session
            .history_for(capability)
            .into_iter()
            .rev()
            .find(|turn| turn.artifact().is_some())
            .cloned()
        else {
            self.status = "Nothing to export yet".to_string();
            return;
        };
        let dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(err) => {
                self.status = format!("Export failed: {err}");
                return;
            }
        };
        self.status = match export::export_turn(&turn, &dir) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    /// Handle a key press. Returns the request to dispatch when the key
    /// triggered a submit, and `KeyOutcome::Quit` on exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        if self.editing {
            match key.code {
                KeyCode::Esc => {
                    self.editing = false;
                }
                KeyCode::Enter => {
                    self.editing = false;
                    if let Some(request) = self.begin_submit() {
                        return KeyOutcome::Submit(request);
                    }
                }
                _ => {
                    if let Some(page) = self.active_page_mut() {
                        page.input.handle_key(key);
                    }
                }
            }
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('h') => {
                self.active = ActivePage::Home;
            }
            KeyCode::Char(digit @ '1'..='5') => {
                let idx = (digit as usize) - ('1' as usize);
                self.active = ActivePage::Capability(idx);
            }
            KeyCode::Up => {
                if let Some(page) = self.active_page_mut()
                    && !page.use_custom
                {
                    page.prev_example();
                }
            }
            KeyCode::Down => {
                if let Some(page) = self.active_page_mut()
                    && !page.use_custom
                {
                    page.next_example();
                }
            }
            KeyCode::Char('e') => {
                let start_editing = self
                    .active_page_mut()
                    .map(|page| {
                        page.use_custom = !page.use_custom;
                        page.use_custom
                    })
                    .unwrap_or(false);
                if start_editing {
                    self.editing = true;
                }
            }
            KeyCode::Char('p') => {
                if let Some(page) = self.active_page_mut()
                    && page.capability == Capability::Search
                {
                    page.premium = !page.premium;
                }
            }
            KeyCode::Char('m') => {
                if let Some(page) = self.active_page_mut()
                    && page.capability == Capability::Orchestration
                {
                    page.toggle_handoff_execution();
                }
            }
            KeyCode::Char('c') => self.copy_latest_response(),
            KeyCode::Char('s') => self.export_latest_response(),
            KeyCode::Char('x') => {
                if let Some(capability) = self.active_page().map(|page| page.capability) {
                    self.session.clear(capability);
                    self.status = format!("{capability}: history cleared");
                }
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.status = "Session reset".to_string();
            }
            KeyCode::PageUp => {
                if let Some(page) = self.active_page_mut() {
                    // The draw pass clamps this to the real bottom offset.
                    page.scroll = page.scroll.saturating_sub(5);
                }
            }
            KeyCode::PageDown => {
                if let Some(page) = self.active_page_mut() {
                    page.scroll = page.scroll.saturating_add(5);
                }
            }
            KeyCode::Enter => {
                if let Some(request) = self.begin_submit() {
                    return KeyOutcome::Submit(request);
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum KeyOutcome {
    Continue,
    Submit(CapabilityRequest),
    Quit,
}

/// Dispatch one submit on a background task. Image submits run the fixed
/// number of generation passes; every pass reports its own result and a
/// failed pass does not abort the remaining ones.
fn spawn_submit(backend: Arc<dyn AgentsBackend>, tx: AppEventTx, request: CapabilityRequest) {
    let capability = request.capability();
    tokio::spawn(async move {
        match request {
            CapabilityRequest::Image { prompt } => {
                for _ in 0..IMAGE_PASSES {
                    let result = backend
                        .invoke(CapabilityRequest::Image {
                            prompt: prompt.clone(),
                        })
                        .await;
                    let _ = tx.send(AppEvent::InvokeFinished { capability, result });
                }
            }
            request => {
                let result = backend.invoke(request).await;
                let _ = tx.send(AppEvent::InvokeFinished { capability, result });
            }
        }
        let _ = tx.send(AppEvent::SubmitFinished { capability });
    });
}

pub(crate) async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    backend: Arc<dyn AgentsBackend>,
    initial_page: Option<Capability>,
) -> anyhow::Result<()> {
    let mut app = App::with_initial_page(initial_page);
    let mut events = EventStream::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<AppEvent>();

    // Animate the throbber only while a call is in flight.
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
            needs_redraw = false;
        }

        tokio::select! {
            _ = tick.tick() => {
                if app.any_busy() {
                    app.throbber.calc_next();
                    needs_redraw = true;
                }
            }
            maybe_app_event = rx.recv() => {
                if let Some(event) = maybe_app_event {
                    app.handle_app_event(event);
                    needs_redraw = true;
                }
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        match app.handle_key(key) {
                            KeyOutcome::Quit => break,
                            KeyOutcome::Submit(request) => {
                                spawn_submit(backend.clone(), tx.clone(), request);
                            }
                            KeyOutcome::Continue => {}
                        }
                        needs_redraw = true;
                    }
                    Some(Ok(Event::Paste(pasted))) => {
                        if app.editing
                            && let Some(page) = app.active_page_mut()
                        {
                            page.input.handle_paste(&pasted);
                        }
                        needs_redraw = true;
                    }
                    Some(Ok(Event::Resize(..))) => {
                        needs_redraw = true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::MockBackend;
    use pretty_assertions::assert_eq;

    fn code_app() -> App {
        App::with_initial_page(Some(Capability::Code))
    }

    #[tokio::test]
    async fn successful_submit_appends_exactly_one_agent_turn() {
        let mut app = code_app();
        let request = app.begin_submit().expect("submit accepted");
        assert_eq!(
            app.active_page().expect("page").phase,
            Phase::AwaitingResponse
        );
        assert_eq!(app.session.len(), 1);

        let capability = request.capability();
        let result = MockBackend.invoke(request).await;
        app.handle_app_event(AppEvent::InvokeFinished { capability, result });
        app.handle_app_event(AppEvent::SubmitFinished { capability });

        assert_eq!(
            app.active_page().expect("page").phase,
            Phase::DisplayingResult
        );
        assert_eq!(app.session.agent_turns_for(Capability::Code), 1);
        assert_eq!(app.session.len(), 2);
    }

    #[tokio::test]
    async fn failed_submit_appends_no_agent_turn_and_lands_in_error() {
        let mut app = code_app();
        let request = app.begin_submit().expect("submit accepted");
        let capability = request.capability();

        app.handle_app_event(AppEvent::InvokeFinished {
            capability,
            result: Err(ExplorerErr::RateLimited { retry_after: None }),
        });
        app.handle_app_event(AppEvent::SubmitFinished { capability });

        assert_eq!(app.session.agent_turns_for(Capability::Code), 0);
        let Phase::Error(message) = &app.active_page().expect("page").phase else {
            panic!("expected the error phase");
        };
        assert!(message.contains("rate limited"));

        // The page is submit-ready again: an error is not a terminal state.
        assert!(app.begin_submit().is_some());
    }

    #[test]
    fn concurrent_submits_are_rejected() {
        let mut app = code_app();
        assert!(app.begin_submit().is_some());
        assert!(app.begin_submit().is_none());
        assert!(app.status.contains("already in flight"));
        // No extra user turn was recorded for the rejected submit.
        assert_eq!(app.session.len(), 1);
    }

    #[test]
    fn empty_custom_prompt_is_rejected_without_touching_the_session() {
        let mut app = code_app();
        let page = app.active_page_mut().expect("page");
        page.use_custom = true;
        assert!(app.begin_submit().is_none());
        assert!(app.session.is_empty());
        assert_eq!(app.active_page().expect("page").phase, Phase::Idle);
    }

    #[test]
    fn reset_empties_the_session_regardless_of_prior_state() {
        let mut app = code_app();
        let _ = app.begin_submit();
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn image_passes_append_one_turn_each() {
        let mut app = App::with_initial_page(Some(Capability::Image));
        let request = app.begin_submit().expect("submit accepted");
        let capability = request.capability();

        for _ in 0..2 {
            let result = MockBackend
                .invoke(CapabilityRequest::Image {
                    prompt: "a sunset".to_string(),
                })
                .await;
            app.handle_app_event(AppEvent::InvokeFinished { capability, result });
        }
        app.handle_app_event(AppEvent::SubmitFinished { capability });

        assert_eq!(app.session.agent_turns_for(Capability::Image), 2);
        assert_eq!(
            app.active_page().expect("page").phase,
            Phase::DisplayingResult
        );
    }
}
