//! Test mode for the navigation controller
//!
//! When run with --test, the binary drives a [`SimulatedOverview`] from
//! commands read on stdin, one per line. A line is either a JSON
//! [`TestCommand`] or a shorthand:
//!
//! ```text
//! show                 open the overview (attaches a controller)
//! Right | F3 | Delete  any key name, delivered as a key press
//! click [BUTTON]       pointer button press
//! move X Y             pointer motion to X,Y
//! wait MS              let MS milliseconds pass
//! open [WORKSPACE]     open a window
//! close ID             close a window behind the controller's back
//! focus [ID]           set or clear the focused window
//! drag begin|end       thumbnail drag
//! page windows|apps    switch the overview page
//! render | state       print the overview as ASCII or JSON
//! quit
//! ```
//!
//! Responses are printed as JSON lines, except ASCII renders which are
//! printed as is.

use std::io::{BufRead, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::ascii::{AsciiRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::backend::overview::{MONITOR_HEIGHT, MONITOR_WIDTH};
use crate::backend::{OverviewHandle, OverviewState, SimulatedOverview};
use crate::config::Config;
use crate::controller::KeyController;
use crate::error::{log_error, NavError, NavResult, OptionExt};
use crate::event::InputEvent;
use crate::geometry::Point;
use crate::host::HostAdapter;
use crate::keybindings::Key;
use crate::selection::SelectionState;
use crate::window::WindowId;

/// Upper bound of event rounds per command, guards against feedback loops
const MAX_PUMP_ROUNDS: usize = 64;

/// Commands accepted in test mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TestCommand {
    /// Open the overview and attach a controller
    Show,
    /// Press a key by keysym name
    Key { name: String },
    /// Press a pointer button
    Click { button: u32 },
    /// Move the pointer
    Motion { x: f64, y: f64 },
    /// Let time pass
    Wait { ms: u64 },
    /// Open a window, on the active workspace by default
    OpenWindow { workspace: Option<usize> },
    /// Close a window without going through the controller
    CloseWindow { id: u64 },
    /// Set or clear the focused window
    Focus { id: Option<u64> },
    /// Begin or end a thumbnail drag
    Drag { begin: bool },
    /// Show the windows page or another page of the overview
    Page { windows: bool },
    /// Render the active workspace as ASCII
    Render,
    /// Dump the state as JSON
    State,
    /// Leave test mode
    Quit,
}

impl TestCommand {
    /// Parse a JSON command or a shorthand line
    pub fn parse(line: &str) -> NavResult<Self> {
        let line = line.trim();
        if line.starts_with('{') {
            return serde_json::from_str(line)
                .map_err(|e| NavError::Backend(format!("Failed to parse command: {e}")));
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = parts
            .split_first()
            .ok_or_else(|| NavError::Backend("Empty command".to_string()))?;
        let command = match *name {
            "show" => TestCommand::Show,
            "click" => TestCommand::Click {
                button: parse_arg(args.first(), "button")?.unwrap_or(1),
            },
            "move" => TestCommand::Motion {
                x: parse_arg(args.first(), "x")?.ok_or_else(|| missing("x"))?,
                y: parse_arg(args.get(1), "y")?.ok_or_else(|| missing("y"))?,
            },
            "wait" => TestCommand::Wait {
                ms: parse_arg(args.first(), "milliseconds")?.ok_or_else(|| missing("ms"))?,
            },
            "open" => TestCommand::OpenWindow {
                workspace: parse_arg(args.first(), "workspace")?,
            },
            "close" => TestCommand::CloseWindow {
                id: parse_arg(args.first(), "id")?.ok_or_else(|| missing("id"))?,
            },
            "focus" => TestCommand::Focus {
                id: parse_arg(args.first(), "id")?,
            },
            "drag" => TestCommand::Drag {
                begin: match args.first() {
                    Some(&"begin") => true,
                    Some(&"end") => false,
                    _ => return Err(NavError::Backend("drag needs begin or end".to_string())),
                },
            },
            "page" => TestCommand::Page {
                windows: args.first() != Some(&"apps"),
            },
            "render" => TestCommand::Render,
            "state" => TestCommand::State,
            "quit" | "exit" => TestCommand::Quit,
            key => {
                if Key::from_name(key).is_none() {
                    return Err(NavError::Backend(format!("Unknown command: {key}")));
                }
                TestCommand::Key {
                    name: key.to_string(),
                }
            }
        };
        Ok(command)
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&&str>, what: &str) -> NavResult<Option<T>> {
    arg.map(|value| {
        value
            .parse()
            .map_err(|_| NavError::Backend(format!("Invalid {what}: {value}")))
    })
    .transpose()
}

fn missing(what: &str) -> NavError {
    NavError::Backend(format!("Missing {what}"))
}

/// Responses printed in test mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TestResponse {
    /// Command executed successfully
    Success,
    /// Command failed
    Error { message: String },
    /// ASCII state representation
    Ascii { ascii: String },
    /// Full state dump
    State {
        overview: OverviewState,
        selection: SelectionReport,
    },
    /// Window created
    WindowOpened { id: WindowId },
    /// Test mode ends
    Bye,
}

/// Controller side of a state dump
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub attached: bool,
    pub state: String,
    pub current: Option<WindowId>,
    pub selected: Option<WindowId>,
    pub blocked: bool,
    pub flags: Vec<String>,
    pub refresh_pending: bool,
}

/// Configuration of the test mode
#[derive(Debug, Clone)]
pub struct TestModeConfig {
    /// Width of the ASCII grid in characters
    pub ascii_width: usize,
    /// Height of the ASCII grid in characters
    pub ascii_height: usize,
    /// Number of workspaces
    pub workspaces: usize,
    /// Windows opened on the first workspace before the first command
    pub windows: usize,
    /// Controller configuration
    pub config: Config,
}

impl Default for TestModeConfig {
    fn default() -> Self {
        Self {
            ascii_width: DEFAULT_WIDTH,
            ascii_height: DEFAULT_HEIGHT,
            workspaces: 4,
            windows: 4,
            config: Config::default(),
        }
    }
}

/// A simulated shell plus the controller attached while the overview shows
pub struct TestSession {
    overview: OverviewHandle,
    config: Config,
    controller: Option<KeyController<OverviewHandle>>,
    renderer: AsciiRenderer,
}

impl TestSession {
    pub fn new(mode: TestModeConfig) -> Self {
        let mut overview = SimulatedOverview::new(mode.workspaces);
        for _ in 0..mode.windows {
            overview.open_window(0);
        }
        Self {
            overview: OverviewHandle::new(overview),
            config: mode.config,
            controller: None,
            renderer: AsciiRenderer::new(
                mode.ascii_width,
                mode.ascii_height,
                MONITOR_WIDTH,
                MONITOR_HEIGHT,
            ),
        }
    }

    pub fn overview(&self) -> &OverviewHandle {
        &self.overview
    }

    pub fn controller(&self) -> Option<&KeyController<OverviewHandle>> {
        self.controller.as_ref()
    }

    /// Execute one command
    pub fn execute(&mut self, command: TestCommand) -> TestResponse {
        match self.try_execute(command) {
            Ok(response) => response,
            Err(e) => TestResponse::Error {
                message: e.to_string(),
            },
        }
    }

    fn try_execute(&mut self, command: TestCommand) -> NavResult<TestResponse> {
        let response = match command {
            TestCommand::Show => {
                if self.overview.borrow().is_visible() {
                    return Err(NavError::Backend("Overview is already shown".to_string()));
                }
                self.controller = Some(KeyController::new(
                    self.overview.clone(),
                    self.config.clone(),
                ));
                self.overview.borrow_mut().open_overview();
                TestResponse::Success
            }
            TestCommand::Key { name } => {
                let key = Key::from_name(&name)
                    .ok_or_else(|| NavError::Backend(format!("Unknown key: {name}")))?;
                self.overview
                    .borrow_mut()
                    .emit(InputEvent::KeyPressed(key));
                TestResponse::Success
            }
            TestCommand::Click { button } => {
                self.overview
                    .borrow_mut()
                    .emit(InputEvent::ButtonPressed { button });
                TestResponse::Success
            }
            TestCommand::Motion { x, y } => {
                let position = Point::new(x, y);
                let mut overview = self.overview.borrow_mut();
                overview.set_pointer(position);
                overview.emit(InputEvent::PointerMoved(position));
                TestResponse::Success
            }
            TestCommand::Wait { ms } => {
                self.overview
                    .borrow_mut()
                    .advance(Duration::from_millis(ms));
                TestResponse::Success
            }
            TestCommand::OpenWindow { workspace } => {
                let mut overview = self.overview.borrow_mut();
                let workspace = workspace.unwrap_or_else(|| overview.active_workspace_index());
                let id = overview.open_window(workspace);
                TestResponse::WindowOpened { id }
            }
            TestCommand::CloseWindow { id } => {
                let window = window_id(id)?;
                self.overview.borrow_mut().close_window(window)?;
                TestResponse::Success
            }
            TestCommand::Focus { id } => {
                let window = id.map(window_id).transpose()?;
                self.overview.borrow_mut().set_focus(window);
                TestResponse::Success
            }
            TestCommand::Drag { begin } => {
                self.overview.borrow_mut().drag(begin);
                TestResponse::Success
            }
            TestCommand::Page { windows } => {
                self.overview.borrow_mut().set_windows_page(windows);
                TestResponse::Success
            }
            TestCommand::Render => TestResponse::Ascii {
                ascii: self.overview.borrow().render(&mut self.renderer),
            },
            TestCommand::State => self.state(),
            TestCommand::Quit => {
                self.controller = None;
                TestResponse::Bye
            }
        };
        self.pump();
        Ok(response)
    }

    /// Deliver queued host events until the shell is quiet
    pub fn pump(&mut self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = self.overview.borrow_mut().take_events();
            if events.is_empty() {
                break;
            }
            let Some(controller) = self.controller.as_mut() else {
                break;
            };
            for event in events {
                controller.handle_event(event);
            }
        }
        // The controller lives as long as the overview is shown
        if !self.overview.borrow().is_visible() && self.controller.take().is_some() {
            info!("Overview hidden, controller detached");
        }
    }

    /// Full state dump
    pub fn state(&self) -> TestResponse {
        let selection = match &self.controller {
            Some(controller) => {
                let selection = controller.selection();
                SelectionReport {
                    attached: true,
                    state: match selection.state() {
                        SelectionState::Idle => "idle",
                        SelectionState::ActiveUnselected => "active_unselected",
                        SelectionState::ActiveSelected => "active_selected",
                    }
                    .to_string(),
                    current: selection.current_window(),
                    selected: selection.selected_window(),
                    blocked: selection.is_blocked(),
                    flags: controller
                        .flags()
                        .iter_names()
                        .map(|(name, _)| name.to_lowercase())
                        .collect(),
                    refresh_pending: controller.refresh_pending(),
                }
            }
            None => SelectionReport {
                attached: false,
                state: "idle".to_string(),
                current: None,
                selected: None,
                blocked: false,
                flags: Vec::new(),
                refresh_pending: false,
            },
        };
        TestResponse::State {
            overview: self.overview.borrow().state(),
            selection,
        }
    }
}

fn window_id(raw: u64) -> NavResult<WindowId> {
    WindowId::from_raw(raw).ok_or_log(|| NavError::Backend("Window ids start at 1".to_string()))
}

/// Run the command loop on stdin until `quit` or end of input
pub fn run_test_mode(mode: TestModeConfig) -> NavResult<()> {
    info!(
        "Starting test mode: {} window(s) on {} workspace(s), ASCII grid {}x{}",
        mode.windows, mode.workspaces, mode.ascii_width, mode.ascii_height
    );
    let mut session = TestSession::new(mode);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let response = match TestCommand::parse(&line) {
            Ok(command) => session.execute(command),
            Err(e) => {
                warn!("{e}");
                TestResponse::Error {
                    message: e.to_string(),
                }
            }
        };
        match &response {
            TestResponse::Ascii { ascii } => write!(stdout, "{ascii}")?,
            other => {
                if let Some(json) = log_error(serde_json::to_string(other)) {
                    writeln!(stdout, "{json}")?;
                }
            }
        }
        stdout.flush()?;
        if matches!(response, TestResponse::Bye) {
            break;
        }
    }
    info!("Test mode finished");
    Ok(())
}
