//! Widget Runtime
//!
//! Controller for the embeddable "what's new" widget: a floating launcher
//! button plus a lazily built, sandboxed content frame. One controller
//! instance per script invocation — no process-wide state, so several
//! independent embeds on one page stay independent.
//!
//! The widget must never break its host page: configuration errors abort
//! silently and every detach tolerates nodes the page removed externally.

use crate::widget::config::{EmbedConfig, Position};
use crate::widget::host::{HostEnv, HostEvent, NodeId, TimerId};

/// How long the reverse transition plays before the frame and backdrop are
/// detached. Matches the CSS transition duration.
pub const CLOSE_DELAY_MS: u64 = 250;

/// Above everything the host page can reasonably stack.
const Z_INDEX: &str = "2147483647";

/// Capabilities granted to the content frame. Anything not listed here is
/// denied by the sandbox.
const FRAME_SANDBOX: &str =
    "allow-scripts allow-same-origin allow-popups allow-popups-to-escape-sandbox";

const BELL_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M6 8a6 6 0 0 1 12 0c0 7 3 9 3 9H3s3-2 3-9"/><path d="M10.3 21a1.94 1.94 0 0 0 3.4 0"/></svg>"#;

const CLOSE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="22" height="22" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M18 6 6 18"/><path d="m6 6 12 12"/></svg>"#;

fn corner(position: Position) -> &'static str {
    match position {
        Position::BottomLeft => "left:20px;",
        Position::BottomRight => "right:20px;",
    }
}

fn launcher_style(position: Position) -> String {
    format!(
        "position:fixed;bottom:20px;{}z-index:{Z_INDEX};\
         width:52px;height:52px;border-radius:50%;border:none;cursor:pointer;\
         display:flex;align-items:center;justify-content:center;\
         background:#6366f1;color:#fff;\
         box-shadow:0 4px 14px rgba(99,102,241,0.4);\
         transition:transform 0.2s ease,box-shadow 0.2s ease;",
        corner(position)
    )
}

fn backdrop_style() -> String {
    format!("position:fixed;inset:0;z-index:{Z_INDEX};background:transparent;")
}

fn panel_style(position: Position, revealed: bool) -> String {
    let transition = if revealed {
        "transform:translateY(0);opacity:1;"
    } else {
        "transform:translateY(10px);opacity:0;"
    };
    format!(
        "position:fixed;bottom:80px;{}z-index:{Z_INDEX};\
         width:380px;height:520px;max-height:calc(100vh - 100px);\
         border-radius:12px;overflow:hidden;\
         box-shadow:0 25px 50px -12px rgba(0,0,0,0.25);\
         transition:transform 0.25s ease,opacity 0.25s ease;{}",
        corner(position),
        transition
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WidgetState {
    Closed,
    Open,
}

/// Embed widget controller. Construct with [`WidgetRuntime::boot`], then
/// route every [`HostEvent`] into [`WidgetRuntime::on_event`].
pub struct WidgetRuntime {
    config: EmbedConfig,
    state: WidgetState,
    launcher: Option<NodeId>,
    backdrop: Option<NodeId>,
    panel: Option<NodeId>,
    pending_close: Option<TimerId>,
}

impl WidgetRuntime {
    /// Read configuration and, once the document is ready, mount the
    /// launcher. Returns `None` (after a host warning) when the required
    /// slug is absent — the widget simply does not appear.
    pub fn boot(env: &mut dyn HostEnv) -> Option<WidgetRuntime> {
        let config = EmbedConfig::from_script_tag(env)?;

        let mut runtime = WidgetRuntime {
            config,
            state: WidgetState::Closed,
            launcher: None,
            backdrop: None,
            panel: None,
            pending_close: None,
        };

        // Insert after <body> exists regardless of script placement.
        if !env.document_loading() {
            runtime.mount(env);
        }

        Some(runtime)
    }

    pub fn is_open(&self) -> bool {
        self.state == WidgetState::Open
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn on_event(&mut self, event: HostEvent, env: &mut dyn HostEnv) {
        match event {
            HostEvent::DocumentReady => {
                if self.launcher.is_none() {
                    self.mount(env);
                }
            }
            HostEvent::Clicked(node) => {
                if Some(node) == self.launcher {
                    self.toggle(env);
                } else if Some(node) == self.backdrop {
                    self.close(env);
                }
            }
            HostEvent::EscapePressed => {
                if self.is_open() {
                    self.close(env);
                }
            }
            HostEvent::FrameTick => {
                // Deferred reveal: applying the visible styles a paint after
                // attach lets the transition play instead of snapping.
                if self.is_open() {
                    if let Some(panel) = self.panel {
                        env.set_style(panel, &panel_style(self.config.position, true));
                    }
                }
            }
            HostEvent::TimerFired(timer) => {
                // Only the latest close timer detaches; stale timers from a
                // close that was followed by a rapid re-open are ignored.
                if self.pending_close == Some(timer) {
                    self.pending_close = None;
                    self.detach_panel(env);
                }
            }
        }
    }

    fn mount(&mut self, env: &mut dyn HostEnv) {
        let launcher = env.create_element("button");
        env.set_attribute(launcher, "type", "button");
        env.set_attribute(launcher, "aria-label", "What's new");
        env.set_html(launcher, BELL_ICON);
        env.set_style(launcher, &launcher_style(self.config.position));
        env.watch_clicks(launcher);
        env.append_to_body(launcher);
        self.launcher = Some(launcher);
    }

    fn toggle(&mut self, env: &mut dyn HostEnv) {
        match self.state {
            WidgetState::Closed => self.open(env),
            WidgetState::Open => self.close(env),
        }
    }

    fn open(&mut self, env: &mut dyn HostEnv) {
        if self.is_open() {
            return;
        }
        self.state = WidgetState::Open;

        // A close may still be playing out; its timer must not detach the
        // panel we are about to show again.
        self.pending_close = None;

        // Construct once, reuse thereafter.
        if self.panel.is_none() {
            self.build_panel(env);
        }

        if let (Some(backdrop), Some(panel)) = (self.backdrop, self.panel) {
            env.append_to_body(backdrop);
            env.append_to_body(panel);
        }
        env.request_frame();

        if let Some(launcher) = self.launcher {
            env.set_html(launcher, CLOSE_ICON);
        }
        env.watch_escape(true);
    }

    fn close(&mut self, env: &mut dyn HostEnv) {
        if !self.is_open() {
            return;
        }
        self.state = WidgetState::Closed;

        if let Some(panel) = self.panel {
            env.set_style(panel, &panel_style(self.config.position, false));
        }
        // Detach only after the reverse transition has played.
        self.pending_close = Some(env.start_timer(CLOSE_DELAY_MS));

        if let Some(launcher) = self.launcher {
            env.set_html(launcher, BELL_ICON);
        }
        env.watch_escape(false);
    }

    fn build_panel(&mut self, env: &mut dyn HostEnv) {
        let backdrop = env.create_element("div");
        env.set_style(backdrop, &backdrop_style());
        env.watch_clicks(backdrop);

        let panel = env.create_element("div");
        env.set_style(panel, &panel_style(self.config.position, false));

        let frame = env.create_element("iframe");
        env.set_attribute(frame, "src", &self.config.frame_url());
        env.set_attribute(frame, "title", "What's new");
        env.set_attribute(frame, "loading", "lazy");
        env.set_attribute(frame, "sandbox", FRAME_SANDBOX);
        env.set_style(frame, "width:100%;height:100%;border:none;");
        env.append_child(panel, frame);

        self.backdrop = Some(backdrop);
        self.panel = Some(panel);
    }

    fn detach_panel(&mut self, env: &mut dyn HostEnv) {
        if let Some(backdrop) = self.backdrop {
            env.remove_from_body(backdrop);
        }
        if let Some(panel) = self.panel {
            env.remove_from_body(panel);
        }
    }
}
