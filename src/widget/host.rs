//! Host Environment Abstraction
//!
//! The widget runtime never touches a real DOM directly. Everything the
//! embed script needs from the host page — element creation, attachment,
//! event subscription, frame/timer scheduling, the cookie jar — goes
//! through [`HostEnv`], and the host delivers discrete [`HostEvent`]s back
//! into the controller. This keeps the open/close transition logic
//! drivable by a fake clock in tests.

/// Opaque handle to a host element created through [`HostEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Opaque handle to a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(pub u64);

/// Discrete events the host delivers to the widget controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host document finished parsing (`DOMContentLoaded` equivalent).
    DocumentReady,
    /// A watched element was clicked.
    Clicked(NodeId),
    /// Escape was pressed while the global key subscription is active.
    EscapePressed,
    /// A requested animation frame is about to paint.
    FrameTick,
    /// A timer started via [`HostEnv::start_timer`] elapsed.
    TimerFired(TimerId),
}

/// Browser-like host surface injected into the widget runtime.
///
/// Detach operations must tolerate nodes the host page already removed;
/// the runtime never assumes its elements are still attached.
pub trait HostEnv {
    /// True while the host document is still parsing.
    fn document_loading(&self) -> bool;

    /// Attribute of the invoking script tag (e.g. `data-slug`).
    fn script_attr(&self, name: &str) -> Option<String>;

    /// `src` the invoking script was loaded from.
    fn script_src(&self) -> Option<String>;

    fn create_element(&mut self, tag: &str) -> NodeId;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn set_style(&mut self, node: NodeId, css: &str);
    fn set_html(&mut self, node: NodeId, html: &str);
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn append_to_body(&mut self, node: NodeId);
    fn remove_from_body(&mut self, node: NodeId);

    /// Deliver [`HostEvent::Clicked`] for this node from now on.
    fn watch_clicks(&mut self, node: NodeId);

    /// Toggle the global Escape-key subscription.
    fn watch_escape(&mut self, enabled: bool);

    /// Request a [`HostEvent::FrameTick`] on the next paint.
    fn request_frame(&mut self);

    /// Schedule a one-shot [`HostEvent::TimerFired`] after `ms`.
    fn start_timer(&mut self, ms: u64) -> TimerId;

    /// Diagnostic channel; never raises into the host page.
    fn warn(&self, message: &str);

    fn cookie(&self, name: &str) -> Option<String>;
    fn set_cookie(&mut self, name: &str, value: &str, max_age_secs: u64);
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory host used by the widget unit tests. Records every DOM
    //! mutation and lets tests fire timers and frames by hand.

    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Default)]
    pub struct FakeNode {
        pub tag: String,
        pub attributes: HashMap<String, String>,
        pub style: String,
        pub html: String,
        pub children: Vec<NodeId>,
    }

    #[derive(Debug, Default)]
    pub struct FakeHost {
        pub loading: bool,
        pub script_attrs: HashMap<String, String>,
        pub nodes: Vec<FakeNode>,
        pub body: Vec<NodeId>,
        pub watched: HashSet<NodeId>,
        pub escape_watched: bool,
        pub frames_requested: u32,
        pub timers: Vec<(TimerId, u64)>,
        pub warnings: RefCell<Vec<String>>,
        pub cookies: HashMap<String, String>,
        next_timer: u64,
    }

    impl FakeHost {
        pub fn with_script(attrs: &[(&str, &str)]) -> Self {
            let mut host = Self::default();
            for (name, value) in attrs {
                host.script_attrs
                    .insert((*name).to_string(), (*value).to_string());
            }
            host
        }

        pub fn node(&self, id: NodeId) -> &FakeNode {
            &self.nodes[id.0 as usize]
        }

        pub fn nodes_with_tag(&self, tag: &str) -> Vec<NodeId> {
            (0..self.nodes.len() as u32)
                .map(NodeId)
                .filter(|id| self.node(*id).tag == tag)
                .collect()
        }

        pub fn is_attached(&self, id: NodeId) -> bool {
            self.body.contains(&id)
        }

        pub fn last_timer(&self) -> TimerId {
            self.timers.last().expect("no timer started").0
        }
    }

    impl HostEnv for FakeHost {
        fn document_loading(&self) -> bool {
            self.loading
        }

        fn script_attr(&self, name: &str) -> Option<String> {
            self.script_attrs.get(name).cloned()
        }

        fn script_src(&self) -> Option<String> {
            self.script_attrs.get("src").cloned()
        }

        fn create_element(&mut self, tag: &str) -> NodeId {
            self.nodes.push(FakeNode {
                tag: tag.to_string(),
                ..FakeNode::default()
            });
            NodeId(self.nodes.len() as u32 - 1)
        }

        fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
            self.nodes[node.0 as usize]
                .attributes
                .insert(name.to_string(), value.to_string());
        }

        fn set_style(&mut self, node: NodeId, css: &str) {
            self.nodes[node.0 as usize].style = css.to_string();
        }

        fn set_html(&mut self, node: NodeId, html: &str) {
            self.nodes[node.0 as usize].html = html.to_string();
        }

        fn append_child(&mut self, parent: NodeId, child: NodeId) {
            self.nodes[parent.0 as usize].children.push(child);
        }

        fn append_to_body(&mut self, node: NodeId) {
            if !self.body.contains(&node) {
                self.body.push(node);
            }
        }

        fn remove_from_body(&mut self, node: NodeId) {
            self.body.retain(|n| *n != node);
        }

        fn watch_clicks(&mut self, node: NodeId) {
            self.watched.insert(node);
        }

        fn watch_escape(&mut self, enabled: bool) {
            self.escape_watched = enabled;
        }

        fn request_frame(&mut self) {
            self.frames_requested += 1;
        }

        fn start_timer(&mut self, ms: u64) -> TimerId {
            let id = TimerId(self.next_timer);
            self.next_timer += 1;
            self.timers.push((id, ms));
            id
        }

        fn warn(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }

        fn cookie(&self, name: &str) -> Option<String> {
            self.cookies.get(name).cloned()
        }

        fn set_cookie(&mut self, name: &str, value: &str, _max_age_secs: u64) {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }
}
