//! Recomputation lifecycle for one mounted diagram overlay.
//!
//! A [`LayoutWatcher`] recomputes on three kinds of trigger and nothing else:
//!
//! 1. immediately when mounted,
//! 2. once after a short settle delay (separately for edges/labels and for the container size),
//!    to pick up layout that completes after the first measurement,
//! 3. on every viewport resize, for as long as the watcher is alive.
//!
//! The resize subscription and the settle timers are RAII guards owned by the watcher, so
//! [`LayoutWatcher::teardown`] (or dropping the watcher) releases all of them. The callbacks
//! only hold a `Weak` reference to the watcher state and do nothing once it is gone.

use crate::host::{EventHost, ResizeSubscription, TimerGuard};
use crate::layout::LayoutSurface;
use crate::options::EngineOptions;
use crate::overlay::{OverlayFrame, diagram_markers};
use crate::relationship::{RelationshipKind, RelationshipTable, WatchState};
use crate::svg::render_overlay_svg;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tether_core::Diagram;
use tether_core::geom::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Mount,
    EdgeSettle,
    ContainerSettle,
    Resize,
    /// Explicit request from the owner.
    Manual,
}

impl Trigger {
    fn recomputes_relationships(self) -> bool {
        !matches!(self, Self::ContainerSettle)
    }
}

struct WatcherCore<L> {
    diagram: Diagram,
    layout: L,
    options: EngineOptions,
    markers: Vec<String>,
    table: RelationshipTable,
    container: Size,
    frame: OverlayFrame,
    svg: String,
    passes: u64,
}

impl<L: LayoutSurface> WatcherCore<L> {
    fn new(diagram: Diagram, layout: L, options: EngineOptions) -> Self {
        let markers = diagram_markers(&diagram, &options);
        let table = RelationshipTable::for_diagram(&diagram);
        let container = options.watcher.initial_container();
        let frame = OverlayFrame::empty(container);
        let svg = render_overlay_svg(&frame, &options.overlay);
        Self {
            diagram,
            layout,
            options,
            markers,
            table,
            container,
            frame,
            svg,
            passes: 0,
        }
    }

    fn run(&mut self, trigger: Trigger) {
        let snapshot = self.layout.snapshot();
        let measured = snapshot.container_size();
        // An unmeasured container keeps the previous size (initially `WatcherOptions`).
        if !measured.is_empty() {
            self.container = measured;
        }
        if trigger.recomputes_relationships() {
            self.table
                .recompute(&self.diagram, &snapshot, &self.options.geometry);
        }
        self.frame = OverlayFrame::compose(
            &self.diagram,
            &self.table,
            &self.markers,
            self.container,
            &self.options.geometry,
        );
        self.svg = render_overlay_svg(&self.frame, &self.options.overlay);
        self.passes += 1;
        tracing::trace!(
            ?trigger,
            pass = self.passes,
            drawn = self.frame.edges.len(),
            labels = self.frame.labels.len(),
            unresolved = self.frame.unresolved_edges.len(),
            "overlay recomputed"
        );
    }
}

/// A mounted overlay: the diagram, its live layout, and the registrations keeping it current.
pub struct LayoutWatcher<L: LayoutSurface + 'static> {
    core: Rc<RefCell<WatcherCore<L>>>,
    resize: Option<ResizeSubscription>,
    edge_settle: Option<TimerGuard>,
    container_settle: Option<TimerGuard>,
}

impl<L: LayoutSurface + 'static> std::fmt::Debug for LayoutWatcher<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("LayoutWatcher")
            .field("passes", &core.passes)
            .field("drawn_edges", &core.frame.edges.len())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

fn dispatcher<L: LayoutSurface + 'static>(
    core: &Rc<RefCell<WatcherCore<L>>>,
    trigger: Trigger,
) -> impl Fn() + 'static {
    let weak: Weak<RefCell<WatcherCore<L>>> = Rc::downgrade(core);
    move || {
        if let Some(core) = weak.upgrade() {
            tracing::debug!(?trigger, "overlay trigger");
            core.borrow_mut().run(trigger);
        }
    }
}

impl<L: LayoutSurface + 'static> LayoutWatcher<L> {
    /// Mounts the overlay: measures once right away, schedules the settle passes and starts
    /// listening for resizes on `host`.
    pub fn mount(host: &EventHost, diagram: Diagram, layout: L, options: EngineOptions) -> Self {
        let edge_delay = options.watcher.edge_settle_delay();
        let container_delay = options.watcher.container_settle_delay();
        let core = Rc::new(RefCell::new(WatcherCore::new(diagram, layout, options)));

        core.borrow_mut().run(Trigger::Mount);

        let on_resize = dispatcher(&core, Trigger::Resize);
        let resize = host.subscribe_resize(move |_viewport| on_resize());
        let edge_settle =
            edge_delay.map(|d| host.set_timeout(d, dispatcher(&core, Trigger::EdgeSettle)));
        let container_settle = container_delay
            .map(|d| host.set_timeout(d, dispatcher(&core, Trigger::ContainerSettle)));

        Self {
            core,
            resize: Some(resize),
            edge_settle,
            container_settle,
        }
    }

    /// Runs a full pass now, outside the trigger schedule.
    pub fn recompute(&self) {
        self.core.borrow_mut().run(Trigger::Manual);
    }

    /// Releases the resize subscription and cancels any settle timer that has not fired. Later
    /// events on the host no longer reach this overlay. The last frame stays readable.
    pub fn teardown(&mut self) {
        self.resize = None;
        self.edge_settle = None;
        self.container_settle = None;
        tracing::debug!("overlay torn down");
    }

    pub fn is_active(&self) -> bool {
        self.resize.is_some()
    }

    pub fn frame(&self) -> OverlayFrame {
        self.core.borrow().frame.clone()
    }

    pub fn svg(&self) -> String {
        self.core.borrow().svg.clone()
    }

    pub fn container(&self) -> Size {
        self.core.borrow().container
    }

    /// Number of recomputation passes run so far, including the mount pass.
    pub fn pass_count(&self) -> u64 {
        self.core.borrow().passes
    }

    pub fn states(&self) -> Vec<(usize, RelationshipKind, WatchState)> {
        self.core
            .borrow()
            .table
            .iter()
            .map(|r| (r.edge, r.kind, r.state))
            .collect()
    }
}
