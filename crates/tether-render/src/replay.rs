//! Scripted replays: mount an overlay on a virtual host, feed it layout changes, resizes and
//! clock ticks, and record the frame after each step.

use crate::anchor::LayoutRect;
use crate::host::{EventHost, Viewport};
use crate::layout::{LayoutSnapshot, LayoutSnapshotDef, SharedLayout};
use crate::options::EngineOptions;
use crate::overlay::OverlayFrame;
use crate::watcher::LayoutWatcher;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tether_core::Diagram;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    /// Layout at mount time.
    pub layout: LayoutSnapshotDef,
    #[serde(default)]
    pub options: EngineOptions,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

fn default_viewport() -> Viewport {
    Viewport::new(1100.0, 700.0)
}

impl ReplayScript {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplayStep {
    /// Moves the virtual clock forward.
    Advance { ms: u64 },
    /// Replaces the layout without firing any event (the overlay only notices on its next
    /// trigger).
    Relayout { layout: LayoutSnapshotDef },
    /// Optionally reflows, then fires a resize event.
    Resize {
        viewport: Viewport,
        #[serde(default)]
        layout: Option<LayoutSnapshotDef>,
    },
    Mount { id: String, rect: LayoutRect },
    Unmount { id: String },
    Recompute,
    Teardown,
}

impl ReplayStep {
    fn name(&self) -> &'static str {
        match self {
            Self::Advance { .. } => "advance",
            Self::Relayout { .. } => "relayout",
            Self::Resize { .. } => "resize",
            Self::Mount { .. } => "mount",
            Self::Unmount { .. } => "unmount",
            Self::Recompute => "recompute",
            Self::Teardown => "teardown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRecord {
    /// 0 for the initial mount, then 1-based step numbers.
    pub step: usize,
    pub action: &'static str,
    pub now_ms: u64,
    pub passes: u64,
    pub active: bool,
    pub frame: OverlayFrame,
}

/// Runs `script` against `diagram` and returns one record for the mount plus one per step.
///
/// The script is fully validated before the overlay is mounted.
pub fn run_replay(diagram: Diagram, script: ReplayScript) -> Result<Vec<ReplayRecord>> {
    let initial = LayoutSnapshot::try_from(script.layout)?;
    let mut steps = Vec::with_capacity(script.steps.len());
    for step in script.steps {
        let layout = match &step {
            ReplayStep::Relayout { layout } => Some(LayoutSnapshot::try_from(layout.clone())?),
            ReplayStep::Resize {
                layout: Some(layout),
                ..
            } => Some(LayoutSnapshot::try_from(layout.clone())?),
            _ => None,
        };
        steps.push((step, layout));
    }

    let host = EventHost::new(script.viewport);
    let live = SharedLayout::new(initial);
    let mut watcher = LayoutWatcher::mount(&host, diagram, live.clone(), script.options);

    let record = |step: usize, action: &'static str, watcher: &LayoutWatcher<SharedLayout>| {
        ReplayRecord {
            step,
            action,
            now_ms: u64::try_from(host.now().as_millis()).unwrap_or(u64::MAX),
            passes: watcher.pass_count(),
            active: watcher.is_active(),
            frame: watcher.frame(),
        }
    };

    let mut records = vec![record(0, "mount", &watcher)];
    for (i, (step, layout)) in steps.into_iter().enumerate() {
        match &step {
            ReplayStep::Advance { ms } => host.advance(Duration::from_millis(*ms)),
            ReplayStep::Relayout { .. } => {
                if let Some(layout) = layout {
                    live.set(layout);
                }
            }
            ReplayStep::Resize { viewport, .. } => {
                if let Some(layout) = layout {
                    live.set(layout);
                }
                host.resize(*viewport);
            }
            ReplayStep::Mount { id, rect } => live.mount(id.clone(), (*rect).into()),
            ReplayStep::Unmount { id } => live.unmount(id),
            ReplayStep::Recompute => watcher.recompute(),
            ReplayStep::Teardown => watcher.teardown(),
        }
        records.push(record(i + 1, step.name(), &watcher));
    }
    Ok(records)
}
