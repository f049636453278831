use crate::scene_tree::NodeId;

pub const TRANSLATE_SNAP_STEP: f32 = 0.05;
pub const ROTATE_SNAP_STEP_RADIANS: f32 = 15.0_f32.to_radians();
pub const SCALE_SNAP_STEP: f32 = 0.1;
pub const SCALE_MIN_RATIO: f32 = 0.05;
pub const SCALE_MAX_RATIO: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    Translate,
    Rotate,
    Scale,
}

impl Default for GizmoMode {
    fn default() -> Self {
        GizmoMode::Translate
    }
}

/// Transform-gizmo state the mutation layer keeps consistent: the active
/// mode and which live node the gizmo is attached to. The pointer-drag math
/// itself lives with the interaction collaborator.
#[derive(Debug, Default)]
pub struct GizmoState {
    mode: GizmoMode,
    attached: Option<NodeId>,
}

impl GizmoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.attached
    }

    pub fn attach(&mut self, id: NodeId) {
        self.attached = Some(id);
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }
}

pub fn apply_scale_ratio(ratio: f32, snap: bool) -> f32 {
    let clamped = ratio.clamp(SCALE_MIN_RATIO, SCALE_MAX_RATIO);
    if snap {
        let snapped = (clamped / SCALE_SNAP_STEP).round() * SCALE_SNAP_STEP;
        snapped.clamp(SCALE_MIN_RATIO, SCALE_MAX_RATIO)
    } else {
        clamped
    }
}
