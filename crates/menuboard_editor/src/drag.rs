//! Pointer-driven dragging of the QR overlays.
//!
//! A drag lives entirely in [`OverlayDrag`] between pointer down and pointer
//! up; only [`OverlayDrag::release`] produces something to persist.

use menuboard_core::layout::OverlayTarget;
use menuboard_core::models::menu::Menu;

/// Final overlay position produced when the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCommit {
    pub target: OverlayTarget,
    pub x: u32,
    pub y: u32,
}

/// Clamp one coordinate into `[0, container - overlay]`.
///
/// A container narrower than the overlay clamps everything to 0.
pub fn clamp_axis(value: f32, container: f32, overlay: f32) -> u32 {
    let max = (container - overlay).max(0.0);
    value.clamp(0.0, max).round() as u32
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    target: OverlayTarget,
    pointer_origin: (f32, f32),
    start: (f32, f32),
    overlay_width: f32,
    container: (f32, f32),
    position: (u32, u32),
}

impl ActiveDrag {
    fn position_for(&self, pointer: (f32, f32)) -> (u32, u32) {
        let x = self.start.0 + (pointer.0 - self.pointer_origin.0);
        let y = self.start.1 + (pointer.1 - self.pointer_origin.1);
        (
            clamp_axis(x, self.container.0, self.overlay_width),
            clamp_axis(y, self.container.1, self.overlay_width),
        )
    }
}

/// Drag state machine for one preview surface.
#[derive(Debug, Default)]
pub struct OverlayDrag {
    active: Option<ActiveDrag>,
}

impl OverlayDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `target` from its current position on `menu`.
    ///
    /// # Arguments
    /// - `pointer`: Pointer position at press, in preview pixels.
    /// - `container`: Preview width and height the overlay must stay inside.
    pub fn begin(
        &mut self,
        target: OverlayTarget,
        menu: &Menu,
        pointer: (f32, f32),
        container: (f32, f32),
    ) {
        let (x_field, y_field) = target.position_fields();
        let start = (x_field.get(menu), y_field.get(menu));
        self.active = Some(ActiveDrag {
            target,
            pointer_origin: pointer,
            start: (start.0 as f32, start.1 as f32),
            overlay_width: target.width_field().get(menu) as f32,
            container,
            position: start,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<OverlayTarget> {
        self.active.as_ref().map(|drag| drag.target)
    }

    /// Transient position of the dragged overlay.
    pub fn position(&self) -> Option<(u32, u32)> {
        self.active.as_ref().map(|drag| drag.position)
    }

    /// Track pointer movement; returns the clamped position to preview.
    pub fn update(&mut self, pointer: (f32, f32)) -> Option<(u32, u32)> {
        let drag = self.active.as_mut()?;
        drag.position = drag.position_for(pointer);
        Some(drag.position)
    }

    /// Finish the drag and return the single position to persist.
    pub fn release(&mut self, pointer: (f32, f32)) -> Option<OverlayCommit> {
        let drag = self.active.take()?;
        let (x, y) = drag.position_for(pointer);
        Some(OverlayCommit {
            target: drag.target,
            x,
            y,
        })
    }

    /// Abandon the drag without persisting anything.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// `menu` with the in-progress drag position applied, for previewing.
    pub fn preview(&self, menu: &Menu) -> Menu {
        let mut preview = menu.clone();
        if let Some(drag) = &self.active {
            let (x_field, y_field) = drag.target.position_fields();
            x_field.set(&mut preview, drag.position.0);
            y_field.set(&mut preview, drag.position.1);
        }
        preview
    }
}
