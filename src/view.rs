// src/view.rs

//! View transform and pointer interaction for the network canvas.
//!
//! The page script carries a line-for-line twin of `ViewController`; both
//! read their constants from here through the settings block that
//! `html::render_html` embeds.

use crate::network::{Network, Node};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_IN_FACTOR: f64 = 1.1;
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Maps plane coordinates to screen pixels: `screen = plane * scale + offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewState {
    /// Unit scale with the plane origin at the middle of a `width × height`
    /// surface.
    pub fn new(width: f64, height: f64) -> Self {
        ViewState {
            scale: 1.0,
            offset_x: width / 2.0,
            offset_y: height / 2.0,
            width,
            height,
        }
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = self.width / 2.0;
        self.offset_y = self.height / 2.0;
    }

    /// New surface size; the transform itself is left alone.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn screen_to_plane(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    pub fn plane_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    /// Zoom in for negative `delta_y` (wheel up), out otherwise, keeping the
    /// plane point under `(sx, sy)` in place.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
        let (px, py) = self.screen_to_plane(sx, sy);
        let factor = if delta_y < 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset_x = sx - px * self.scale;
        self.offset_y = sy - py * self.scale;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    /// `grab_*` is the cursor position minus the node position, in plane
    /// units, so the node does not jump to the cursor.
    DraggingNode {
        node: usize,
        grab_dx: f64,
        grab_dy: f64,
    },
    Panning {
        last_x: f64,
        last_y: f64,
    },
}

/// Owns the view transform and the interaction state.
#[derive(Clone, Debug)]
pub struct ViewController {
    view: ViewState,
    interaction: Interaction,
}

impl ViewController {
    pub fn new(width: f64, height: f64) -> Self {
        ViewController {
            view: ViewState::new(width, height),
            interaction: Interaction::Idle,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Topmost node under the screen point. Nodes are tested in reverse draw
    /// order, so genes drawn last win over the tissue they overlap.
    pub fn node_at(&self, network: &Network, sx: f64, sy: f64) -> Option<usize> {
        network.nodes.iter().enumerate().rev().find_map(|(i, node)| {
            let (nx, ny) = self.view.plane_to_screen(node.x, node.y);
            let radius = node.size * self.view.scale;
            let (dx, dy) = (sx - nx, sy - ny);
            ((dx * dx + dy * dy).sqrt() <= radius).then_some(i)
        })
    }

    /// Node to describe in a tooltip. Only reported while idle.
    pub fn hovered<'a>(&self, network: &'a Network, sx: f64, sy: f64) -> Option<&'a Node> {
        if self.interaction != Interaction::Idle {
            return None;
        }
        self.node_at(network, sx, sy).map(|i| &network.nodes[i])
    }

    pub fn pointer_down(&mut self, network: &Network, sx: f64, sy: f64) {
        self.interaction = match self.node_at(network, sx, sy) {
            Some(node) => {
                let (px, py) = self.view.screen_to_plane(sx, sy);
                let target = &network.nodes[node];
                Interaction::DraggingNode {
                    node,
                    grab_dx: px - target.x,
                    grab_dy: py - target.y,
                }
            }
            None => Interaction::Panning {
                last_x: sx,
                last_y: sy,
            },
        };
    }

    /// Returns whether the frame needs a redraw.
    pub fn pointer_move(&mut self, network: &mut Network, sx: f64, sy: f64) -> bool {
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::DraggingNode {
                node,
                grab_dx,
                grab_dy,
            } => {
                let (px, py) = self.view.screen_to_plane(sx, sy);
                if let Some(target) = network.nodes.get_mut(*node) {
                    target.x = px - *grab_dx;
                    target.y = py - *grab_dy;
                }
                true
            }
            Interaction::Panning { last_x, last_y } => {
                let (dx, dy) = (sx - *last_x, sy - *last_y);
                *last_x = sx;
                *last_y = sy;
                self.view.pan_by(dx, dy);
                true
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
        self.view.zoom_at(sx, sy, delta_y);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
    }
}
