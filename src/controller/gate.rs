//! Equality render gate: skip frames whose computed props match the last
//! drawn ones.

use super::ViewProps;

/// Remembers the last rendered props. While a load is in flight the gate
/// always passes so the spinner keeps animating.
#[derive(Default)]
pub struct RenderGate {
    last: Option<ViewProps>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_render(&mut self, props: &ViewProps) -> bool {
        let changed = self.last.as_ref() != Some(props);
        if changed {
            self.last = Some(props.clone());
        }
        changed || props.loading
    }
}
