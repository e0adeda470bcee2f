// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::PanelProjection;

pub const DEFAULT_COLLAPSE_WIDTH: u32 = 992;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Collapsed,
    Expanded,
}

impl PanelState {
    /// The panel, the content offset and the backdrop all follow this one value.
    pub const fn projection(self) -> PanelProjection {
        let expanded = matches!(self, Self::Expanded);
        PanelProjection {
            panel_shown: expanded,
            content_expanded: expanded,
            backdrop_shown: expanded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Toggle,
    Open,
    Close,
    BackdropClick,
    Escape,
    Resize { width: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Changed(PanelProjection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelController {
    pub state: PanelState,
    pub collapse_width: u32,
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new(DEFAULT_COLLAPSE_WIDTH)
    }
}

impl PanelController {
    pub fn new(collapse_width: u32) -> Self {
        Self {
            state: PanelState::Collapsed,
            collapse_width,
        }
    }

    pub fn dispatch(&mut self, command: PanelCommand) -> Vec<PanelEvent> {
        let next = match (command, self.state) {
            (PanelCommand::Toggle, PanelState::Collapsed) | (PanelCommand::Open, _) => {
                PanelState::Expanded
            }
            (PanelCommand::Toggle, PanelState::Expanded)
            | (PanelCommand::Close, _)
            | (PanelCommand::BackdropClick, _)
            | (PanelCommand::Escape, _) => PanelState::Collapsed,
            (PanelCommand::Resize { width }, PanelState::Expanded)
                if width <= self.collapse_width =>
            {
                PanelState::Collapsed
            }
            (PanelCommand::Resize { .. }, state) => state,
        };
        self.transition(next)
    }

    fn transition(&mut self, next: PanelState) -> Vec<PanelEvent> {
        if next == self.state {
            return Vec::new();
        }
        self.state = next;
        vec![PanelEvent::Changed(next.projection())]
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelCommand, PanelController, PanelEvent, PanelState};
    use crate::PanelProjection;

    const SHOWN: PanelProjection = PanelProjection {
        panel_shown: true,
        content_expanded: true,
        backdrop_shown: true,
    };
    const HIDDEN: PanelProjection = PanelProjection {
        panel_shown: false,
        content_expanded: false,
        backdrop_shown: false,
    };

    #[test]
    fn starts_collapsed() {
        assert_eq!(PanelController::default().state, PanelState::Collapsed);
    }

    #[test]
    fn escape_while_collapsed_is_a_no_op() {
        let mut panel = PanelController::default();
        assert!(panel.dispatch(PanelCommand::Escape).is_empty());
        assert_eq!(panel.state, PanelState::Collapsed);
    }

    #[test]
    fn escape_while_expanded_hides_all_three_parts() {
        let mut panel = PanelController::default();
        assert_eq!(
            panel.dispatch(PanelCommand::Open),
            vec![PanelEvent::Changed(SHOWN)]
        );
        assert_eq!(
            panel.dispatch(PanelCommand::Escape),
            vec![PanelEvent::Changed(HIDDEN)]
        );
        assert_eq!(panel.state, PanelState::Collapsed);
    }

    #[test]
    fn toggle_flips_between_states() {
        let mut panel = PanelController::default();
        panel.dispatch(PanelCommand::Toggle);
        assert_eq!(panel.state, PanelState::Expanded);
        panel.dispatch(PanelCommand::Toggle);
        assert_eq!(panel.state, PanelState::Collapsed);
    }

    #[test]
    fn resize_collapses_at_or_below_threshold() {
        let mut panel = PanelController::default();
        panel.dispatch(PanelCommand::Open);

        assert!(panel.dispatch(PanelCommand::Resize { width: 1200 }).is_empty());
        assert_eq!(panel.state, PanelState::Expanded);

        assert_eq!(
            panel.dispatch(PanelCommand::Resize { width: 992 }),
            vec![PanelEvent::Changed(HIDDEN)]
        );
    }

    #[test]
    fn resize_while_collapsed_does_nothing() {
        let mut panel = PanelController::default();
        assert!(panel.dispatch(PanelCommand::Resize { width: 320 }).is_empty());
    }

    #[test]
    fn backdrop_click_and_close_both_collapse() {
        for command in [PanelCommand::BackdropClick, PanelCommand::Close] {
            let mut panel = PanelController::default();
            panel.dispatch(PanelCommand::Open);
            panel.dispatch(command);
            assert_eq!(panel.state, PanelState::Collapsed);
        }
    }

    #[test]
    fn projection_flags_never_disagree() {
        for state in [PanelState::Collapsed, PanelState::Expanded] {
            let projection = state.projection();
            assert_eq!(projection.panel_shown, projection.content_expanded);
            assert_eq!(projection.panel_shown, projection.backdrop_shown);
        }
    }
}
