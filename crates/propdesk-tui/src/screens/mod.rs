//! Screen implementations. Each screen is a top-level Component.

pub mod board;
pub mod report;

use propdesk_core::models::Id;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar, scoped to `property`.
pub fn create_screens(property: Option<Id>) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Board, Box::new(board::BoardScreen::new(property))),
        (ScreenId::Report, Box::new(report::ReportScreen::new(property))),
    ]
}
