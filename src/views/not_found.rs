use crate::views::View;

/// Catch-all page for paths outside the route table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundView;

impl View for NotFoundView {
    fn name(&self) -> &'static str {
        "NotFoundView"
    }
}
