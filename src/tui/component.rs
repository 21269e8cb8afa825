use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a region of the frame.
///
/// Props arrive as struct fields; persistent presentation state (scroll
/// offsets, layout caches, edit buffers) is reached through `&mut self`,
/// which is why `render` is not `&self`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// What the component reports back to the event loop.
    type Event;

    /// Returns `None` when the event was ignored or needs no follow-up.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
