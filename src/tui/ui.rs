use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::ConversationState;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};

/// Draw one frame: title bar, then the landing page or the conversation,
/// then the input box. The emoji dialog, when open, is drawn over everything.
pub fn draw_ui(frame: &mut Frame, state: &ConversationState, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    tui.input_box.loading = state.loading;
    let input_height = tui.input_box.calculate_height(area.width);
    let [title_area, main_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(area);

    if state.has_messages() {
        MessageList::new(&mut tui.message_list, &state.messages, state.loading, spinner_frame)
            .render(frame, main_area);
    } else {
        LandingPage::new().render(frame, main_area);
    }

    let status = if state.loading {
        "Thinking..."
    } else {
        tui.status_message.as_str()
    };
    TitleBar::new(
        tui.model_name.as_str(),
        state.emoji_limit,
        status,
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);

    if let Some(dialog) = tui.emoji_dialog.as_mut() {
        dialog.render(frame, area);
    }
}
