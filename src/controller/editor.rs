use crate::config::RcConfig;
use crate::controller::command_types::Mode;
use crate::controller::insert::InsertController;
use crate::controller::prompt::PromptController;
use crate::controller::search_commands::{FIND_PROMPT, FindController, SearchCommands};
use crate::controller::shared_state::{ModeController, ModeTransition, SharedEditorState};
use crate::document_model::{DocumentError, SearchOptions, SearchState};
use crate::view::{BracketHighlight, BufferManager, DocumentViewModel, RenderParams};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use std::io::stdout;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

const HELP_MESSAGE: &str =
    "Ctrl+S save | Ctrl+O open | Ctrl+F find | Ctrl+Z/Ctrl+Y undo/redo | Ctrl+Q quit";

pub struct EditorController {
    shared_state: SharedEditorState,
    current_mode: Mode,

    // Mode-specific controllers
    insert_controller: InsertController,
    find_controller: FindController,
    prompt_controller: PromptController,
}

impl EditorController {
    pub fn new(config: &RcConfig) -> Self {
        let buffer_manager = BufferManager::with_history_limit(config.history_limit);
        Self::with_buffers(buffer_manager, config)
    }

    pub fn new_with_files(
        filenames: Vec<PathBuf>,
        config: &RcConfig,
    ) -> Result<Self, DocumentError> {
        let buffer_manager = BufferManager::new_with_files(filenames, config.history_limit)?;
        Ok(Self::with_buffers(buffer_manager, config))
    }

    fn with_buffers(buffer_manager: BufferManager, config: &RcConfig) -> Self {
        let mut controller = Self {
            shared_state: SharedEditorState::new(buffer_manager),
            current_mode: Mode::Edit,
            insert_controller: InsertController::new(),
            find_controller: FindController::new(),
            prompt_controller: PromptController::new(),
        };
        controller.apply_config(config);
        controller.shared_state.status_message = HELP_MESSAGE.to_string();
        controller
    }

    /// Apply RC configuration to this editor controller
    pub fn apply_config(&mut self, config: &RcConfig) {
        let shared = &mut self.shared_state;
        shared.view.set_tab_stop(config.tab_stop);
        shared.view.set_line_numbers(config.show_line_numbers);
        shared.search_state = SearchState::new(SearchOptions {
            case_sensitive: config.case_sensitive,
        });
        shared.auto_pairs = config.auto_pairs;
    }

    pub fn mode(&self) -> Mode {
        self.current_mode
    }

    pub fn shared_state(&self) -> &SharedEditorState {
        &self.shared_state
    }

    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let result = self.run_loop();

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.render()?;

            match event::read()? {
                // Release and repeat events are reported on some platforms
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if self.handle_key(key_event) {
                        break;
                    }
                }
                Event::Resize(_, _) => self.shared_state.view.force_redraw(),
                _ => {}
            }
        }

        info!("editor loop finished");
        Ok(())
    }

    fn render(&mut self) -> std::io::Result<()> {
        let (status_line, prompt_cursor) = self.status_line();
        let shared = &mut self.shared_state;
        let buffer = shared.buffer_manager.current_mut();
        let title = buffer.document.title();
        let text = buffer.document.get_full_text();
        let bracket_highlights = BracketHighlight::compute(&text, buffer.cursor);

        let mut view_model = DocumentViewModel::new(&mut buffer.document, buffer.cursor);
        let params = RenderParams {
            title: &title,
            status_line: &status_line,
            prompt_cursor,
            search_state: Some(&shared.search_state),
            bracket_highlights: Some(&bracket_highlights),
        };
        shared.view.render(&mut view_model, &params)
    }

    /// Status text for the current mode, plus the prompt cursor column when
    /// a find bar or path prompt has focus.
    fn status_line(&self) -> (String, Option<usize>) {
        match self.current_mode {
            Mode::Edit => (self.shared_state.status_message.clone(), None),
            Mode::Find if self.shared_state.pending_confirm.is_some() => {
                (self.shared_state.status_message.clone(), None)
            }
            Mode::Find => {
                let cursor = FIND_PROMPT.width() + self.shared_state.search_state.pattern.width();
                (SearchCommands::describe(&self.shared_state.search_state), Some(cursor))
            }
            Mode::Prompt(_) => {
                let line = self.prompt_controller.status_line();
                let cursor = line.width();
                (line, Some(cursor))
            }
        }
    }

    /// Dispatches one key press. Returns true when the editor should exit.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> bool {
        let shared = &mut self.shared_state;
        let transition = match self.current_mode {
            Mode::Edit => self.insert_controller.handle_key(key_event, shared),
            Mode::Find => self.find_controller.handle_key(key_event, shared),
            Mode::Prompt(_) => self.prompt_controller.handle_key(key_event, shared),
        };

        match transition {
            ModeTransition::Stay => false,
            ModeTransition::ToMode(new_mode) => {
                self.transition_to_mode(new_mode);
                false
            }
            ModeTransition::Quit => true,
        }
    }

    fn transition_to_mode(&mut self, new_mode: Mode) {
        match new_mode {
            Mode::Find => self.find_controller.begin(&mut self.shared_state),
            Mode::Prompt(kind) => self.prompt_controller.begin(kind, &self.shared_state),
            Mode::Edit => {}
        }
        self.current_mode = new_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::command_types::PromptKind;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_str(editor: &mut EditorController, text: &str) {
        for c in text.chars() {
            editor.handle_key(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn text(editor: &EditorController) -> String {
        editor
            .shared_state()
            .buffer_manager
            .current_document()
            .get_full_text()
    }

    #[test]
    fn test_config_is_applied() {
        let config = RcConfig {
            case_sensitive: false,
            auto_pairs: false,
            history_limit: 5,
            ..RcConfig::default()
        };
        let mut editor = EditorController::new(&config);
        assert!(!editor.shared_state().auto_pairs);
        assert_eq!(editor.shared_state().buffer_manager.history_limit(), 5);

        type_str(&mut editor, "Abc abc(");
        assert_eq!(text(&editor), "Abc abc(");

        editor.handle_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL));
        type_str(&mut editor, "ABC");
        assert_eq!(editor.shared_state().search_state.matches, vec![0, 4]);
    }

    #[test]
    fn test_find_mode_round_trip() {
        let mut editor = EditorController::new(&RcConfig::default());
        type_str(&mut editor, "one two one");

        editor.handle_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL));
        assert_eq!(editor.mode(), Mode::Find);
        type_str(&mut editor, "one");
        editor.handle_key(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(editor.shared_state().buffer_manager.current().cursor, 8);

        let (status, cursor) = editor.status_line();
        assert_eq!(status, "Find: one  [2/2]");
        assert_eq!(cursor, Some(9));

        editor.handle_key(key(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(editor.mode(), Mode::Edit);

        // The pattern survives closing the find bar.
        editor.handle_key(key(KeyCode::Char('g'), KeyModifiers::CONTROL));
        assert_eq!(editor.shared_state().buffer_manager.current().cursor, 0);
    }

    #[test]
    fn test_prompt_modes() {
        let mut editor = EditorController::new(&RcConfig::default());
        editor.handle_key(key(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(editor.mode(), Mode::Prompt(PromptKind::Open));
        type_str(&mut editor, "x");
        assert_eq!(editor.status_line(), ("Open file: x".to_string(), Some(12)));
        editor.handle_key(key(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(editor.mode(), Mode::Edit);
        assert_eq!(text(&editor), "");
    }

    #[test]
    fn test_quit() {
        let mut editor = EditorController::new(&RcConfig::default());
        assert!(editor.handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_quit_from_find_bar_warns_about_unsaved_changes() {
        let mut editor = EditorController::new(&RcConfig::default());
        type_str(&mut editor, "x");
        editor.handle_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL));
        assert_eq!(editor.mode(), Mode::Find);

        assert!(!editor.handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        let (status, cursor) = editor.status_line();
        assert_eq!(status, "Unsaved changes: press Ctrl+Q again to quit");
        assert_eq!(cursor, None);

        // Typing into the find bar drops the pending warning.
        type_str(&mut editor, "x");
        assert!(!editor.handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(editor.handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }
}
