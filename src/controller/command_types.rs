#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Find,
    Prompt(PromptKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Text editing
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // Movement
    MoveLeft,
    MoveRight,
    MoveWordLeft,
    MoveWordRight,
    MoveUp,
    MoveDown,
    MoveLineStart,
    MoveLineEnd,
    MoveDocumentStart,
    MoveDocumentEnd,
    MovePageUp,
    MovePageDown,

    // History
    Undo,
    Redo,

    // Search
    StartFind,
    NextMatch,
    PreviousMatch,

    // Files and buffers
    NewDocument,
    OpenFile,
    Save,
    SaveAs,
    CloseBuffer,
    NextBuffer,
    PreviousBuffer,

    // Display
    ToggleLineNumbers,
    Redraw,

    // Find bar and prompt line editing
    PromptChar(char),
    PromptBackspace,
    PromptAccept,
    PromptCancel,

    Quit,
}
