/// User-level actions produced by [`crate::input::map_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,
    /// Open the detail view for the entry under the cursor.
    DrillIn,
    NavigateBack,
    NextPage,
    PrevPage,
    Reload,
    StartSearch,
    /// A typed character; `'\x08'` is backspace.
    SearchInput(char),
    SearchConfirm,
    SearchCancel,
    ToggleHelp,
    Resize(u16, u16),
    Tick,
    None,
}
