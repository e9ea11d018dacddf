//! farline - command-line widget and folder picker for a console file
//! manager
//!
//! The text-UI layer of a FAR-style file manager: a single-line command
//! input with history navigation, prompt formatting, tab completion and
//! special command prefixes, plus a modal directory-picker dialog. The
//! surrounding framework (panels, plugins, screen compositing) is
//! reached only through the `Workspace` trait, so the widget runs
//! standalone or embedded.
//!
//! ## Module Structure
//!
//! - `config` - widget configuration with JSON persistence
//! - `editor` - single-line editable text buffer
//! - `history` - bounded command history with prefix recall
//! - `prompt` - `$`-escape prompt template expansion
//! - `completion` - tab completion seam and filesystem completer
//! - `commands` - `far:`/`edit:`/`view:` command prefix parsing
//! - `controller` - key/mouse dispatch state machine
//! - `folder_picker` - modal directory-browsing dialog
//! - `workspace` - framework collaborator trait and terminal impl
//! - `utils` - small display helpers

pub mod commands;
pub mod completion;
pub mod config;
pub mod controller;
pub mod editor;
pub mod folder_picker;
pub mod history;
pub mod prompt;
pub mod utils;
pub mod workspace;

// Re-export main types for convenience
pub use commands::FarCommand;
pub use completion::{CompletionEngine, FsCompleter};
pub use config::CmdlineConfig;
pub use controller::CommandLine;
pub use editor::{EditLine, Movement};
pub use folder_picker::{FolderPicker, PickOutcome};
pub use history::{CommandHistory, HistoryEntry};
pub use prompt::{expand_prompt, Clock, PromptContext, SystemClock};
pub use workspace::{ExecOptions, MessageKind, SystemWorkspace, Workspace};
