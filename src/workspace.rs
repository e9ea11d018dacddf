//! Workspace Collaborators Module
//!
//! The command line talks to the surrounding framework only through
//! the `Workspace` trait: process execution, plugin command dispatch,
//! editor/viewer launch, modal selection lists, the folder picker and
//! panel directory changes. `SystemWorkspace` is the interactive
//! terminal implementation the binary uses.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use inquire::{InquireError, Select};

use crate::config::CmdlineConfig;
use crate::folder_picker::FolderPicker;

/// Types of output messages
#[derive(Debug, Clone, Copy)]
pub enum MessageKind {
    Info,
    Error,
    Success,
    Warning,
    System,
}

impl MessageKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MessageKind::Info => " · ",
            MessageKind::Error => " ✗ ",
            MessageKind::Success => " ✓ ",
            MessageKind::Warning => " ! ",
            MessageKind::System => " » ",
        }
    }
}

/// How a submitted line should be executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Run detached instead of waiting on the console
    pub separate_window: bool,
    /// Run elevated
    pub run_as: bool,
}

/// Every framework service the command line consumes
pub trait Workspace {
    /// Hand a finished line to the process-execution service. The
    /// command line's involvement ends here; waiting, if any, is this
    /// collaborator's business.
    fn execute(&mut self, command: &str, options: ExecOptions) -> io::Result<()>;

    /// Offer the line to the plugin command dispatcher. `true` means a
    /// plugin claimed it.
    fn dispatch_command(&mut self, line: &str) -> bool;

    /// Open the editor; `None` means a new unnamed file
    fn open_editor(&mut self, path: Option<&str>) -> io::Result<()>;

    /// Open the viewer on an existing file
    fn open_viewer(&mut self, path: &str) -> io::Result<()>;

    fn show_config(&mut self, config: &CmdlineConfig) -> io::Result<()>;

    fn show_about(&mut self) -> io::Result<()>;

    /// Modal selection from a list; `None` on cancel
    fn select_from_list(&mut self, title: &str, items: Vec<String>) -> io::Result<Option<String>>;

    /// Modal directory-tree browse; `None` on cancel
    fn pick_folder(&mut self, start_dir: &Path) -> io::Result<Option<PathBuf>>;

    /// Panel notification that the current directory changed
    fn directory_changed(&mut self, dir: &Path);

    fn print(&mut self, kind: MessageKind, message: &str);
}

/// Suspend raw mode around a modal prompt or a child process that owns
/// the console.
fn with_raw_mode_suspended<T>(f: impl FnOnce() -> T) -> T {
    let _ = disable_raw_mode();
    let result = f();
    let _ = enable_raw_mode();
    result
}

/// Interactive terminal workspace: `sh -c` execution, `$EDITOR` /
/// `$PAGER` launch and inquire dialogs.
pub struct SystemWorkspace {
    show_hidden_folders: bool,
}

impl SystemWorkspace {
    pub fn new(show_hidden_folders: bool) -> Self {
        Self {
            show_hidden_folders,
        }
    }

    fn run_on_console(&self, command: &str, run_as: bool) -> io::Result<()> {
        let line = if run_as {
            format!("sudo sh -c '{}'", command.replace('\'', "'\\''"))
        } else {
            command.to_string()
        };
        with_raw_mode_suspended(|| {
            println!();
            let status = Command::new("sh").arg("-c").arg(&line).status()?;
            if !status.success() {
                if let Some(code) = status.code() {
                    println!("{}exit code {}", MessageKind::Warning.prefix(), code);
                }
            }
            Ok(())
        })
    }

    fn spawn_detached(&self, command: &str) -> io::Result<()> {
        Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }

    fn launch(&self, program: &str, arg: Option<&str>) -> io::Result<()> {
        with_raw_mode_suspended(|| {
            println!();
            let mut cmd = Command::new(program);
            if let Some(arg) = arg {
                cmd.arg(arg);
            }
            cmd.status()?;
            Ok(())
        })
    }

    fn about_lines() -> Vec<String> {
        let user = std::env::var("USER").unwrap_or_default();
        let host = std::env::var("HOSTNAME").unwrap_or_default();
        let cur_dir = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        vec![
            format!("      Version: {}", env!("CARGO_PKG_VERSION")),
            format!(
                "     Platform: {} {}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            format!("         User: {}", user),
            format!("         Host: {}", host),
            format!("          PID: {}", std::process::id()),
            format!("    Directory: {}", cur_dir),
            format!("       Config: {}", CmdlineConfig::default_path().display()),
        ]
    }
}

impl Workspace for SystemWorkspace {
    fn execute(&mut self, command: &str, options: ExecOptions) -> io::Result<()> {
        if options.separate_window {
            self.spawn_detached(command)
        } else {
            self.run_on_console(command, options.run_as)
        }
    }

    fn dispatch_command(&mut self, _line: &str) -> bool {
        // no plugin dispatcher is attached in the standalone binary
        false
    }

    fn open_editor(&mut self, path: Option<&str>) -> io::Result<()> {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        self.launch(&editor, path)
    }

    fn open_viewer(&mut self, path: &str) -> io::Result<()> {
        let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
        self.launch(&pager, Some(path))
    }

    fn show_config(&mut self, config: &CmdlineConfig) -> io::Result<()> {
        println!();
        self.print(MessageKind::System, "Configuration");
        for line in config.get_summary() {
            if line.is_empty() {
                println!();
            } else {
                self.print(MessageKind::Info, &line);
            }
        }
        Ok(())
    }

    fn show_about(&mut self) -> io::Result<()> {
        println!();
        self.print(MessageKind::System, "far:about");
        for line in Self::about_lines() {
            self.print(MessageKind::Info, &line);
        }
        Ok(())
    }

    fn select_from_list(&mut self, title: &str, items: Vec<String>) -> io::Result<Option<String>> {
        if items.is_empty() {
            return Ok(None);
        }
        with_raw_mode_suspended(|| {
            println!();
            let selection = Select::new(title, items)
                .with_page_size(15)
                .with_help_message("↑↓ navigate, type to filter, Enter to select, Esc to cancel")
                .prompt();
            match selection {
                Ok(choice) => Ok(Some(choice)),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    Ok(None)
                }
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
            }
        })
    }

    fn pick_folder(&mut self, start_dir: &Path) -> io::Result<Option<PathBuf>> {
        let mut picker = FolderPicker::new(start_dir.to_path_buf(), self.show_hidden_folders);
        with_raw_mode_suspended(|| {
            println!();
            picker.present()
        })
    }

    fn directory_changed(&mut self, dir: &Path) {
        if let Err(e) = std::env::set_current_dir(dir) {
            self.print(
                MessageKind::Warning,
                &format!("cannot enter {}: {}", dir.display(), e),
            );
        }
    }

    fn print(&mut self, kind: MessageKind, message: &str) {
        println!("{}{}", kind.prefix(), message);
        let _ = io::stdout().flush();
    }
}
