//! farline - Main Entry Point
//!
//! Interactive shell exercising the command-line widget: raw-mode
//! event loop, prompt drawing, and the terminal workspace
//! collaborators.

use std::io::{self, Write};
use std::process;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode},
};

use farline::{
    CmdlineConfig, CommandLine, FsCompleter, MessageKind, SystemWorkspace, Workspace,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("\nERROR: farline encountered an error: {}", e);
        eprintln!("Please check your terminal compatibility and try again.");
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let config = CmdlineConfig::load_or_default(&CmdlineConfig::default_path());
    let cur_dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("/"));

    let completer = FsCompleter::new(cur_dir.clone());
    let mut cmdline = CommandLine::new(config, Box::new(completer), cur_dir);
    let mut workspace = SystemWorkspace::new(cmdline.config().show_hidden_folders);

    show_welcome(&mut workspace);

    enable_raw_mode()?;
    execute!(io::stdout(), EnableMouseCapture)?;

    let result = run_event_loop(&mut cmdline, &mut workspace);

    // always restore the terminal on the way out
    let _ = execute!(io::stdout(), DisableMouseCapture);
    let _ = disable_raw_mode();
    println!();

    result
}

fn show_welcome(workspace: &mut SystemWorkspace) {
    println!();
    workspace.print(MessageKind::System, "farline command line");
    workspace.print(
        MessageKind::Info,
        "Tab completes, double-Tab lists, Up/Down recall history",
    );
    workspace.print(
        MessageKind::Info,
        "Alt-F8 history list, Alt-F10 folder picker, Ctrl-End prefix recall",
    );
    workspace.print(
        MessageKind::Info,
        "far:config, far:about, edit:<path>, view:<path>; F10 or Ctrl-C quits",
    );
    println!();
}

fn run_event_loop(cmdline: &mut CommandLine, workspace: &mut SystemWorkspace) -> io::Result<()> {
    let mut stdout = io::stdout();

    while !cmdline.should_exit() {
        let (width, _) = terminal::size().unwrap_or((80, 24));
        cmdline.draw(&mut stdout, width)?;
        stdout.flush()?;

        match event::read()? {
            Event::Key(key) => {
                cmdline.process_key(key, workspace)?;
            }
            Event::Mouse(mouse) => {
                cmdline.process_mouse(mouse, workspace)?;
            }
            Event::Resize(..) => {}
            _ => {}
        }
    }

    Ok(())
}
