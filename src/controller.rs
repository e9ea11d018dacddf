//! Input Line Controller Module
//!
//! The central state machine of the command line: raw key and mouse
//! events come in, the editable buffer and its helpers (history
//! navigation, tab completion, prefix recall) are driven, and finished
//! lines are handed to the workspace collaborators for execution.
//!
//! Dispatch is an explicit precedence-ordered sequence: keys bound to
//! a feature are checked before the default text-editing path, so a
//! bound key always pre-empts plain insertion.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::{
    cursor::MoveToColumn,
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::commands::FarCommand;
use crate::completion::{apply_candidate, CompletionEngine};
use crate::config::CmdlineConfig;
use crate::editor::{EditLine, Movement};
use crate::history::CommandHistory;
use crate::prompt::{expand_prompt, Clock, PromptContext, SystemClock};
use crate::utils::{byte_index_of_char, char_len, trunc_path_str};
use crate::workspace::{ExecOptions, Workspace};

/// The command-line widget: edit buffer, history, completion and the
/// key/mouse dispatch tying them together
pub struct CommandLine {
    config: CmdlineConfig,
    edit: EditLine,
    history: CommandHistory,
    completer: Box<dyn CompletionEngine>,
    clock: Box<dyn Clock>,
    cur_dir: PathBuf,
    push_dir_depth: usize,
    /// Buffer contents at the previous completion request, for the
    /// double-tab heuristic
    last_completion_line: Option<String>,
    /// Buffer contents when prefix recall started; unset means no
    /// recall in progress
    recall_base: Option<String>,
    /// Layout of the last draw, for mouse hit testing
    last_prompt_width: usize,
    last_width: usize,
    should_exit: bool,
}

impl CommandLine {
    pub fn new(config: CmdlineConfig, completer: Box<dyn CompletionEngine>, cur_dir: PathBuf) -> Self {
        let history = CommandHistory::new(config.max_history_size);
        Self {
            config,
            edit: EditLine::new(),
            history,
            completer,
            clock: Box::new(SystemClock),
            cur_dir,
            push_dir_depth: 0,
            last_completion_line: None,
            recall_base: None,
            last_prompt_width: 0,
            last_width: 0,
            should_exit: false,
        }
    }

    /// Replace the clock used by the `$D`/`$T` prompt escapes
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn text(&self) -> &str {
        self.edit.text()
    }

    pub fn config(&self) -> &CmdlineConfig {
        &self.config
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn cur_dir(&self) -> &Path {
        &self.cur_dir
    }

    pub fn set_cur_dir(&mut self, dir: PathBuf) {
        self.completer.set_base_dir(&dir);
        self.cur_dir = dir;
    }

    pub fn push_dir_depth(&self) -> usize {
        self.push_dir_depth
    }

    pub fn set_push_dir_depth(&mut self, depth: usize) {
        self.push_dir_depth = depth;
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Replace the line; cursor moves to the end and any prefix-recall
    /// state is forgotten
    pub fn set_string(&mut self, text: &str) {
        self.recall_base = None;
        self.edit.set_text(text);
    }

    /// Insert at the cursor; prefix-recall state is forgotten
    pub fn insert_string(&mut self, text: &str) {
        self.recall_base = None;
        self.edit.insert_str(text);
    }

    /// Expand the configured prompt template for display
    pub fn prompt(&self) -> String {
        let mut ctx = PromptContext::from_env(&self.cur_dir.to_string_lossy());
        ctx.push_dir_depth = self.push_dir_depth;
        expand_prompt(self.config.effective_prompt_format(), &ctx, self.clock.as_ref())
    }

    /// Dispatch one key event. Returns whether the key was handled.
    pub fn process_key(&mut self, key: KeyEvent, ws: &mut dyn Workspace) -> io::Result<bool> {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }

        // completion first: its double-press memory survives only Tab
        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            self.tab_completion(ws)?;
            return Ok(true);
        }
        self.last_completion_line = None;

        // prefix recall only fires with the cursor at the end of line;
        // elsewhere Ctrl-End is plain end-of-line movement
        if key.code == KeyCode::End
            && key.modifiers == KeyModifiers::CONTROL
            && self.edit.cursor() == self.edit.text().len()
        {
            self.prefix_recall();
            return Ok(true);
        }

        let code = key.code;
        let mods = key.modifiers;

        if (code == KeyCode::Up && mods == KeyModifiers::NONE)
            || (code == KeyCode::Char('e') && mods == KeyModifiers::CONTROL)
        {
            self.history_previous();
            return Ok(true);
        }

        if (code == KeyCode::Down && mods == KeyModifiers::NONE)
            || (code == KeyCode::Char('x') && mods == KeyModifiers::CONTROL)
        {
            self.history_next();
            return Ok(true);
        }

        if code == KeyCode::Esc && mods == KeyModifiers::NONE {
            if self.config.history_reset_on_discard {
                self.history.reset_navigation();
            }
            self.set_string("");
            return Ok(true);
        }

        if code == KeyCode::Enter {
            let options = ExecOptions {
                separate_window: mods == KeyModifiers::SHIFT,
                run_as: mods == KeyModifiers::CONTROL | KeyModifiers::ALT,
            };
            self.submit(ws, options)?;
            return Ok(true);
        }

        if code == KeyCode::Char('u') && mods == KeyModifiers::CONTROL {
            self.edit.drop_selection();
            return Ok(true);
        }

        if code == KeyCode::F(8) && mods == KeyModifiers::ALT {
            self.history_dialog(ws)?;
            return Ok(true);
        }

        if code == KeyCode::F(10) && mods == KeyModifiers::ALT {
            if let Some(dir) = ws.pick_folder(&self.cur_dir.clone())? {
                self.set_cur_dir(dir.clone());
                ws.directory_changed(&dir);
            }
            return Ok(true);
        }

        if (code == KeyCode::F(10) && mods == KeyModifiers::NONE)
            || (code == KeyCode::Char('c') && mods == KeyModifiers::CONTROL)
        {
            self.should_exit = true;
            return Ok(true);
        }

        self.process_edit_key(code, mods)
    }

    /// Mouse dispatch: a click in the text area positions the cursor,
    /// a click on the history mark at the right edge opens the history
    /// list.
    pub fn process_mouse(&mut self, event: MouseEvent, ws: &mut dyn Workspace) -> io::Result<bool> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(false);
        }

        let col = event.column as usize;
        if self.last_width > 0 && col + 1 == self.last_width {
            self.history_dialog(ws)?;
            return Ok(true);
        }
        if col >= self.last_prompt_width {
            let cell = col - self.last_prompt_width + self.edit.left_pos();
            self.edit.set_cursor_to_char(cell);
            self.edit.drop_selection();
            return Ok(true);
        }
        Ok(false)
    }

    /// Submit the current line: record it, then let builtins, the
    /// plugin dispatcher and finally the execution service claim it.
    /// Fire-and-continue: no waiting happens here.
    fn submit(&mut self, ws: &mut dyn Workspace, options: ExecOptions) -> io::Result<()> {
        self.edit.drop_selection();
        let line = self.edit.text().trim().to_string();
        if line.is_empty() {
            return Ok(());
        }

        self.history.record(&line, &self.cur_dir);

        if let Some(command) = FarCommand::parse(&line) {
            self.run_builtin(command, ws)?;
        } else if !ws.dispatch_command(&line) {
            ws.execute(&line, options)?;
        }

        self.set_string("");
        Ok(())
    }

    fn run_builtin(&mut self, command: FarCommand, ws: &mut dyn Workspace) -> io::Result<()> {
        match command {
            FarCommand::Config => ws.show_config(&self.config),
            FarCommand::About => ws.show_about(),
            FarCommand::Edit(path) => ws.open_editor(path.as_deref()),
            FarCommand::View(Some(path)) => ws.open_viewer(&path),
            // the prefix is consumed even with nothing to open
            FarCommand::View(None) => Ok(()),
        }
    }

    /// Tab completion with the double-press heuristic: an unchanged
    /// buffer since the previous request switches from single
    /// expansion to the candidate list.
    fn tab_completion(&mut self, ws: &mut dyn Workspace) -> io::Result<()> {
        if !self.config.autocomplete {
            return Ok(());
        }

        let line = self.edit.text().to_string();
        let list_mode = self.last_completion_line.as_deref() == Some(line.as_str());
        self.last_completion_line = Some(line.clone());

        if line.is_empty() {
            return Ok(());
        }

        if list_mode {
            let candidates = self.completer.candidates(&line);
            if candidates.is_empty() {
                return Ok(());
            }
            if let Some(choice) = ws.select_from_list("Completions", candidates)? {
                let completed = apply_candidate(&line, &choice);
                self.set_string(&completed);
            }
        } else if let Some(expanded) = self.completer.expand(&line) {
            self.set_string(&expanded);
        }
        Ok(())
    }

    fn history_previous(&mut self) {
        if self.history.position().is_none() {
            self.history.stash_line(self.edit.text());
        }
        if let Some(line) = self.history.previous() {
            self.set_string(&line);
        }
    }

    fn history_next(&mut self) {
        if let Some(line) = self.history.next() {
            self.set_string(&line);
        }
    }

    /// Recall the most recent history entry sharing the buffer as a
    /// prefix. The base is cached until the buffer is edited, so
    /// repeated requests walk to older matches; the completed tail
    /// comes back selected.
    fn prefix_recall(&mut self) {
        if self.recall_base.is_none() {
            self.recall_base = Some(self.edit.text().to_string());
        }
        let base = match &self.recall_base {
            Some(base) => base.clone(),
            None => return,
        };

        if let Some(found) = self.history.recall_with_prefix(&base) {
            // write the buffer directly: set_string would drop the base
            self.edit.set_text(&found);
            self.edit.select(base.len(), found.len());
        }
    }

    fn history_dialog(&mut self, ws: &mut dyn Workspace) -> io::Result<()> {
        let items = self.history.recent_lines();
        if let Some(line) = ws.select_from_list("History", items)? {
            self.set_string(&line);
        }
        Ok(())
    }

    /// Default path: forward the key to the text-editing primitive.
    fn process_edit_key(&mut self, code: KeyCode, mods: KeyModifiers) -> io::Result<bool> {
        let ctrl = mods.contains(KeyModifiers::CONTROL);
        let shift = mods.contains(KeyModifiers::SHIFT);
        let alt = mods.contains(KeyModifiers::ALT);

        let handled = match code {
            KeyCode::Char('w') if ctrl => {
                self.edit.delete_word_backward();
                true
            }
            KeyCode::Char('k') if ctrl => {
                self.edit.kill_to_end();
                true
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                if self.config.delete_removes_selection {
                    self.edit.delete_selection();
                }
                self.edit.insert_char(c);
                true
            }
            KeyCode::Backspace if ctrl => {
                self.edit.delete_word_backward();
                true
            }
            KeyCode::Backspace => {
                if !(self.config.delete_removes_selection && self.edit.delete_selection()) {
                    self.edit.backspace();
                }
                true
            }
            KeyCode::Delete => {
                if !(self.config.delete_removes_selection && self.edit.delete_selection()) {
                    self.edit.delete_forward();
                }
                true
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                let movement = match (code, ctrl) {
                    (KeyCode::Left, true) => Movement::WordLeft,
                    (KeyCode::Left, false) => Movement::Left,
                    (KeyCode::Right, true) => Movement::WordRight,
                    (KeyCode::Right, false) => Movement::Right,
                    (KeyCode::Home, _) => Movement::Home,
                    _ => Movement::End,
                };
                self.edit.move_cursor(movement, shift);
                if !shift && !self.config.persistent_selection {
                    self.edit.drop_selection();
                }
                true
            }
            _ => false,
        };

        if handled {
            self.recall_base = None;
        }
        Ok(handled)
    }

    /// Draw the prompt, the visible window of the line and the history
    /// mark onto one terminal row of `width` cells.
    pub fn draw<W: Write>(&mut self, out: &mut W, width: u16) -> io::Result<()> {
        let width = width as usize;
        let prompt = trunc_path_str(&self.prompt(), width / 2);
        let prompt_width = char_len(&prompt);
        let text_budget = width.saturating_sub(prompt_width + 1).max(1);

        let (visible, cursor_col) = self.edit.window(text_budget);

        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(self.config.get_prompt_color()),
            Print(&prompt),
            SetForegroundColor(self.config.get_text_color()),
        )?;

        let left = self.edit.left_pos();
        let visible_chars = char_len(&visible);
        let selection = self.edit.selection_chars().and_then(|(start, end)| {
            let start = start.max(left);
            let end = end.min(left + visible_chars);
            (start < end).then_some((start - left, end - left))
        });

        match selection {
            Some((start, end)) => {
                let start_byte = byte_index_of_char(&visible, start);
                let end_byte = byte_index_of_char(&visible, end);
                queue!(
                    out,
                    Print(&visible[..start_byte]),
                    SetBackgroundColor(self.config.get_selection_color()),
                    Print(&visible[start_byte..end_byte]),
                    ResetColor,
                    SetForegroundColor(self.config.get_text_color()),
                    Print(&visible[end_byte..]),
                )?;
            }
            None => queue!(out, Print(&visible))?,
        }

        if width > 0 {
            queue!(
                out,
                MoveToColumn((width - 1) as u16),
                SetForegroundColor(self.config.get_prompt_color()),
                Print("↑"),
            )?;
        }

        queue!(
            out,
            ResetColor,
            MoveToColumn((prompt_width + cursor_col) as u16),
        )?;
        out.flush()?;

        self.last_prompt_width = prompt_width;
        self.last_width = width;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Clock;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap()
        }
    }

    /// Completion engine with scripted answers and a shared call log
    struct ScriptedCompleter {
        expansion: Option<String>,
        list: Vec<String>,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl CompletionEngine for ScriptedCompleter {
        fn expand(&self, _text: &str) -> Option<String> {
            self.calls.borrow_mut().push("expand");
            self.expansion.clone()
        }

        fn candidates(&self, _text: &str) -> Vec<String> {
            self.calls.borrow_mut().push("candidates");
            self.list.clone()
        }
    }

    /// Workspace double recording every collaborator call
    #[derive(Default)]
    struct RecordingWorkspace {
        executed: Vec<(String, ExecOptions)>,
        dispatched: Vec<String>,
        claim_dispatch: bool,
        edited: Vec<Option<String>>,
        viewed: Vec<String>,
        config_shown: usize,
        about_shown: usize,
        lists: Vec<(String, Vec<String>)>,
        list_response: Option<String>,
        folder_response: Option<PathBuf>,
        dir_changes: Vec<PathBuf>,
    }

    impl Workspace for RecordingWorkspace {
        fn execute(&mut self, command: &str, options: ExecOptions) -> io::Result<()> {
            self.executed.push((command.to_string(), options));
            Ok(())
        }

        fn dispatch_command(&mut self, line: &str) -> bool {
            self.dispatched.push(line.to_string());
            self.claim_dispatch
        }

        fn open_editor(&mut self, path: Option<&str>) -> io::Result<()> {
            self.edited.push(path.map(str::to_string));
            Ok(())
        }

        fn open_viewer(&mut self, path: &str) -> io::Result<()> {
            self.viewed.push(path.to_string());
            Ok(())
        }

        fn show_config(&mut self, _config: &CmdlineConfig) -> io::Result<()> {
            self.config_shown += 1;
            Ok(())
        }

        fn show_about(&mut self) -> io::Result<()> {
            self.about_shown += 1;
            Ok(())
        }

        fn select_from_list(
            &mut self,
            title: &str,
            items: Vec<String>,
        ) -> io::Result<Option<String>> {
            self.lists.push((title.to_string(), items));
            Ok(self.list_response.clone())
        }

        fn pick_folder(&mut self, _start_dir: &Path) -> io::Result<Option<PathBuf>> {
            Ok(self.folder_response.clone())
        }

        fn directory_changed(&mut self, dir: &Path) {
            self.dir_changes.push(dir.to_path_buf());
        }

        fn print(&mut self, _kind: crate::workspace::MessageKind, _message: &str) {}
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_mod(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    fn cmdline() -> (CommandLine, Rc<RefCell<Vec<&'static str>>>) {
        cmdline_with(CmdlineConfig::default(), None, Vec::new())
    }

    fn cmdline_with(
        config: CmdlineConfig,
        expansion: Option<String>,
        list: Vec<String>,
    ) -> (CommandLine, Rc<RefCell<Vec<&'static str>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let completer = ScriptedCompleter {
            expansion,
            list,
            calls: Rc::clone(&calls),
        };
        let cmdline = CommandLine::new(config, Box::new(completer), PathBuf::from("/work"))
            .with_clock(Box::new(FixedClock));
        (cmdline, calls)
    }

    fn type_line(cmdline: &mut CommandLine, ws: &mut RecordingWorkspace, line: &str) {
        for c in line.chars() {
            cmdline.process_key(key(KeyCode::Char(c)), ws).unwrap();
        }
    }

    fn submit_line(cmdline: &mut CommandLine, ws: &mut RecordingWorkspace, line: &str) {
        type_line(cmdline, ws, line);
        cmdline.process_key(key(KeyCode::Enter), ws).unwrap();
    }

    #[test]
    fn test_submit_executes_and_records_history() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "ls -la");

        assert_eq!(ws.executed, vec![("ls -la".to_string(), ExecOptions::default())]);
        let entry = cmdline.history().last_entry().unwrap();
        assert_eq!(entry.line, "ls -la");
        assert_eq!(entry.cwd, PathBuf::from("/work"));
        assert_eq!(cmdline.text(), "");
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        submit_line(&mut cmdline, &mut ws, "   ");
        assert!(ws.executed.is_empty());
        assert!(cmdline.history().is_empty());
    }

    #[test]
    fn test_builtin_prefixes_preempt_execution() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "far:about");
        submit_line(&mut cmdline, &mut ws, "far:config");
        submit_line(&mut cmdline, &mut ws, "edit:notes.txt");
        submit_line(&mut cmdline, &mut ws, "view:notes.txt");
        submit_line(&mut cmdline, &mut ws, "far:edit");

        assert_eq!(ws.about_shown, 1);
        assert_eq!(ws.config_shown, 1);
        assert_eq!(ws.edited, vec![Some("notes.txt".to_string()), None]);
        assert_eq!(ws.viewed, vec!["notes.txt".to_string()]);
        assert!(ws.executed.is_empty());
        // builtins still land in history
        assert_eq!(cmdline.history().len(), 5);
    }

    #[test]
    fn test_plugin_claim_skips_execution() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace {
            claim_dispatch: true,
            ..Default::default()
        };
        submit_line(&mut cmdline, &mut ws, "plug:do-thing");
        assert_eq!(ws.dispatched, vec!["plug:do-thing".to_string()]);
        assert!(ws.executed.is_empty());
    }

    #[test]
    fn test_submit_modifiers_select_exec_options() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        type_line(&mut cmdline, &mut ws, "sleep 1");
        cmdline
            .process_key(key_mod(KeyCode::Enter, KeyModifiers::SHIFT), &mut ws)
            .unwrap();

        type_line(&mut cmdline, &mut ws, "id");
        cmdline
            .process_key(
                key_mod(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::ALT),
                &mut ws,
            )
            .unwrap();

        assert!(ws.executed[0].1.separate_window);
        assert!(!ws.executed[0].1.run_as);
        assert!(ws.executed[1].1.run_as);
        assert!(!ws.executed[1].1.separate_window);
    }

    #[test]
    fn test_double_tab_switches_to_candidate_list() {
        let config = CmdlineConfig::default();
        let (mut cmdline, calls) = cmdline_with(
            config,
            None,
            vec!["lsblk".to_string(), "lsns".to_string()],
        );
        let mut ws = RecordingWorkspace {
            list_response: Some("lsblk".to_string()),
            ..Default::default()
        };

        type_line(&mut cmdline, &mut ws, "ls");
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();

        assert_eq!(*calls.borrow(), vec!["expand", "candidates"]);
        assert_eq!(ws.lists.len(), 1);
        assert_eq!(ws.lists[0].0, "Completions");
        assert_eq!(cmdline.text(), "lsblk");
    }

    #[test]
    fn test_expansion_resets_double_tab_memory() {
        let (mut cmdline, calls) = cmdline_with(
            CmdlineConfig::default(),
            Some("lsblk".to_string()),
            Vec::new(),
        );
        let mut ws = RecordingWorkspace::default();

        type_line(&mut cmdline, &mut ws, "ls");
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "lsblk");

        // buffer changed since the last request: expand mode again
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();
        assert_eq!(*calls.borrow(), vec!["expand", "expand"]);
    }

    #[test]
    fn test_other_keys_reset_double_tab_memory() {
        let (mut cmdline, calls) = cmdline_with(CmdlineConfig::default(), None, Vec::new());
        let mut ws = RecordingWorkspace::default();

        type_line(&mut cmdline, &mut ws, "ls");
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();
        cmdline.process_key(key(KeyCode::Char('x')), &mut ws).unwrap();
        cmdline.process_key(key(KeyCode::Tab), &mut ws).unwrap();

        // no candidates call: the edit in between reset the memory
        assert_eq!(*calls.borrow(), vec!["expand", "expand"]);
    }

    #[test]
    fn test_history_navigation_with_stash() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "first");
        submit_line(&mut cmdline, &mut ws, "second");
        type_line(&mut cmdline, &mut ws, "draft");

        cmdline.process_key(key(KeyCode::Up), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "second");
        cmdline.process_key(key(KeyCode::Up), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "first");
        cmdline.process_key(key(KeyCode::Up), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "first");

        cmdline.process_key(key(KeyCode::Down), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "second");
        cmdline.process_key(key(KeyCode::Down), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "draft");
    }

    #[test]
    fn test_ctrl_e_and_ctrl_x_mirror_arrows() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "only");
        cmdline
            .process_key(key_mod(KeyCode::Char('e'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "only");
        cmdline
            .process_key(key_mod(KeyCode::Char('x'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "");
    }

    #[test]
    fn test_escape_discards_line() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        type_line(&mut cmdline, &mut ws, "half typed");
        cmdline.process_key(key(KeyCode::Esc), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "");
    }

    #[test]
    fn test_escape_resets_navigation_when_configured() {
        let mut config = CmdlineConfig::default();
        config.history_reset_on_discard = true;
        let (mut cmdline, _) = cmdline_with(config, None, Vec::new());
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "first");
        cmdline.process_key(key(KeyCode::Up), &mut ws).unwrap();
        assert!(cmdline.history().position().is_some());

        cmdline.process_key(key(KeyCode::Esc), &mut ws).unwrap();
        assert!(cmdline.history().position().is_none());
    }

    #[test]
    fn test_prefix_recall_walks_matches_and_selects_tail() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "git status");
        submit_line(&mut cmdline, &mut ws, "ls");
        submit_line(&mut cmdline, &mut ws, "git push");
        type_line(&mut cmdline, &mut ws, "git");

        let ctrl_end = key_mod(KeyCode::End, KeyModifiers::CONTROL);
        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "git push");

        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "git status");

        // no older match: buffer stays
        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "git status");
    }

    #[test]
    fn test_prefix_recall_cache_resets_on_edit() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "git status");
        submit_line(&mut cmdline, &mut ws, "gift wrap");
        type_line(&mut cmdline, &mut ws, "gi");

        let ctrl_end = key_mod(KeyCode::End, KeyModifiers::CONTROL);
        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "gift wrap");

        // editing forgets the base; the next recall starts from the
        // new buffer contents
        cmdline.process_key(key(KeyCode::Backspace), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "gift wra");
        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "gift wra");
    }

    #[test]
    fn test_empty_buffer_recall_returns_previous_entry() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "make test");

        let ctrl_end = key_mod(KeyCode::End, KeyModifiers::CONTROL);
        cmdline.process_key(ctrl_end, &mut ws).unwrap();
        assert_eq!(cmdline.text(), "make test");
    }

    #[test]
    fn test_history_dialog_loads_choice() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        submit_line(&mut cmdline, &mut ws, "chosen line");

        ws.list_response = Some("chosen line".to_string());
        cmdline
            .process_key(key_mod(KeyCode::F(8), KeyModifiers::ALT), &mut ws)
            .unwrap();

        assert_eq!(ws.lists.last().unwrap().0, "History");
        assert_eq!(cmdline.text(), "chosen line");
        // loaded, not executed
        assert_eq!(ws.executed.len(), 1);
    }

    #[test]
    fn test_folder_picker_changes_directory() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace {
            folder_response: Some(PathBuf::from("/work/sub")),
            ..Default::default()
        };

        cmdline
            .process_key(key_mod(KeyCode::F(10), KeyModifiers::ALT), &mut ws)
            .unwrap();

        assert_eq!(cmdline.cur_dir(), Path::new("/work/sub"));
        assert_eq!(ws.dir_changes, vec![PathBuf::from("/work/sub")]);
    }

    #[test]
    fn test_folder_picker_cancel_keeps_directory() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        cmdline
            .process_key(key_mod(KeyCode::F(10), KeyModifiers::ALT), &mut ws)
            .unwrap();
        assert_eq!(cmdline.cur_dir(), Path::new("/work"));
        assert!(ws.dir_changes.is_empty());
    }

    #[test]
    fn test_ctrl_u_drops_selection() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        type_line(&mut cmdline, &mut ws, "abc");
        cmdline
            .process_key(key_mod(KeyCode::Left, KeyModifiers::SHIFT), &mut ws)
            .unwrap();
        cmdline
            .process_key(key_mod(KeyCode::Char('u'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "abc");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        type_line(&mut cmdline, &mut ws, "abc");
        cmdline
            .process_key(key_mod(KeyCode::Left, KeyModifiers::SHIFT), &mut ws)
            .unwrap();
        cmdline.process_key(key(KeyCode::Char('X')), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "abX");
    }

    #[test]
    fn test_word_and_line_editing_keys() {
        let (mut cmdline, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        type_line(&mut cmdline, &mut ws, "git commit -m msg");

        cmdline
            .process_key(key_mod(KeyCode::Char('w'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "git commit -m ");

        cmdline
            .process_key(key_mod(KeyCode::Backspace, KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "git commit ");

        cmdline.process_key(key(KeyCode::Home), &mut ws).unwrap();
        cmdline
            .process_key(key_mod(KeyCode::Char('k'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert_eq!(cmdline.text(), "");
    }

    #[test]
    fn test_f10_and_ctrl_c_request_exit() {
        let (mut cl, _) = cmdline();
        let mut ws = RecordingWorkspace::default();
        assert!(!cl.should_exit());
        cl.process_key(key(KeyCode::F(10)), &mut ws).unwrap();
        assert!(cl.should_exit());

        let (mut cl, _) = cmdline();
        cl
            .process_key(key_mod(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut ws)
            .unwrap();
        assert!(cl.should_exit());
    }

    #[test]
    fn test_mouse_click_positions_cursor() {
        let mut config = CmdlineConfig::default();
        config.use_prompt_format = true;
        config.prompt_format = "> ".to_string();
        let (mut cmdline, _) = cmdline_with(config, None, Vec::new());
        let mut ws = RecordingWorkspace::default();

        type_line(&mut cmdline, &mut ws, "hello");
        let mut sink = Vec::new();
        cmdline.draw(&mut sink, 40).unwrap();

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        cmdline.process_mouse(click, &mut ws).unwrap();

        // prompt "> " is two cells wide: column 5 is char cell 3
        cmdline.process_key(key(KeyCode::Char('X')), &mut ws).unwrap();
        assert_eq!(cmdline.text(), "helXlo");
    }

    #[test]
    fn test_mouse_click_on_mark_opens_history() {
        let mut config = CmdlineConfig::default();
        config.use_prompt_format = true;
        config.prompt_format = "> ".to_string();
        let (mut cmdline, _) = cmdline_with(config, None, Vec::new());
        let mut ws = RecordingWorkspace::default();

        submit_line(&mut cmdline, &mut ws, "remembered");
        let mut sink = Vec::new();
        cmdline.draw(&mut sink, 40).unwrap();

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 39,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        cmdline.process_mouse(click, &mut ws).unwrap();

        assert_eq!(ws.lists.last().unwrap().0, "History");
    }

    #[test]
    fn test_prompt_uses_template_and_clock() {
        let mut config = CmdlineConfig::default();
        config.use_prompt_format = true;
        config.prompt_format = "[$t]$g ".to_string();
        let (cmdline, _) = cmdline_with(config, None, Vec::new());
        assert_eq!(cmdline.prompt(), "[03:04:05]> ");
    }

    #[test]
    fn test_set_and_insert_string() {
        let (mut cmdline, _) = cmdline();
        cmdline.set_string("hello");
        cmdline.insert_string("!");
        assert_eq!(cmdline.text(), "hello!");
    }
}
